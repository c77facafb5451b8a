use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use autoreact_core::{GroupId, SettingsUpdate, validate_emoji_input};

use super::AppState;
use crate::commands::{CommandReply, CommandRunner};
use crate::error::ServerError;

/// `GET /v1/groups/{group_id}/diagnostics` -- queue length and counters.
pub async fn diagnostics(
    State(state): State<AppState>,
    Path(group_id): Path<u64>,
) -> impl IntoResponse {
    Json(state.gateway.diagnostics(GroupId::new(group_id)))
}

/// `GET /v1/groups/{group_id}/settings` -- the group's current settings.
pub async fn get_settings(
    State(state): State<AppState>,
    Path(group_id): Path<u64>,
) -> Result<impl IntoResponse, ServerError> {
    let settings = state
        .gateway
        .group_settings(GroupId::new(group_id))
        .await?;
    Ok(Json(settings))
}

/// Body of a settings patch: one field update or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SettingsPatch {
    One(SettingsUpdate),
    Many(Vec<SettingsUpdate>),
}

impl SettingsPatch {
    fn into_updates(self) -> Vec<SettingsUpdate> {
        match self {
            Self::One(update) => vec![update],
            Self::Many(updates) => updates,
        }
    }
}

/// `PATCH /v1/groups/{group_id}/settings` -- apply field updates in order.
///
/// Emoji specs are validated and trimmed the same way as `setemoji`, and
/// `per_item_delay_ms` obeys the same lock and range as `set ratelimit`.
/// Nothing is written unless every update passes. Returns the resulting
/// settings.
pub async fn patch_settings(
    State(state): State<AppState>,
    Path(group_id): Path<u64>,
    Json(patch): Json<SettingsPatch>,
) -> Result<impl IntoResponse, ServerError> {
    let updates = patch
        .into_updates()
        .into_iter()
        .map(|update| match update {
            SettingsUpdate::ActionSpec(Some(raw)) => validate_emoji_input(&raw)
                .map(|spec| SettingsUpdate::ActionSpec(Some(spec)))
                .map_err(|e| ServerError::BadRequest(format!("action_spec: {e}"))),
            SettingsUpdate::PerItemDelayMs(ms) => state
                .commands
                .check_item_delay(ms)
                .map(|()| SettingsUpdate::PerItemDelayMs(ms))
                .map_err(ServerError::from),
            other => Ok(other),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let settings = state
        .gateway
        .store()
        .apply_updates(GroupId::new(group_id), updates)
        .await?;
    Ok(Json(settings))
}

/// Body of `POST /v1/groups/{group_id}/commands`.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    /// Who issued the command, as shown in audit notices.
    pub actor: String,
    /// The command line, e.g. `set ignorebots on`.
    pub command: String,
}

/// `POST /v1/groups/{group_id}/commands` -- run an admin command.
pub async fn command(
    State(state): State<AppState>,
    Path(group_id): Path<u64>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandReply>, ServerError> {
    let reply = CommandRunner::new(&state.gateway, state.commands)
        .run_line(GroupId::new(group_id), &request.actor, &request.command)
        .await?;
    Ok(Json(reply))
}
