use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use parking_lot::Mutex;
use tower::ServiceExt;

use autoreact_core::{ChannelId, GroupDiagnostics, GroupId, GroupSettings, MessageRef, ReactionEmoji};
use autoreact_gateway::{GatewayBuilder, ReactionGateway};
use autoreact_provider::{Notifier, ProviderError, ReactionProvider};
use autoreact_server::api::AppState;
use autoreact_server::commands::{CommandOptions, CommandReply};
use autoreact_state::SettingsStore;
use autoreact_state_memory::MemorySettingsStore;

// -- Mock platform --------------------------------------------------------

#[derive(Default)]
struct MockPlatform {
    reactions: Mutex<Vec<MessageRef>>,
    notices: Mutex<Vec<String>>,
}

impl ReactionProvider for MockPlatform {
    fn name(&self) -> &str {
        "mock"
    }

    async fn add_reaction(
        &self,
        message: &MessageRef,
        _emoji: &ReactionEmoji,
    ) -> Result<(), ProviderError> {
        self.reactions.lock().push(*message);
        Ok(())
    }
}

impl Notifier for MockPlatform {
    async fn send_text(&self, _channel: ChannelId, text: &str) -> Result<(), ProviderError> {
        self.notices.lock().push(text.to_owned());
        Ok(())
    }
}

// -- Helpers --------------------------------------------------------------

struct TestApp {
    gateway: Arc<ReactionGateway>,
    store: Arc<MemorySettingsStore>,
    platform: Arc<MockPlatform>,
    router: axum::Router,
}

fn build_app() -> TestApp {
    build_app_with(CommandOptions::default())
}

fn build_app_with(commands: CommandOptions) -> TestApp {
    let store = Arc::new(MemorySettingsStore::new());
    let platform = Arc::new(MockPlatform::default());
    let gateway = GatewayBuilder::new()
        .store(Arc::clone(&store) as Arc<dyn SettingsStore>)
        .provider(Arc::clone(&platform) as _)
        .notifier(Arc::clone(&platform) as _)
        .build()
        .expect("gateway should build");
    let gateway = Arc::new(gateway);

    let router = autoreact_server::api::router(AppState {
        gateway: Arc::clone(&gateway),
        commands,
    });

    TestApp {
        gateway,
        store,
        platform,
        router,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    // Extractor rejections answer in plain text.
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: http::Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn command(app: &TestApp, group: u64, line: &str) -> (StatusCode, CommandReply) {
    let (status, json) = send(
        app,
        json_request(
            http::Method::POST,
            &format!("/v1/groups/{group}/commands"),
            &serde_json::json!({"actor": "@admin", "command": line}),
        ),
    )
    .await;
    (status, serde_json::from_value(json).unwrap())
}

// -- Tests ----------------------------------------------------------------

#[tokio::test]
async fn health_returns_200() {
    let app = build_app();
    let (status, json) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["groups"], 0);
}

#[tokio::test]
async fn settings_default_for_unknown_group() {
    let app = build_app();
    let (status, json) = send(&app, get("/v1/groups/5/settings")).await;
    assert_eq!(status, StatusCode::OK);
    let settings: GroupSettings = serde_json::from_value(json).unwrap();
    assert_eq!(settings, GroupSettings::default());
}

#[tokio::test]
async fn patch_settings_applies_updates_in_order() {
    let app = build_app();
    let (status, json) = send(
        &app,
        json_request(
            http::Method::PATCH,
            "/v1/groups/5/settings",
            &serde_json::json!([
                {"field": "target_channel", "value": 10},
                {"field": "action_spec", "value": "  ✅ "},
                {"field": "enabled", "value": true},
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let settings: GroupSettings = serde_json::from_value(json).unwrap();
    assert!(settings.enabled);
    assert_eq!(settings.target_channel, Some(ChannelId::new(10)));
    assert_eq!(settings.action_spec.as_deref(), Some("✅"));

    let stored = app.store.get_group_settings(GroupId::new(5)).await.unwrap();
    assert_eq!(stored, settings);
}

#[tokio::test]
async fn patch_settings_accepts_single_update() {
    let app = build_app();
    let (status, json) = send(
        &app,
        json_request(
            http::Method::PATCH,
            "/v1/groups/5/settings",
            &serde_json::json!({"field": "max_retry", "value": 3}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["max_retry"], 3);
}

#[tokio::test]
async fn patch_settings_rejects_invalid_emoji() {
    let app = build_app();
    let (status, json) = send(
        &app,
        json_request(
            http::Method::PATCH,
            "/v1/groups/5/settings",
            &serde_json::json!({"field": "action_spec", "value": "hello"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("action_spec"));
    let stored = app.store.get_group_settings(GroupId::new(5)).await.unwrap();
    assert_eq!(stored.action_spec, None);
}

#[tokio::test]
async fn patch_settings_respects_ratelimit_lock() {
    let app = build_app();
    let (status, json) = send(
        &app,
        json_request(
            http::Method::PATCH,
            "/v1/groups/5/settings",
            &serde_json::json!([
                {"field": "max_retry", "value": 4},
                {"field": "per_item_delay_ms", "value": 1500},
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let reply: CommandReply = serde_json::from_value(json).unwrap();
    assert_eq!(reply.title, "Change refused");

    // The batch is rejected as a whole.
    let stored = app.store.get_group_settings(GroupId::new(5)).await.unwrap();
    assert_eq!(stored, GroupSettings::default());
}

#[tokio::test]
async fn patch_settings_checks_ratelimit_range_when_unlocked() {
    let app = build_app_with(CommandOptions {
        allow_ratelimit_tuning: true,
    });
    let (status, _) = send(
        &app,
        json_request(
            http::Method::PATCH,
            "/v1/groups/5/settings",
            &serde_json::json!({"field": "per_item_delay_ms", "value": 50}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        json_request(
            http::Method::PATCH,
            "/v1/groups/5/settings",
            &serde_json::json!({"field": "per_item_delay_ms", "value": 1500}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["per_item_delay_ms"], 1500);
}

#[tokio::test]
async fn events_are_accepted_even_when_filtered() {
    let app = build_app();
    let (status, _) = send(
        &app,
        json_request(
            http::Method::POST,
            "/v1/events",
            &serde_json::json!({"id": 1, "group_id": 7, "channel_id": 10}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(app.gateway.group_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn events_flow_to_the_provider() {
    let app = build_app();
    command(&app, 7, "setchannel <#10>").await;
    command(&app, 7, "setemoji ✅").await;
    let (status, reply) = command(&app, 7, "enable").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply.title, "AutoReact enabled");

    let (status, _) = send(
        &app,
        json_request(
            http::Method::POST,
            "/v1/events",
            &serde_json::json!({"id": 1, "group_id": 7, "channel_id": 10}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    assert_eq!(app.platform.reactions.lock().len(), 1);

    let (status, json) = send(&app, get("/v1/groups/7/diagnostics")).await;
    assert_eq!(status, StatusCode::OK);
    let diagnostics: GroupDiagnostics = serde_json::from_value(json).unwrap();
    assert_eq!(diagnostics, GroupDiagnostics::default());

    app.gateway.shutdown().await;
}

#[tokio::test]
async fn diagnostics_for_unknown_group_are_zero() {
    let app = build_app();
    let (status, json) = send(&app, get("/v1/groups/123/diagnostics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({"queue_length": 0, "dropped_count": 0, "failure_count": 0})
    );
}

#[tokio::test]
async fn refused_command_is_bad_request_with_reply() {
    let app = build_app();
    let (status, reply) = command(&app, 7, "enable").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.title, "Enable failed");
    assert_eq!(reply.lines, vec!["Missing settings: channel, emoji"]);
}

#[tokio::test]
async fn audit_notice_goes_to_log_channel() {
    let app = build_app();
    command(&app, 7, "set logchannel 99").await;
    command(&app, 7, "set logging on").await;
    command(&app, 7, "disable").await;
    assert_eq!(
        *app.platform.notices.lock(),
        vec!["@admin disabled AutoReact.".to_owned()]
    );
}

#[tokio::test]
async fn malformed_event_is_rejected_by_extractor() {
    let app = build_app();
    let (status, _) = send(
        &app,
        Request::builder()
            .method(http::Method::POST)
            .uri("/v1/events")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert!(status.is_client_error());
}
