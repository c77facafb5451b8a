use serde::Deserialize;

/// Configuration for the settings store backend.
#[derive(Debug, Deserialize)]
pub struct StateConfig {
    /// Which backend to use: `"memory"` or `"file"`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Path of the JSON settings document, for the `file` backend.
    pub path: Option<String>,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}
