use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Document-chat backend connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "d_backend_url")]
    pub base_url: String,
    /// Per-request timeout.  Unset means requests run until the backend
    /// answers or the connection fails.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: d_backend_url(),
            timeout_ms: None,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_backend_url() -> String {
    "http://localhost:5001".into()
}
