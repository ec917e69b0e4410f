use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Upload acceptance
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Client-side limits applied before a file is handed to the upload
/// sequencer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Lower-case extensions (without the dot) the client will submit.
    /// Only extensions the client knows a document kind for are honoured.
    #[serde(default = "d_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Files above this size are rejected locally; matches the backend's
    /// request size limit.
    #[serde(default = "d_16mib")]
    pub max_file_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: d_extensions(),
            max_file_bytes: d_16mib(),
        }
    }
}

impl UploadConfig {
    pub fn allows_extension(&self, ext: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_extensions() -> Vec<String> {
    vec!["txt".into(), "pdf".into(), "docx".into()]
}
fn d_16mib() -> u64 {
    16 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_ignores_case() {
        let cfg = UploadConfig::default();
        assert!(cfg.allows_extension("PDF"));
        assert!(cfg.allows_extension("docx"));
        assert!(!cfg.allows_extension("exe"));
    }
}
