use serde::Serialize;

/// Structured trace events emitted across all docchat crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    BackendCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    SessionCreated {
        session_id: String,
    },
    SessionUnavailable {
        reason: String,
    },
    DocumentUploaded {
        filename: String,
        documents: usize,
    },
    UploadFailed {
        filename: String,
        error: String,
    },
    UploadBatchFinished {
        files: usize,
        succeeded: usize,
        failed: usize,
    },
    ChatTurnFinished {
        ok: bool,
        sources: usize,
        duration_ms: u64,
    },
    OperationRejected {
        operation: String,
        reason: String,
    },
    RegistryReplaced {
        documents: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "dc_event");
    }
}
