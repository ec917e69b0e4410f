//! Upload sequencer.
//!
//! Sends a batch of accepted files to the backend strictly one after the
//! other.  Each file's outcome lands on the timeline on its own; a failed
//! file never stops the rest of the batch.

use std::sync::Arc;

use dc_client::{DocChatBackend, UploadRequest, UploadResponse};
use dc_domain::error::Result;
use dc_domain::trace::TraceEvent;

use crate::accept::UploadFile;
use crate::state::{ConversationState, Refused};
use crate::timeline::{EntryKind, TimelineEntry};

/// Tally of one finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct UploadSequencer {
    backend: Arc<dyn DocChatBackend>,
    state: Arc<ConversationState>,
}

impl UploadSequencer {
    pub fn new(backend: Arc<dyn DocChatBackend>, state: Arc<ConversationState>) -> Self {
        Self { backend, state }
    }

    /// Upload `files` in order.
    ///
    /// Refused without side effects when there is no session or another
    /// batch still holds the `uploading` gate.  The gate is held for the
    /// whole batch, not per file.
    pub async fn submit_uploads(
        &self,
        files: Vec<UploadFile>,
    ) -> std::result::Result<UploadReport, Refused> {
        let Some(session_id) = self.state.session.session_id() else {
            return Err(Refused::NoSession.traced("upload"));
        };
        let Some(_uploading) = self.state.uploading.try_acquire() else {
            return Err(Refused::UploadInProgress.traced("upload"));
        };

        let total = files.len();
        let mut report = UploadReport::default();

        for file in files {
            let filename = file.name().to_owned();
            match self.upload_one(&session_id, file).await {
                Ok(resp) => {
                    let documents = resp.documents.len();
                    self.state.documents.replace_all(resp.documents);
                    self.state.timeline.append(TimelineEntry::text(
                        EntryKind::System,
                        format!("Document \"{filename}\" uploaded successfully!"),
                    ));
                    TraceEvent::DocumentUploaded {
                        filename,
                        documents,
                    }
                    .emit();
                    report.succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(%filename, error = %e, "upload failed");
                    let detail = e.backend_message().unwrap_or("Unknown error");
                    self.state.timeline.append(TimelineEntry::text(
                        EntryKind::Error,
                        format!("Failed to upload \"{filename}\": {detail}"),
                    ));
                    TraceEvent::UploadFailed {
                        filename,
                        error: e.to_string(),
                    }
                    .emit();
                    report.failed += 1;
                }
            }
        }

        TraceEvent::UploadBatchFinished {
            files: total,
            succeeded: report.succeeded,
            failed: report.failed,
        }
        .emit();

        Ok(report)
    }

    async fn upload_one(&self, session_id: &str, file: UploadFile) -> Result<UploadResponse> {
        let filename = file.name().to_owned();
        let mime = file.kind().mime().to_owned();
        let bytes = file.into_bytes().await?;

        self.backend
            .upload(UploadRequest {
                session_id: session_id.to_owned(),
                filename,
                mime,
                bytes,
            })
            .await
    }
}
