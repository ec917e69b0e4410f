//! Conversation facade.
//!
//! Bundles the shared state with the upload sequencer and chat turn
//! controller so presentation code has one handle.  Cloning is cheap and
//! every clone drives the same conversation, which lets an upload batch
//! run on its own task while chat turns continue.

use std::sync::Arc;

use dc_client::DocChatBackend;
use dc_domain::error::Error;

use crate::accept::UploadFile;
use crate::chat::{ChatTurnController, TurnOutcome};
use crate::registry::DocumentRecord;
use crate::state::{ConversationState, Refused};
use crate::store::SessionStatus;
use crate::timeline::TimelineEntry;
use crate::upload::{UploadReport, UploadSequencer};

/// Failure of a read-only backend query (summary, insights, refresh).
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Refused(#[from] Refused),
    #[error(transparent)]
    Backend(#[from] Error),
}

#[derive(Clone)]
pub struct Conversation {
    backend: Arc<dyn DocChatBackend>,
    state: Arc<ConversationState>,
    uploads: UploadSequencer,
    chat: ChatTurnController,
}

impl Conversation {
    pub fn new(backend: Arc<dyn DocChatBackend>) -> Self {
        let state = Arc::new(ConversationState::new());
        Self {
            uploads: UploadSequencer::new(backend.clone(), state.clone()),
            chat: ChatTurnController::new(backend.clone(), state.clone()),
            backend,
            state,
        }
    }

    pub fn state(&self) -> &Arc<ConversationState> {
        &self.state
    }

    // ── operations ───────────────────────────────────────────────────

    /// Create the backend session.  Only the first call does anything.
    pub async fn start(&self) -> SessionStatus {
        self.state.session.create_session(self.backend.as_ref()).await
    }

    pub async fn submit_uploads(&self, files: Vec<UploadFile>) -> Result<UploadReport, Refused> {
        self.uploads.submit_uploads(files).await
    }

    pub async fn send_turn(&self, utterance: &str) -> Result<TurnOutcome, Refused> {
        self.chat.send_turn(utterance).await
    }

    /// Send whatever is in the pending-input buffer.
    pub async fn submit_pending_input(&self) -> Result<TurnOutcome, Refused> {
        let utterance = self.state.pending_input();
        self.chat.send_turn(&utterance).await
    }

    /// Re-read the document list from the backend and replace the
    /// registry with it.  On failure the registry is left untouched.
    pub async fn refresh_documents(&self) -> Result<usize, QueryError> {
        let session_id = self.require_session("refresh")?;
        let resp = self.backend.documents(&session_id).await?;
        let count = resp.documents.len();
        self.state.documents.replace_all(resp.documents);
        Ok(count)
    }

    pub async fn summary(&self, filename: Option<&str>) -> Result<serde_json::Value, QueryError> {
        let session_id = self.require_session("summary")?;
        Ok(self.backend.summary(&session_id, filename).await?.summary)
    }

    pub async fn insights(&self, question: &str) -> Result<serde_json::Value, QueryError> {
        if question.trim().is_empty() {
            return Err(Refused::EmptyUtterance.traced("insights").into());
        }
        let session_id = self.require_session("insights")?;
        Ok(self.backend.insights(&session_id, question).await?.insights)
    }

    /// Release the backend session.  Best effort: failures are logged.
    pub async fn end_session(&self) {
        let Some(session_id) = self.state.session.session_id() else {
            return;
        };
        match self.backend.delete_session(&session_id).await {
            Ok(_) => tracing::info!(%session_id, "session ended"),
            Err(e) => tracing::warn!(%session_id, error = %e, "failed to end session"),
        }
    }

    // ── read accessors ───────────────────────────────────────────────

    pub fn session_status(&self) -> SessionStatus {
        self.state.session.status()
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.state.timeline.snapshot()
    }

    pub fn timeline_len(&self) -> usize {
        self.state.timeline.len()
    }

    pub fn timeline_since(&self, cursor: usize) -> Vec<TimelineEntry> {
        self.state.timeline.since(cursor)
    }

    pub fn documents(&self) -> Vec<DocumentRecord> {
        self.state.documents.snapshot()
    }

    pub fn is_uploading(&self) -> bool {
        self.state.uploading.is_set()
    }

    /// Drives the "processing" indicator.
    pub fn is_awaiting_answer(&self) -> bool {
        self.state.awaiting_answer.is_set()
    }

    /// Whether `send_turn` would currently be accepted for a non-empty
    /// utterance.
    pub fn chat_enabled(&self) -> bool {
        self.state.session.session_id().is_some()
            && !self.state.documents.is_empty()
            && !self.state.awaiting_answer.is_set()
    }

    pub fn pending_input(&self) -> String {
        self.state.pending_input()
    }

    pub fn set_pending_input(&self, text: impl Into<String>) {
        self.state.set_pending_input(text);
    }

    fn require_session(&self, operation: &str) -> Result<String, Refused> {
        self.state
            .session
            .session_id()
            .ok_or_else(|| Refused::NoSession.traced(operation))
    }
}
