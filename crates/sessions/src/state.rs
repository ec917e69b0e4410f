//! Shared conversation state.
//!
//! One `ConversationState` lives behind an `Arc` and is handed to the
//! session store, the upload sequencer and the chat turn controller.
//! The timeline and registry are written only by those controllers;
//! everything else reads.

use parking_lot::Mutex;

use crate::gate::InFlightGate;
use crate::registry::DocumentRegistry;
use crate::store::SessionStore;
use crate::timeline::ConversationTimeline;

pub struct ConversationState {
    pub session: SessionStore,
    pub timeline: ConversationTimeline,
    pub documents: DocumentRegistry,
    /// Held for a whole upload batch.
    pub uploading: InFlightGate,
    /// Held while a chat request is outstanding.
    pub awaiting_answer: InFlightGate,
    pending_input: Mutex<String>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            session: SessionStore::new(),
            timeline: ConversationTimeline::new(),
            documents: DocumentRegistry::new(),
            uploading: InFlightGate::new("uploading"),
            awaiting_answer: InFlightGate::new("awaiting_answer"),
            pending_input: Mutex::new(String::new()),
        }
    }

    pub fn pending_input(&self) -> String {
        self.pending_input.lock().clone()
    }

    pub fn set_pending_input(&self, text: impl Into<String>) {
        *self.pending_input.lock() = text.into();
    }

    pub(crate) fn clear_pending_input(&self) {
        self.pending_input.lock().clear();
    }
}

/// Why an operation was refused.  A refused call changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Refused {
    #[error("no session is available")]
    NoSession,
    #[error("an upload batch is already running")]
    UploadInProgress,
    #[error("still waiting for the previous answer")]
    AwaitingAnswer,
    #[error("message is empty")]
    EmptyUtterance,
    #[error("upload a document before chatting")]
    NoDocuments,
}

impl Refused {
    pub(crate) fn traced(self, operation: &str) -> Self {
        tracing::debug!(operation, reason = %self, "operation refused");
        dc_domain::trace::TraceEvent::OperationRejected {
            operation: operation.to_owned(),
            reason: self.to_string(),
        }
        .emit();
        self
    }
}
