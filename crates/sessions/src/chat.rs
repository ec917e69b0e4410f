//! Chat turn controller.
//!
//! One user utterance in, one `bot` or `error` entry out.  At most one
//! chat request is outstanding at a time; a call made while one is in
//! flight is refused rather than queued.

use std::sync::Arc;
use std::time::Instant;

use dc_client::{ChatRequest, DocChatBackend};
use dc_domain::trace::TraceEvent;

use crate::state::{ConversationState, Refused};
use crate::timeline::{EntryKind, EntryPayload, TimelineEntry};

/// How a turn that was accepted ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Answered,
    Failed,
}

#[derive(Clone)]
pub struct ChatTurnController {
    backend: Arc<dyn DocChatBackend>,
    state: Arc<ConversationState>,
}

impl ChatTurnController {
    pub fn new(backend: Arc<dyn DocChatBackend>, state: Arc<ConversationState>) -> Self {
        Self { backend, state }
    }

    /// Run one turn.
    ///
    /// The `user` entry is appended and the pending input cleared before
    /// the request is sent.  `awaiting_answer` is released when this
    /// future completes or is dropped, whatever the outcome.
    pub async fn send_turn(&self, utterance: &str) -> Result<TurnOutcome, Refused> {
        if utterance.trim().is_empty() {
            return Err(Refused::EmptyUtterance.traced("chat"));
        }
        let Some(session_id) = self.state.session.session_id() else {
            return Err(Refused::NoSession.traced("chat"));
        };
        if self.state.documents.is_empty() {
            return Err(Refused::NoDocuments.traced("chat"));
        }
        let Some(_awaiting) = self.state.awaiting_answer.try_acquire() else {
            return Err(Refused::AwaitingAnswer.traced("chat"));
        };

        self.state
            .timeline
            .append(TimelineEntry::text(EntryKind::User, utterance));
        self.state.clear_pending_input();

        let start = Instant::now();
        let result = self
            .backend
            .chat(ChatRequest {
                session_id,
                question: utterance.to_owned(),
            })
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(resp) => {
                let payload = EntryPayload::from(resp.response);
                let sources = match &payload {
                    EntryPayload::Answer(a) => a.sources.len(),
                    EntryPayload::Text(_) => 0,
                };
                self.state
                    .timeline
                    .append(TimelineEntry::new(EntryKind::Bot, payload));
                TraceEvent::ChatTurnFinished {
                    ok: true,
                    sources,
                    duration_ms,
                }
                .emit();
                Ok(TurnOutcome::Answered)
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat turn failed");
                let detail = e.backend_message().unwrap_or("Failed to get response");
                self.state.timeline.append(TimelineEntry::text(
                    EntryKind::Error,
                    format!("Error: {detail}"),
                ));
                TraceEvent::ChatTurnFinished {
                    ok: false,
                    sources: 0,
                    duration_ms,
                }
                .emit();
                Ok(TurnOutcome::Failed)
            }
        }
    }
}
