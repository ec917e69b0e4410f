//! Conversation orchestration for docchat.
//!
//! Owns the client-side state of one document-grounded conversation:
//! the server-issued session, the backend-confirmed document list, the
//! append-only timeline, and the two in-flight gates that keep uploads
//! and chat turns single-flight.  All backend traffic goes through a
//! [`dc_client::DocChatBackend`].

pub mod accept;
pub mod chat;
pub mod conversation;
pub mod gate;
pub mod registry;
pub mod state;
pub mod store;
pub mod timeline;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use accept::{partition, DocumentKind, FileContent, RejectReason, Rejection, UploadFile};
pub use chat::{ChatTurnController, TurnOutcome};
pub use conversation::{Conversation, QueryError};
pub use gate::{GateGuard, InFlightGate};
pub use registry::{DocumentRecord, DocumentRegistry};
pub use state::{ConversationState, Refused};
pub use store::{SessionStatus, SessionStore};
pub use timeline::{
    Answer, ConversationTimeline, EntryKind, EntryPayload, SourceExcerpt, TimelineEntry,
};
pub use upload::{UploadReport, UploadSequencer};
