//! The `DocChatBackend` trait defines the interface for every
//! document-chat backend (REST, test doubles).

use async_trait::async_trait;
use dc_domain::error::Result;

use crate::types::{
    ChatRequest, ChatResponse, DocumentsResponse, InsightsResponse, SessionCreated,
    SessionDeleted, SummaryResponse, UploadRequest, UploadResponse,
};

/// Abstraction over the document-chat service API surface.
///
/// Implementations may talk to the real REST API or a test double.
/// Non-2xx answers must surface as `Error::Backend` carrying the body's
/// `error` field so callers can show the backend's own wording.
#[async_trait]
pub trait DocChatBackend: Send + Sync {
    /// Create a conversation session (POST /session).
    async fn create_session(&self) -> Result<SessionCreated>;

    /// Upload one document into a session (POST /upload, multipart).
    async fn upload(&self, req: UploadRequest) -> Result<UploadResponse>;

    /// Ask a question grounded in the session's documents (POST /chat).
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse>;

    /// List the session's documents (GET /documents/{sessionId}).
    async fn documents(&self, session_id: &str) -> Result<DocumentsResponse>;

    /// Summarise one or all documents (GET /summary/{sessionId}).
    async fn summary(&self, session_id: &str, filename: Option<&str>) -> Result<SummaryResponse>;

    /// Contextual insights for a question (POST /insights/{sessionId}).
    async fn insights(&self, session_id: &str, question: &str) -> Result<InsightsResponse>;

    /// Drop the session and its server-side resources (DELETE /session/{sessionId}).
    async fn delete_session(&self, session_id: &str) -> Result<SessionDeleted>;
}
