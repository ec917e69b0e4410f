//! `dc-client`: backend client crate for docchat.
//!
//! Provides the [`DocChatBackend`] trait that abstracts over the
//! document-chat service, a production REST implementation
//! ([`RestDocChatClient`]) and typed DTOs matching the service's JSON
//! contract.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use dc_domain::config::BackendConfig;
//! use dc_client::{ChatRequest, DocChatBackend, RestDocChatClient};
//!
//! # async fn example() -> dc_domain::error::Result<()> {
//! let client = RestDocChatClient::new(&BackendConfig::default())?;
//! let session = client.create_session().await?;
//!
//! let reply = client
//!     .chat(ChatRequest {
//!         session_id: session.session_id,
//!         question: "What is the capital of France?".into(),
//!     })
//!     .await?;
//!
//! println!("{}", reply.response.answer_text());
//! # Ok(())
//! # }
//! ```

pub mod provider;
pub mod rest;
pub mod types;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use provider::DocChatBackend;
pub use rest::{from_reqwest, RestDocChatClient};
pub use types::{
    parse_upload_time, ChatReply, ChatRequest, ChatResponse, DocumentDto, DocumentsResponse,
    ErrorBody, InsightsRequest, InsightsResponse, SessionCreated, SessionDeleted, SourceDto,
    StructuredAnswer, SummaryResponse, UploadRequest, UploadResponse,
};
