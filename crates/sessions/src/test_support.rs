//! Scripted in-memory backend for orchestration tests.
//!
//! Each endpoint pops its next queued result; an empty queue answers with
//! a 500 so a test that forgets to script a call fails loudly.  Chat and
//! upload calls can be held open on a `Notify` to observe in-flight state;
//! only held calls signal `entered`, so earlier unheld calls leave no
//! stale permit behind.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use dc_client::{
    ChatReply, ChatRequest, ChatResponse, DocChatBackend, DocumentDto, DocumentsResponse,
    InsightsResponse, SessionCreated, SessionDeleted, SourceDto, StructuredAnswer,
    SummaryResponse, UploadRequest, UploadResponse,
};
use dc_domain::error::{Error, Result};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub fn backend_error(status: u16, message: Option<&str>) -> Error {
    Error::Backend {
        endpoint: "test".into(),
        status,
        message: message.map(str::to_owned),
    }
}

pub fn doc(filename: &str, chunks: u32) -> DocumentDto {
    DocumentDto {
        filename: filename.into(),
        chunks,
        upload_time: "2024-05-01T10:15:30.000001".into(),
        insights: None,
    }
}

pub fn uploaded(docs: &[(&str, u32)]) -> Result<UploadResponse> {
    Ok(UploadResponse {
        documents: docs.iter().map(|(n, c)| doc(n, *c)).collect(),
        message: Some("Document processed successfully".into()),
        session_id: None,
        insights: None,
    })
}

pub fn text_reply(text: &str) -> Result<ChatResponse> {
    Ok(ChatResponse {
        response: ChatReply::Text(text.into()),
    })
}

pub fn structured_reply(answer: &str, sources: &[(&str, &str)]) -> Result<ChatResponse> {
    Ok(ChatResponse {
        response: ChatReply::Structured(StructuredAnswer {
            answer: answer.into(),
            sources: Some(
                sources
                    .iter()
                    .map(|(s, c)| SourceDto {
                        source: (*s).into(),
                        content: (*c).into(),
                    })
                    .collect(),
            ),
            insights: None,
        }),
    })
}

#[derive(Default)]
pub struct ScriptedBackend {
    sessions: Mutex<VecDeque<Result<SessionCreated>>>,
    uploads: Mutex<VecDeque<Result<UploadResponse>>>,
    chats: Mutex<VecDeque<Result<ChatResponse>>>,
    documents: Mutex<VecDeque<Result<DocumentsResponse>>>,

    session_calls: Mutex<usize>,
    upload_calls: Mutex<Vec<UploadRequest>>,
    chat_calls: Mutex<Vec<ChatRequest>>,
    deleted: Mutex<Vec<String>>,

    hold_chat: Mutex<Option<Arc<Notify>>>,
    hold_upload: Mutex<Option<Arc<Notify>>>,
    /// Signalled when a held chat or upload call enters the backend.
    pub entered: Notify,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_session(&self, result: std::result::Result<&str, Error>) {
        self.sessions.lock().push_back(result.map(|id| SessionCreated {
            session_id: id.to_owned(),
        }));
    }

    pub fn push_upload(&self, result: Result<UploadResponse>) {
        self.uploads.lock().push_back(result);
    }

    pub fn push_chat(&self, result: Result<ChatResponse>) {
        self.chats.lock().push_back(result);
    }

    pub fn push_documents(&self, result: Result<DocumentsResponse>) {
        self.documents.lock().push_back(result);
    }

    /// Make every chat call wait on the returned `Notify` before answering.
    pub fn hold_chat(&self) -> Arc<Notify> {
        let n = Arc::new(Notify::new());
        *self.hold_chat.lock() = Some(n.clone());
        n
    }

    /// Make every upload call wait on the returned `Notify` before answering.
    pub fn hold_upload(&self) -> Arc<Notify> {
        let n = Arc::new(Notify::new());
        *self.hold_upload.lock() = Some(n.clone());
        n
    }

    pub fn session_calls(&self) -> usize {
        *self.session_calls.lock()
    }

    pub fn upload_calls(&self) -> Vec<UploadRequest> {
        self.upload_calls.lock().clone()
    }

    pub fn chat_calls(&self) -> Vec<ChatRequest> {
        self.chat_calls.lock().clone()
    }

    pub fn deleted_sessions(&self) -> Vec<String> {
        self.deleted.lock().clone()
    }
}

fn unscripted<T>(endpoint: &str) -> Result<T> {
    Err(Error::Backend {
        endpoint: endpoint.into(),
        status: 500,
        message: Some(format!("unscripted call to {endpoint}")),
    })
}

#[async_trait]
impl DocChatBackend for ScriptedBackend {
    async fn create_session(&self) -> Result<SessionCreated> {
        *self.session_calls.lock() += 1;
        let next = self.sessions.lock().pop_front();
        next.unwrap_or_else(|| unscripted("POST /session"))
    }

    async fn upload(&self, req: UploadRequest) -> Result<UploadResponse> {
        self.upload_calls.lock().push(req);
        let hold = self.hold_upload.lock().clone();
        if let Some(n) = hold {
            self.entered.notify_one();
            n.notified().await;
        }
        let next = self.uploads.lock().pop_front();
        next.unwrap_or_else(|| unscripted("POST /upload"))
    }

    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        self.chat_calls.lock().push(req);
        let hold = self.hold_chat.lock().clone();
        if let Some(n) = hold {
            self.entered.notify_one();
            n.notified().await;
        }
        let next = self.chats.lock().pop_front();
        next.unwrap_or_else(|| unscripted("POST /chat"))
    }

    async fn documents(&self, _session_id: &str) -> Result<DocumentsResponse> {
        let next = self.documents.lock().pop_front();
        next.unwrap_or_else(|| unscripted("GET /documents"))
    }

    async fn summary(&self, session_id: &str, filename: Option<&str>) -> Result<SummaryResponse> {
        Ok(SummaryResponse {
            summary: serde_json::json!({ "session": session_id, "filename": filename }),
        })
    }

    async fn insights(&self, session_id: &str, question: &str) -> Result<InsightsResponse> {
        Ok(InsightsResponse {
            insights: serde_json::json!({ "session": session_id, "question": question }),
        })
    }

    async fn delete_session(&self, session_id: &str) -> Result<SessionDeleted> {
        self.deleted.lock().push(session_id.to_owned());
        Ok(SessionDeleted {
            message: Some("Session deleted successfully".into()),
        })
    }
}
