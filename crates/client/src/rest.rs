//! REST implementation of [`DocChatBackend`].
//!
//! `RestDocChatClient` wraps a `reqwest::Client` and translates every
//! trait method into the corresponding HTTP call against the
//! document-chat service.  Each request is sent exactly once; failed
//! calls are reported to the caller and never retried here.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dc_domain::config::BackendConfig;
use dc_domain::error::{Error, Result};
use dc_domain::trace::TraceEvent;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::provider::DocChatBackend;
use crate::types::{
    ChatRequest, ChatResponse, DocumentsResponse, ErrorBody, InsightsRequest, InsightsResponse,
    SessionCreated, SessionDeleted, SummaryResponse, UploadRequest, UploadResponse,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST-based client for the document-chat service.
///
/// Created once and reused for the lifetime of the process.
/// The underlying `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestDocChatClient {
    http: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl RestDocChatClient {
    /// The configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a new client from the shared `BackendConfig`.
    pub fn new(cfg: &BackendConfig) -> Result<Self> {
        let timeout = cfg.timeout_ms.map(Duration::from_millis);
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().map_err(|e| Error::Http(e.to_string()))?;

        let base_url = cfg.base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(Error::Config("backend.base_url must not be empty".into()));
        }

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Decorate a `RequestBuilder` with the standard docchat headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        let trace_id = Uuid::new_v4().to_string();
        rb.header("X-Client-Type", "docchat")
            .header("X-Trace-Id", trace_id)
    }

    /// Build the full URL for a path like `/chat`.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request once and map non-2xx answers to `Error::Backend`.
    ///
    /// Emits a `TraceEvent::BackendCall` for every attempt, successful
    /// or not.
    async fn execute(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                TraceEvent::BackendCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status().as_u16();
        TraceEvent::BackendCall {
            endpoint: endpoint.to_owned(),
            status,
            duration_ms,
        }
        .emit();

        if resp.status().is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);
        if message.is_none() {
            tracing::debug!(endpoint, status, body = %body, "non-2xx without error field");
        }
        Err(Error::Backend {
            endpoint: endpoint.to_owned(),
            status,
            message,
        })
    }

    /// Read the body and decode it as `T`.
    async fn decode<T: DeserializeOwned>(&self, endpoint: &str, resp: Response) -> Result<T> {
        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| Error::Decode {
            endpoint: endpoint.to_owned(),
            message: format!("{e}: {body}"),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl DocChatBackend for RestDocChatClient {
    async fn create_session(&self) -> Result<SessionCreated> {
        let endpoint = "POST /session";
        let resp = self
            .execute(endpoint, self.http.post(self.url("/session")))
            .await?;
        self.decode(endpoint, resp).await
    }

    async fn upload(&self, req: UploadRequest) -> Result<UploadResponse> {
        let endpoint = "POST /upload";
        let file_part = Part::bytes(req.bytes)
            .file_name(req.filename)
            .mime_str(&req.mime)
            .map_err(from_reqwest)?;
        let form = Form::new()
            .part("file", file_part)
            .text("session_id", req.session_id);

        let resp = self
            .execute(endpoint, self.http.post(self.url("/upload")).multipart(form))
            .await?;
        self.decode(endpoint, resp).await
    }

    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        let endpoint = "POST /chat";
        let resp = self
            .execute(endpoint, self.http.post(self.url("/chat")).json(&req))
            .await?;
        self.decode(endpoint, resp).await
    }

    async fn documents(&self, session_id: &str) -> Result<DocumentsResponse> {
        let endpoint = "GET /documents";
        let resp = self
            .execute(
                endpoint,
                self.http.get(self.url(&format!("/documents/{session_id}"))),
            )
            .await?;
        self.decode(endpoint, resp).await
    }

    async fn summary(&self, session_id: &str, filename: Option<&str>) -> Result<SummaryResponse> {
        let endpoint = "GET /summary";
        let mut rb = self.http.get(self.url(&format!("/summary/{session_id}")));
        if let Some(name) = filename {
            rb = rb.query(&[("filename", name)]);
        }
        let resp = self.execute(endpoint, rb).await?;
        self.decode(endpoint, resp).await
    }

    async fn insights(&self, session_id: &str, question: &str) -> Result<InsightsResponse> {
        let endpoint = "POST /insights";
        let body = InsightsRequest {
            question: question.to_owned(),
        };
        let resp = self
            .execute(
                endpoint,
                self.http
                    .post(self.url(&format!("/insights/{session_id}")))
                    .json(&body),
            )
            .await?;
        self.decode(endpoint, resp).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<SessionDeleted> {
        let endpoint = "DELETE /session";
        let resp = self
            .execute(
                endpoint,
                self.http.delete(self.url(&format!("/session/{session_id}"))),
            )
            .await?;
        self.decode(endpoint, resp).await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let cfg = BackendConfig {
            base_url: "http://localhost:5001/".into(),
            timeout_ms: None,
        };
        let client = RestDocChatClient::new(&cfg).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5001");
        assert_eq!(client.url("/chat"), "http://localhost:5001/chat");
        assert!(client.timeout().is_none());
    }

    #[test]
    fn timeout_is_optional() {
        let cfg = BackendConfig {
            base_url: "http://localhost:5001".into(),
            timeout_ms: Some(1500),
        };
        let client = RestDocChatClient::new(&cfg).unwrap();
        assert_eq!(client.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn empty_base_url_rejected() {
        let cfg = BackendConfig {
            base_url: "/".into(),
            timeout_ms: None,
        };
        assert!(matches!(
            RestDocChatClient::new(&cfg),
            Err(Error::Config(_))
        ));
    }
}
