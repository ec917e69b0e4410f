//! Data Transfer Objects matching the document-chat service's JSON
//! contract.
//!
//! The service speaks `snake_case` on the wire, which is also the Rust
//! field naming, so no renames are needed.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// POST /session: response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
}

/// DELETE /session/{sessionId}: response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDeleted {
    #[serde(default)]
    pub message: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Documents
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One ingested document as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDto {
    pub filename: String,
    pub chunks: u32,
    /// ISO-8601 string; the service usually omits the timezone suffix.
    pub upload_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<serde_json::Value>,
}

/// A file ready to be sent to POST /upload.  Not serialized: the REST
/// client turns it into a multipart form (`file` + `session_id`).
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub session_id: String,
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// POST /upload: success body.  `documents` is the session's complete
/// document list, not just the file that was added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub documents: Vec<DocumentDto>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub insights: Option<serde_json::Value>,
}

/// GET /documents/{sessionId}: response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsResponse {
    pub documents: Vec<DocumentDto>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// POST /chat: request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub question: String,
}

/// POST /chat: success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: ChatReply,
}

/// The `response` field is either a bare string or a structured answer
/// with its supporting sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatReply {
    Text(String),
    Structured(StructuredAnswer),
}

impl ChatReply {
    pub fn answer_text(&self) -> &str {
        match self {
            ChatReply::Text(text) => text,
            ChatReply::Structured(s) => &s.answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub answer: String,
    /// Order is retrieval rank and must be preserved.
    #[serde(default)]
    pub sources: Option<Vec<SourceDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDto {
    pub source: String,
    pub content: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Summary / insights
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /summary/{sessionId}: response body.  The summary layout is
/// owned by the service, so it stays untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: serde_json::Value,
}

/// POST /insights/{sessionId}: request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsRequest {
    pub question: String,
}

/// POST /insights/{sessionId}: response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub insights: serde_json::Value,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Body of every non-2xx answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Timestamp helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse an `upload_time` value.
///
/// Accepts RFC 3339 (wall-clock time in the given offset is kept) and the
/// naive `YYYY-MM-DDTHH:MM:SS[.ffffff]` form the service emits by default.
pub fn parse_upload_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn chat_reply_plain_string() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"response": "No documents have been uploaded yet."}"#)
                .unwrap();
        assert_eq!(
            resp.response,
            ChatReply::Text("No documents have been uploaded yet.".into())
        );
    }

    #[test]
    fn chat_reply_structured_keeps_source_order() {
        let body = r#"{
            "response": {
                "answer": "Paris is the capital.",
                "sources": [
                    {"source": "doc1.pdf", "content": "Paris ..."},
                    {"source": "doc2.txt", "content": "France ..."}
                ],
                "insights": {"related_topics": []}
            }
        }"#;
        let resp: ChatResponse = serde_json::from_str(body).unwrap();
        let ChatReply::Structured(answer) = resp.response else {
            panic!("expected structured answer");
        };
        assert_eq!(answer.answer, "Paris is the capital.");
        let sources = answer.sources.unwrap();
        assert_eq!(sources[0].source, "doc1.pdf");
        assert_eq!(sources[1].source, "doc2.txt");
        assert!(answer.insights.is_some());
    }

    #[test]
    fn chat_reply_structured_without_sources() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"response": {"answer": "42", "sources": null}}"#).unwrap();
        assert_eq!(resp.response.answer_text(), "42");
        let ChatReply::Structured(answer) = resp.response else {
            panic!("expected structured answer");
        };
        assert!(answer.sources.is_none());
    }

    #[test]
    fn upload_response_requires_documents() {
        let err = serde_json::from_str::<UploadResponse>(r#"{"message": "ok"}"#);
        assert!(err.is_err());

        let ok: UploadResponse = serde_json::from_str(
            r#"{
                "message": "Document processed",
                "session_id": "abc",
                "insights": {},
                "documents": [
                    {"filename": "notes.txt", "chunks": 3, "upload_time": "2024-05-01T10:15:30.123456"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(ok.documents.len(), 1);
        assert_eq!(ok.documents[0].chunks, 3);
    }

    #[test]
    fn upload_time_naive_iso() {
        let t = parse_upload_time("2024-05-01T10:15:30.123456").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2024, 5, 1));
        assert_eq!((t.hour(), t.minute(), t.second()), (10, 15, 30));
    }

    #[test]
    fn upload_time_rfc3339_keeps_wall_clock() {
        let t = parse_upload_time("2024-05-01T10:15:30+02:00").unwrap();
        assert_eq!(t.hour(), 10);
    }

    #[test]
    fn upload_time_garbage() {
        assert!(parse_upload_time("yesterday").is_none());
    }
}
