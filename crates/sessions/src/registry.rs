//! Client-side mirror of the backend's document list.
//!
//! The list is only ever replaced wholesale with what the backend last
//! reported; the client never adds, merges or removes records itself.

use chrono::NaiveDateTime;
use dc_client::{parse_upload_time, DocumentDto};
use dc_domain::trace::TraceEvent;
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    pub filename: String,
    pub chunk_count: u32,
    /// `None` when the backend's timestamp could not be parsed.
    pub uploaded_at: Option<NaiveDateTime>,
}

impl From<DocumentDto> for DocumentRecord {
    fn from(dto: DocumentDto) -> Self {
        let uploaded_at = parse_upload_time(&dto.upload_time);
        if uploaded_at.is_none() {
            tracing::debug!(
                filename = %dto.filename,
                raw = %dto.upload_time,
                "unparseable upload_time"
            );
        }
        Self {
            filename: dto.filename,
            chunk_count: dto.chunks,
            uploaded_at,
        }
    }
}

#[derive(Default)]
pub struct DocumentRegistry {
    records: RwLock<Vec<DocumentRecord>>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with the backend's latest report.
    pub fn replace_all(&self, documents: Vec<DocumentDto>) {
        let records: Vec<DocumentRecord> = documents.into_iter().map(Into::into).collect();
        let count = records.len();
        *self.records.write() = records;
        TraceEvent::RegistryReplaced { documents: count }.emit();
    }

    pub fn snapshot(&self) -> Vec<DocumentRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
