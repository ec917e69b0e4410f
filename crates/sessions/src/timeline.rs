//! Append-only conversation timeline.
//!
//! Insertion order is display order.  Entries are never edited, removed,
//! reordered or deduplicated once appended.

use dc_client::{ChatReply, SourceDto};
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    User,
    Bot,
    System,
    Error,
}

/// One cited passage backing an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceExcerpt {
    pub label: String,
    pub excerpt: String,
}

impl From<SourceDto> for SourceExcerpt {
    fn from(dto: SourceDto) -> Self {
        Self {
            label: dto.source,
            excerpt: dto.content,
        }
    }
}

/// A grounded answer with its sources in retrieval order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<SourceExcerpt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryPayload {
    Text(String),
    Answer(Answer),
}

impl EntryPayload {
    pub fn text(&self) -> &str {
        match self {
            EntryPayload::Text(t) => t,
            EntryPayload::Answer(a) => &a.text,
        }
    }
}

impl From<ChatReply> for EntryPayload {
    fn from(reply: ChatReply) -> Self {
        match reply {
            ChatReply::Text(text) => EntryPayload::Text(text),
            ChatReply::Structured(s) => EntryPayload::Answer(Answer {
                text: s.answer,
                sources: s
                    .sources
                    .unwrap_or_default()
                    .into_iter()
                    .map(SourceExcerpt::from)
                    .collect(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub kind: EntryKind,
    pub payload: EntryPayload,
    /// Local wall-clock time of the append, `HH:MM:SS`.
    pub timestamp: String,
}

impl TimelineEntry {
    pub fn new(kind: EntryKind, payload: EntryPayload) -> Self {
        Self {
            kind,
            payload,
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn text(kind: EntryKind, text: impl Into<String>) -> Self {
        Self::new(kind, EntryPayload::Text(text.into()))
    }
}

#[derive(Default)]
pub struct ConversationTimeline {
    entries: RwLock<Vec<TimelineEntry>>,
}

impl ConversationTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry.  Returns its position.
    pub fn append(&self, entry: TimelineEntry) -> usize {
        let mut entries = self.entries.write();
        entries.push(entry);
        entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<TimelineEntry> {
        self.entries.read().clone()
    }

    /// Entries at positions `cursor..`.  Presentation keeps the cursor
    /// to render only what is new.
    pub fn since(&self, cursor: usize) -> Vec<TimelineEntry> {
        self.entries
            .read()
            .get(cursor..)
            .map(<[TimelineEntry]>::to_vec)
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<TimelineEntry> {
        self.entries.read().last().cloned()
    }
}
