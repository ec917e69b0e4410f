//! Text rendering of conversation state for the terminal.
//!
//! Everything here returns plain strings; colour is applied by the caller
//! so the formatting stays testable.

use dc_sessions::{
    DocumentRecord, EntryKind, EntryPayload, Rejection, SessionStatus, SourceExcerpt,
    TimelineEntry,
};

/// Longest excerpt shown under an answer, in characters.
const EXCERPT_CHARS: usize = 160;

pub fn entry(e: &TimelineEntry) -> String {
    let who = match e.kind {
        EntryKind::User => "you",
        EntryKind::Bot => "bot",
        EntryKind::System => "system",
        EntryKind::Error => "error",
    };
    let mut out = format!("[{}] {who}> {}", e.timestamp, e.payload.text());
    if let EntryPayload::Answer(answer) = &e.payload {
        if !answer.sources.is_empty() {
            out.push_str("\n  Sources:");
            for (i, source) in answer.sources.iter().enumerate() {
                out.push('\n');
                out.push_str(&source_line(i + 1, source));
            }
        }
    }
    out
}

fn source_line(n: usize, source: &SourceExcerpt) -> String {
    let excerpt = source.excerpt.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("    [{n}] {}: {}", source.label, truncate(&excerpt, EXCERPT_CHARS))
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_owned(),
    }
}

/// ANSI colour for an entry kind.
pub fn paint(kind: EntryKind, text: &str) -> String {
    let code = match kind {
        EntryKind::User => "1",
        EntryKind::Bot => "0",
        EntryKind::System => "2",
        EntryKind::Error => "31",
    };
    format!("\x1B[{code}m{text}\x1B[0m")
}

pub fn documents(docs: &[DocumentRecord]) -> String {
    if docs.is_empty() {
        return "No documents uploaded yet.".into();
    }
    let mut out = format!("Documents ({}):", docs.len());
    for d in docs {
        let when = d
            .uploaded_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown time".into());
        out.push_str(&format!(
            "\n  {}  ({} chunks, {when})",
            d.filename, d.chunk_count
        ));
    }
    out
}

pub fn session(status: &SessionStatus) -> String {
    match status {
        SessionStatus::Pending => "connecting…".into(),
        SessionStatus::Ready(id) => format!("session {id}"),
        SessionStatus::Unavailable { reason } => format!("no session ({reason})"),
    }
}

pub fn rejection(r: &Rejection) -> String {
    format!("skipped {}: {}", r.path.display(), r.reason)
}
