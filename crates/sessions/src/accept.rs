//! Upload acceptance filter.
//!
//! Decides which candidate files may be handed to the upload sequencer.
//! Only plain text, PDF and Word (`.docx`) documents within the configured
//! size limit pass; everything else is rejected here and never reaches
//! the backend.

use std::path::{Path, PathBuf};

use dc_domain::config::UploadConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    WordDocument,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::WordDocument),
            _ => None,
        }
    }

    /// Kind from a file name's extension.
    pub fn from_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Pdf => "pdf",
            Self::WordDocument => "docx",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Pdf => "application/pdf",
            Self::WordDocument => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Where an accepted file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// Read by the sequencer when the file's turn comes.
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file that passed the acceptance filter.
#[derive(Debug, Clone)]
pub struct UploadFile {
    name: String,
    kind: DocumentKind,
    content: FileContent,
}

impl UploadFile {
    /// In-memory file.  Fails when the name has no supported extension.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, RejectReason> {
        let name = name.into();
        let kind = DocumentKind::from_name(&name).ok_or(RejectReason::UnsupportedType)?;
        Ok(Self {
            name,
            kind,
            content: FileContent::Bytes(bytes),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }

    /// Consume the handle and load its bytes.
    pub async fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        match self.content {
            FileContent::Bytes(b) => Ok(b),
            FileContent::Path(p) => tokio::fs::read(&p).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("unsupported file type (accepted: PDF, TXT, DOCX)")]
    UnsupportedType,
    #[error(".{0} files are disabled by configuration")]
    NotAllowed(String),
    #[error("cannot read file: {0}")]
    Unreadable(String),
    #[error("not a regular file")]
    NotAFile,
    #[error("file is {size} bytes; limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub path: PathBuf,
    pub reason: RejectReason,
}

/// Split candidate paths into accepted uploads and rejections, keeping
/// the input order within each side.
pub fn partition<I, P>(paths: I, cfg: &UploadConfig) -> (Vec<UploadFile>, Vec<Rejection>)
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match check(path, cfg) {
            Ok(file) => accepted.push(file),
            Err(reason) => {
                tracing::debug!(path = %path.display(), %reason, "upload candidate rejected");
                rejected.push(Rejection {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        }
    }

    (accepted, rejected)
}

fn check(path: &Path, cfg: &UploadConfig) -> Result<UploadFile, RejectReason> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or(RejectReason::UnsupportedType)?;
    let kind = DocumentKind::from_extension(ext).ok_or(RejectReason::UnsupportedType)?;
    if !cfg.allows_extension(kind.extension()) {
        return Err(RejectReason::NotAllowed(kind.extension().to_owned()));
    }

    let meta = std::fs::metadata(path).map_err(|e| RejectReason::Unreadable(e.to_string()))?;
    if !meta.is_file() {
        return Err(RejectReason::NotAFile);
    }
    if meta.len() > cfg.max_file_bytes {
        return Err(RejectReason::TooLarge {
            size: meta.len(),
            limit: cfg.max_file_bytes,
        });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(UploadFile {
        name,
        kind,
        content: FileContent::Path(path.to_path_buf()),
    })
}
