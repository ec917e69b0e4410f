/// Shared error type used across all docchat crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The backend answered with a non-2xx status.  `message` holds the
    /// `error` field of the JSON body when the backend supplied one.
    #[error("{endpoint} returned {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Backend {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },

    #[error("decode {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The error text reported by the backend itself, if any.
    ///
    /// Only `Backend` errors with an `error` field in the body qualify;
    /// transport and decode failures have nothing the user should see
    /// verbatim.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Error::Backend {
                message: Some(m), ..
            } if !m.trim().is_empty() => Some(m.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_only_for_reported_errors() {
        let reported = Error::Backend {
            endpoint: "POST /chat".into(),
            status: 404,
            message: Some("No documents found for this session".into()),
        };
        assert_eq!(
            reported.backend_message(),
            Some("No documents found for this session")
        );

        let silent = Error::Backend {
            endpoint: "POST /chat".into(),
            status: 502,
            message: None,
        };
        assert_eq!(silent.backend_message(), None);

        let blank = Error::Backend {
            endpoint: "POST /chat".into(),
            status: 500,
            message: Some("  ".into()),
        };
        assert_eq!(blank.backend_message(), None);

        assert_eq!(Error::Http("connection refused".into()).backend_message(), None);
    }

    #[test]
    fn backend_display_includes_status() {
        let err = Error::Backend {
            endpoint: "POST /upload".into(),
            status: 400,
            message: Some("Invalid file type".into()),
        };
        assert_eq!(err.to_string(), "POST /upload returned 400: Invalid file type");
    }
}
