use thiserror::Error;

pub type Result<T> = std::result::Result<T, SupabaseError>;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// `status` is the status the error body reports when it carries one,
    /// otherwise the HTTP status.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Expected at most one row from {table}, got {count}")]
    MultipleRows { table: String, count: usize },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SupabaseError {
    /// HTTP status of an API error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SupabaseError::Api { status, .. } => Some(*status),
            SupabaseError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The requested row or object does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            SupabaseError::Api { status, code, .. } => {
                *status == 404
                    || matches!(code.as_deref(), Some("not_found") | Some("NoSuchKey"))
            }
            _ => false,
        }
    }
}
