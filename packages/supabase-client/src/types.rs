use serde::{Deserialize, Serialize};

/// Error body shared by PostgREST (`message`, `code`, `details`, `hint`)
/// and Storage (`statusCode`, `error`, `message`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    /// Storage reports its own status here, as a string or a number
    #[serde(default, rename = "statusCode")]
    pub status_code: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Status the body reports, which Storage sets independently of the
    /// HTTP status (a missing object is HTTP 400 with `"statusCode":"404"`).
    pub fn reported_status(&self) -> Option<u16> {
        match self.status_code.as_ref()? {
            serde_json::Value::String(s) => s.trim().parse().ok(),
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            _ => None,
        }
    }

    /// Machine-readable error code: Storage's `error`, else PostgREST's `code`.
    pub fn error_code(&self) -> Option<String> {
        self.error
            .clone()
            .filter(|e| !e.is_empty())
            .or_else(|| self.code.clone().filter(|c| !c.is_empty()))
    }

    pub fn into_message(self, fallback: String) -> String {
        self.message
            .filter(|m| !m.is_empty())
            .or(self.error.filter(|e| !e.is_empty()))
            .unwrap_or(fallback)
    }
}

/// Sort order for a storage listing.
#[derive(Debug, Clone, Serialize)]
pub struct SortBy {
    pub column: String,
    pub order: String,
}

/// Body of `POST /storage/v1/object/list/{bucket}`.
#[derive(Debug, Clone, Serialize)]
pub struct ListOptions {
    pub prefix: String,
    pub limit: u32,
    pub offset: u32,
    #[serde(rename = "sortBy")]
    pub sort_by: SortBy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListOptions {
    /// First object at the bucket root whose name matches `search`.
    pub fn search_first(search: &str) -> Self {
        Self {
            prefix: String::new(),
            limit: 1,
            offset: 0,
            sort_by: SortBy {
                column: "name".to_string(),
                order: "asc".to_string(),
            },
            search: Some(search.to_string()),
        }
    }
}

/// An entry returned by a storage listing.
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignUrlRequest {
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SignUrlResponse {
    #[serde(rename = "signedURL")]
    pub signed_url: String,
}
