//! Pure Supabase REST client.
//!
//! A minimal client for the two Supabase surfaces this workspace needs:
//! PostgREST point lookups and Storage object listing / signed downloads.
//! Every call takes the bearer token to present, so callers own token
//! minting and expiry.
//!
//! # Example
//!
//! ```rust,ignore
//! use supabase_client::SupabaseClient;
//!
//! let client = SupabaseClient::new(url, anon_key, "public".into());
//! let row: Option<serde_json::Value> = client
//!     .select_single(&token, "song_generations", "*", "generation_id", id)
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SupabaseError};
pub use types::{FileObject, ListOptions, SortBy};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use types::{ApiErrorBody, SignUrlRequest, SignUrlResponse};

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    schema: String,
}

impl SupabaseClient {
    pub fn new(base_url: String, anon_key: String, schema: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            schema,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch at most one row of `table` where `key_column = key_value`.
    ///
    /// Zero rows is `Ok(None)`, not an error.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        token: &str,
        table: &str,
        columns: &str,
        key_column: &str,
        key_value: &str,
    ) -> Result<Option<T>> {
        let filter = format!("eq.{}", key_value);
        tracing::debug!(table, key_column, key_value, "PostgREST lookup");

        let resp = self
            .client
            .get(self.rest_url(table))
            .query(&[("select", columns), (key_column, filter.as_str())])
            .header("apikey", &self.anon_key)
            .header("Accept-Profile", &self.schema)
            .bearer_auth(token)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let mut rows: Vec<T> = resp.json().await?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            count => Err(SupabaseError::MultipleRows {
                table: table.to_string(),
                count,
            }),
        }
    }

    /// List objects in `bucket` matching the given options.
    pub async fn list_objects(
        &self,
        token: &str,
        bucket: &str,
        options: &ListOptions,
    ) -> Result<Vec<FileObject>> {
        let url = self.storage_url(&format!("object/list/{}", bucket));
        tracing::debug!(bucket, search = ?options.search, "Storage listing");

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .json(options)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let files: Vec<FileObject> = resp.json().await?;
        Ok(files)
    }

    /// Issue an absolute signed URL for `path` in `bucket`, valid for `expires_in` seconds.
    pub async fn create_signed_url(
        &self,
        token: &str,
        bucket: &str,
        path: &str,
        expires_in: u64,
    ) -> Result<String> {
        let url = self.storage_url(&format!("object/sign/{}/{}", bucket, path));

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .json(&SignUrlRequest { expires_in })
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let signed: SignUrlResponse = resp.json().await?;
        Ok(self.absolute_signed_url(&signed.signed_url))
    }

    /// Download the raw bytes behind a signed URL.
    pub async fn download(&self, signed_url: &str) -> Result<Bytes> {
        let resp = self.client.get(signed_url).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.bytes().await?)
    }

    fn absolute_signed_url(&self, signed: &str) -> String {
        if signed.starts_with("http://") || signed.starts_with("https://") {
            signed.to_string()
        } else {
            self.storage_url(signed)
        }
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ApiErrorBody>(&body).unwrap_or_default();
    let code = parsed.error_code();
    let reported = parsed.reported_status();
    let message = parsed.into_message(if body.is_empty() {
        status.to_string()
    } else {
        body.clone()
    });

    Err(SupabaseError::Api {
        status: reported.unwrap_or(status.as_u16()),
        code,
        message,
    })
}
