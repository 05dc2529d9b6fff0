use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use supabase_client::{ListOptions, SupabaseClient};

use super::BaseBackend;
use crate::config::SupabaseConfig;
use crate::domains::auth::BackendTokenService;
use crate::domains::generations::models::{Generation, PhoneNumberStatus, StoredObject};

/// Supabase implementation of BaseBackend.
///
/// Every call mints its own token, so a long-idle process never presents
/// an expired credential.
pub struct SupabaseBackend {
    client: SupabaseClient,
    tokens: BackendTokenService,
    generations_table: String,
    scraper_status_table: String,
    song_bucket: String,
    download_url_lifetime_secs: u64,
}

impl SupabaseBackend {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: SupabaseClient::new(
                config.url.clone(),
                config.anon_key.clone(),
                config.schema.clone(),
            ),
            tokens: BackendTokenService::from_config(config),
            generations_table: config.generations_table.clone(),
            scraper_status_table: config.scraper_status_table.clone(),
            song_bucket: config.song_bucket.clone(),
            download_url_lifetime_secs: config.download_url_lifetime_secs,
        }
    }
}

#[async_trait]
impl BaseBackend for SupabaseBackend {
    async fn fetch_generation(&self, generation_id: &str) -> Result<Option<Generation>> {
        let token = self.tokens.mint_token()?;
        let generation = self
            .client
            .select_single(
                &token,
                &self.generations_table,
                "*",
                "generation_id",
                generation_id,
            )
            .await?;
        Ok(generation)
    }

    async fn fetch_phone_number_status(
        &self,
        phone_number: &str,
    ) -> Result<Option<PhoneNumberStatus>> {
        let token = self.tokens.mint_token()?;
        let status = self
            .client
            .select_single(
                &token,
                &self.scraper_status_table,
                "*",
                "phone_number",
                phone_number,
            )
            .await?;
        Ok(status)
    }

    async fn search_song_objects(&self, search_key: &str) -> Result<Vec<StoredObject>> {
        let token = self.tokens.mint_token()?;
        let listing = self
            .client
            .list_objects(
                &token,
                &self.song_bucket,
                &ListOptions::search_first(search_key),
            )
            .await;

        match listing {
            Ok(files) => Ok(files
                .into_iter()
                .map(|file| StoredObject { name: file.name })
                .collect()),
            // Storage answers a missing entry with an error, not an empty listing
            Err(e) if e.is_not_found() => {
                tracing::debug!(search_key, "Song object not found in bucket");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_song_download_url(&self, path: &str) -> Result<String> {
        let token = self.tokens.mint_token()?;
        let url = self
            .client
            .create_signed_url(
                &token,
                &self.song_bucket,
                path,
                self.download_url_lifetime_secs,
            )
            .await?;
        Ok(url)
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        Ok(self.client.download(url).await?)
    }
}
