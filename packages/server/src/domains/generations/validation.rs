//! Generation and phone-number preconditions.
//!
//! Each check returns the validated identifier or the specific reason it
//! was rejected. Lookups that find nothing are rejections; backend errors
//! are forwarded as the rejection text.

use tracing::{debug, warn};

use crate::common::Rejection;
use crate::config::ScrapeLimits;
use crate::domains::generations::models::{Generation, SongFile};
use crate::domains::scraping::models::RuntimeBudget;
use crate::kernel::BaseBackend;

pub struct Validator<'a> {
    backend: &'a dyn BaseBackend,
    limits: &'a ScrapeLimits,
}

impl<'a> Validator<'a> {
    pub fn new(backend: &'a dyn BaseBackend, limits: &'a ScrapeLimits) -> Self {
        Self { backend, limits }
    }

    async fn pull_generation(&self, generation_id: &str) -> Result<Generation, Rejection> {
        match self.backend.fetch_generation(generation_id).await {
            Ok(Some(generation)) => Ok(generation),
            Ok(None) => Err(Rejection::GenerationNotFound),
            Err(e) => {
                warn!(generation_id, error = %e, "Generation lookup failed");
                Err(Rejection::external(e))
            }
        }
    }

    /// May a scrape be launched for this generation?
    ///
    /// Lookup failures are reported with the eligibility-check prefix.
    pub async fn check_generation_launch_eligible(
        &self,
        generation_id: &str,
    ) -> Result<String, Rejection> {
        if generation_id.is_empty() {
            return Err(Rejection::MissingGenerationId);
        }

        let generation = self
            .pull_generation(generation_id)
            .await
            .map_err(|e| Rejection::EligibilityLookup(e.to_string()))?;

        if !generation.has_reply_routing() {
            return Err(Rejection::MissingReplyRouting(generation_id.to_string()));
        }
        if generation.has_prior_error() {
            return Err(Rejection::PriorError);
        }
        if generation.has_output() {
            return Err(Rejection::OutputAlreadyPresent);
        }

        debug!(generation_id, "Generation is launch-eligible");
        Ok(generation_id.to_string())
    }

    pub async fn check_generation_has_user(
        &self,
        generation_id: &str,
    ) -> Result<String, Rejection> {
        if generation_id.is_empty() {
            return Err(Rejection::MissingGenerationId);
        }

        let generation = self.pull_generation(generation_id).await?;
        if !generation.has_user() {
            return Err(Rejection::MissingUser);
        }

        Ok(generation_id.to_string())
    }

    /// Did the scrape write a complete output, and is the song in the bucket?
    pub async fn check_generation_output_complete(
        &self,
        generation_id: &str,
    ) -> Result<String, Rejection> {
        if generation_id.is_empty() {
            return Err(Rejection::MissingGenerationId);
        }

        let generation = self.pull_generation(generation_id).await?;
        if !generation.has_text_output() {
            return Err(Rejection::IncompleteOutput);
        }

        let song = generation
            .song_reference()
            .ok_or_else(|| Rejection::MissingSong(generation_id.to_string()))?;

        let objects = self
            .backend
            .search_song_objects(&song.search_key)
            .await
            .map_err(Rejection::external)?;

        if objects.is_empty() {
            return Err(Rejection::SongNotInBucket);
        }

        debug!(generation_id, object = %objects[0].name, "Song found in bucket");
        Ok(generation_id.to_string())
    }

    pub async fn check_generation_has_no_lyrics_video(
        &self,
        generation_id: &str,
    ) -> Result<String, Rejection> {
        if generation_id.is_empty() {
            return Err(Rejection::MissingGenerationId);
        }

        let generation = self.pull_generation(generation_id).await?;
        if generation.has_lyrics_video() {
            return Err(Rejection::LyricsVideoPresent);
        }

        Ok(generation_id.to_string())
    }

    pub async fn check_phone_number_usable(
        &self,
        phone_number: &str,
    ) -> Result<String, Rejection> {
        if phone_number.is_empty() {
            return Err(Rejection::MissingPhoneNumber);
        }

        let status = match self.backend.fetch_phone_number_status(phone_number).await {
            Ok(Some(status)) => status,
            Ok(None) => return Err(Rejection::PhoneNumberNotFound),
            Err(e) => {
                warn!(error = %e, "Phone number lookup failed");
                return Err(Rejection::PhoneNumberLookup);
            }
        };

        if status.has_error() {
            return Err(Rejection::PhoneNumberErrored);
        }
        if !status.has_credits_above(self.limits.min_credit_balance) {
            return Err(Rejection::InsufficientCredits);
        }

        Ok(phone_number.to_string())
    }

    pub fn check_runtime_budget(&self, max_runtime: Option<&str>) -> Result<RuntimeBudget, Rejection> {
        RuntimeBudget::from_request(max_runtime, self.limits)
    }

    /// Fetch the finished song through a signed URL.
    pub async fn download_song_file(&self, generation_id: &str) -> Result<SongFile, Rejection> {
        if generation_id.is_empty() {
            return Err(Rejection::MissingGenerationId);
        }

        let generation = self.pull_generation(generation_id).await?;
        let song = generation
            .song_reference()
            .ok_or_else(|| Rejection::MissingSong(generation_id.to_string()))?;

        let url = self
            .backend
            .create_song_download_url(&song.path)
            .await
            .map_err(Rejection::external)?;
        let bytes = self
            .backend
            .download(&url)
            .await
            .map_err(Rejection::external)?;

        if bytes.is_empty() {
            return Err(Rejection::EmptySongFile(song.path));
        }

        Ok(SongFile {
            song_file: bytes,
            song_title: generation.song_output_title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockBackend;
    use serde_json::json;

    const ID: &str = "c678a46c-fd62-45d2-b0c9-c08a3065a514";

    fn limits() -> ScrapeLimits {
        ScrapeLimits::default()
    }

    fn eligible_generation() -> serde_json::Value {
        json!({
            "generation_id": ID,
            "user_id": "user-1",
            "initial_reply_id": "reply",
            "replies_guild": "guild",
            "replies_channel_id": "channel"
        })
    }

    fn finished_generation() -> serde_json::Value {
        json!({
            "generation_id": ID,
            "user_id": "user-1",
            "song_output_genre": "synthwave",
            "song_output_title": "Night Drive",
            "song_output_lyrics": "la la la",
            "output_song": { "song": "songs/night-drive.mp3", "song_key": "night-drive.mp3" }
        })
    }

    #[tokio::test]
    async fn test_eligible_generation_returns_id() {
        let backend = MockBackend::new().with_generation(ID, eligible_generation());
        let limits = limits();
        let validator = Validator::new(&backend, &limits);

        assert_eq!(
            validator.check_generation_launch_eligible(ID).await,
            Ok(ID.to_string())
        );
    }

    #[tokio::test]
    async fn test_eligibility_rejections() {
        let limits = limits();

        let backend = MockBackend::new();
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_launch_eligible("").await,
            Err(Rejection::MissingGenerationId)
        );
        assert_eq!(
            validator
                .check_generation_launch_eligible(ID)
                .await
                .unwrap_err()
                .to_string(),
            "Error checking if a song generation exists: Could not pull the generation data from Supabase."
        );

        let mut generation = eligible_generation();
        generation["replies_guild"] = json!("");
        let backend = MockBackend::new().with_generation(ID, generation);
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_launch_eligible(ID).await,
            Err(Rejection::MissingReplyRouting(ID.to_string()))
        );

        let mut generation = eligible_generation();
        generation["error_message"] = json!("scraper crashed");
        let backend = MockBackend::new().with_generation(ID, generation);
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_launch_eligible(ID).await,
            Err(Rejection::PriorError)
        );

        let mut generation = eligible_generation();
        generation["song_output_cover"] = json!("cover.png");
        let backend = MockBackend::new().with_generation(ID, generation);
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_launch_eligible(ID).await,
            Err(Rejection::OutputAlreadyPresent)
        );
    }

    #[tokio::test]
    async fn test_backend_error_is_forwarded_with_prefix() {
        let backend = MockBackend::new().with_generation_error(
            "invalid-id",
            "invalid input syntax for type uuid: \"invalid-id\"",
        );
        let limits = limits();
        let validator = Validator::new(&backend, &limits);

        assert_eq!(
            validator
                .check_generation_launch_eligible("invalid-id")
                .await
                .unwrap_err()
                .to_string(),
            "Error checking if a song generation exists: invalid input syntax for type uuid: \"invalid-id\""
        );
        assert_eq!(
            validator
                .check_generation_has_user("invalid-id")
                .await
                .unwrap_err()
                .to_string(),
            "invalid input syntax for type uuid: \"invalid-id\""
        );
    }

    #[tokio::test]
    async fn test_generation_has_user() {
        let limits = limits();
        let backend = MockBackend::new().with_generation(ID, json!({ "user_id": "" }));
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_has_user(ID).await,
            Err(Rejection::MissingUser)
        );

        let backend = MockBackend::new().with_generation(ID, eligible_generation());
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_has_user(ID).await,
            Ok(ID.to_string())
        );
    }

    #[tokio::test]
    async fn test_output_complete_searches_bucket_by_song_key() {
        let backend = MockBackend::new()
            .with_generation(ID, finished_generation())
            .with_song_object("night-drive.mp3");
        let limits = limits();
        let validator = Validator::new(&backend, &limits);

        assert_eq!(
            validator.check_generation_output_complete(ID).await,
            Ok(ID.to_string())
        );
        assert_eq!(backend.searches(), vec!["night-drive.mp3".to_string()]);
    }

    #[tokio::test]
    async fn test_output_complete_rejections() {
        let limits = limits();

        let mut generation = finished_generation();
        generation["song_output_lyrics"] = json!("");
        let backend = MockBackend::new().with_generation(ID, generation);
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_output_complete(ID).await,
            Err(Rejection::IncompleteOutput)
        );

        let mut generation = finished_generation();
        generation["output_song"] = json!({ "song": "" });
        let backend = MockBackend::new().with_generation(ID, generation);
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator
                .check_generation_output_complete(ID)
                .await
                .unwrap_err()
                .to_string(),
            format!("Invalid song in output_song: {}", ID)
        );

        // An empty listing means the upload never landed
        let backend = MockBackend::new().with_generation(ID, finished_generation());
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_output_complete(ID).await,
            Err(Rejection::SongNotInBucket)
        );
    }

    #[tokio::test]
    async fn test_phone_number_checks() {
        let limits = limits();
        let backend = MockBackend::new()
            .with_phone_number("+15550001", json!({ "latest_error": null, "remaining_credits": 50 }))
            .with_phone_number("+15550002", json!({ "latest_error": "banned", "remaining_credits": 50 }))
            .with_phone_number("+15550003", json!({ "latest_error": null, "remaining_credits": 10 }))
            .with_phone_number("+15550004", json!({ "latest_error": null }));
        let validator = Validator::new(&backend, &limits);

        assert_eq!(
            validator.check_phone_number_usable("+15550001").await,
            Ok("+15550001".to_string())
        );
        assert_eq!(
            validator.check_phone_number_usable("").await,
            Err(Rejection::MissingPhoneNumber)
        );
        assert_eq!(
            validator.check_phone_number_usable("+15550002").await,
            Err(Rejection::PhoneNumberErrored)
        );
        assert_eq!(
            validator.check_phone_number_usable("+15550003").await,
            Err(Rejection::InsufficientCredits)
        );
        assert_eq!(
            validator.check_phone_number_usable("+15550004").await,
            Err(Rejection::InsufficientCredits)
        );
        assert_eq!(
            validator.check_phone_number_usable("invalid-phone").await,
            Err(Rejection::PhoneNumberNotFound)
        );
    }

    #[tokio::test]
    async fn test_phone_number_backend_error() {
        let backend = MockBackend::new().with_phone_number_error("+15550001", "timeout");
        let limits = limits();
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_phone_number_usable("+15550001").await,
            Err(Rejection::PhoneNumberLookup)
        );
    }

    #[tokio::test]
    async fn test_lyrics_video_check() {
        let limits = limits();
        let backend = MockBackend::new()
            .with_generation(ID, json!({ "song_output_lyrics_video": "video.mp4" }));
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_has_no_lyrics_video(ID).await,
            Err(Rejection::LyricsVideoPresent)
        );

        let backend = MockBackend::new().with_generation(ID, finished_generation());
        let validator = Validator::new(&backend, &limits);
        assert_eq!(
            validator.check_generation_has_no_lyrics_video(ID).await,
            Ok(ID.to_string())
        );
    }

    #[tokio::test]
    async fn test_download_song_file() {
        let backend = MockBackend::new()
            .with_generation(ID, finished_generation())
            .with_download(b"ID3audio".to_vec());
        let limits = limits();
        let validator = Validator::new(&backend, &limits);

        let song = validator.download_song_file(ID).await.unwrap();
        assert_eq!(&song.song_file[..], b"ID3audio");
        assert_eq!(song.song_title.as_deref(), Some("Night Drive"));
        assert_eq!(backend.signed_paths(), vec!["songs/night-drive.mp3".to_string()]);
    }

    #[tokio::test]
    async fn test_download_empty_file() {
        let backend = MockBackend::new()
            .with_generation(ID, finished_generation())
            .with_download(Vec::new());
        let limits = limits();
        let validator = Validator::new(&backend, &limits);

        assert_eq!(
            validator.download_song_file(ID).await.unwrap_err().to_string(),
            "There's no audio file at songs/night-drive.mp3."
        );
    }
}
