// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Validation and outcome classification live in the domains and use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseBackend, BaseTaskLauncher)

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::domains::generations::models::{Generation, PhoneNumberStatus, StoredObject};
use crate::domains::notifications::OutgoingEmail;
use crate::domains::scraping::models::{LaunchedTask, RunTaskRequest, TaskSnapshot};

// =============================================================================
// Backend Trait (Infrastructure - rows and objects)
// =============================================================================

/// Record lookups and object storage. A lookup that finds nothing is
/// `Ok(None)`; `Err` is reserved for real backend failures and its
/// `Display` text is the backend's own message.
#[async_trait]
pub trait BaseBackend: Send + Sync {
    async fn fetch_generation(&self, generation_id: &str) -> Result<Option<Generation>>;

    async fn fetch_phone_number_status(
        &self,
        phone_number: &str,
    ) -> Result<Option<PhoneNumberStatus>>;

    /// Objects in the song bucket matching `search_key` (at most one).
    async fn search_song_objects(&self, search_key: &str) -> Result<Vec<StoredObject>>;

    /// Signed, time-limited URL for an object in the song bucket
    async fn create_song_download_url(&self, path: &str) -> Result<String>;

    async fn download(&self, url: &str) -> Result<Bytes>;
}

// =============================================================================
// Task Launcher Trait (Infrastructure - container tasks)
// =============================================================================

#[async_trait]
pub trait BaseTaskLauncher: Send + Sync {
    /// Submit a task; returns every task the launcher reports as created.
    async fn run_task(&self, request: &RunTaskRequest) -> Result<Vec<LaunchedTask>>;

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String])
        -> Result<Vec<TaskSnapshot>>;
}

// =============================================================================
// Email Trait (Infrastructure - transactional email)
// =============================================================================

#[async_trait]
pub trait BaseEmailService: Send + Sync {
    /// Send an email; returns the provider's HTTP status code.
    async fn send(&self, email: &OutgoingEmail) -> Result<u16>;
}
