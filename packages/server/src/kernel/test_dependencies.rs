// TestDependencies - mock implementations for testing
//
// Provides recording mocks that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BaseBackend, BaseEmailService, BaseTaskLauncher, ServerDeps};
use crate::config::{Config, EcsConfig, ScrapeLimits, SendgridConfig, SupabaseConfig};
use crate::domains::generations::models::{Generation, PhoneNumberStatus, StoredObject};
use crate::domains::notifications::OutgoingEmail;
use crate::domains::scraping::models::{LaunchedTask, RunTaskRequest, TaskSnapshot};

/// Task ARN the mock launcher hands out unless told otherwise
pub const MOCK_TASK_ARN: &str =
    "arn:aws:ecs:us-east-1:123456789012:task/fargate-suno-scraper-cluster/mock";

/// Configuration with placeholder values for every external service
pub fn test_config() -> Config {
    Config {
        port: 0,
        ecs: EcsConfig {
            region: "us-east-1".to_string(),
            cluster: "fargate-suno-scraper-cluster".to_string(),
            task_definition:
                "arn:aws:ecs:us-east-1:123456789012:task-definition/fargate-suno-scraper-task:1"
                    .to_string(),
            container_name: "fargate-suno-scraper-container".to_string(),
            subnets: vec!["subnet-a".to_string(), "subnet-b".to_string()],
            security_groups: vec!["sg-id".to_string()],
        },
        supabase: SupabaseConfig {
            url: "http://localhost:54321".to_string(),
            anon_key: "anon".to_string(),
            jwt_secret: "test_secret_key".to_string(),
            schema: "public".to_string(),
            app_role: "aws_lambda".to_string(),
            jwt_lifetime_secs: 60,
            generations_table: "song_generations".to_string(),
            scraper_status_table: "scraper_status".to_string(),
            song_bucket: "songs".to_string(),
            download_url_lifetime_secs: 60,
        },
        sendgrid: SendgridConfig {
            api_key: "test_api_key".to_string(),
            to: "ops@example.com".to_string(),
            from: "scraper@example.com".to_string(),
        },
        limits: ScrapeLimits::default(),
    }
}

// =============================================================================
// Mock Backend
// =============================================================================

#[derive(Default)]
pub struct MockBackend {
    generations: HashMap<String, std::result::Result<Value, String>>,
    phone_numbers: HashMap<String, std::result::Result<Value, String>>,
    song_objects: Vec<String>,
    download: Option<Vec<u8>>,
    generation_lookups: Mutex<Vec<String>>,
    searches: Mutex<Vec<String>>,
    signed_paths: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row returned for a generation lookup
    pub fn with_generation(mut self, generation_id: &str, row: Value) -> Self {
        self.generations.insert(generation_id.to_string(), Ok(row));
        self
    }

    /// Backend error returned for a generation lookup
    pub fn with_generation_error(mut self, generation_id: &str, message: &str) -> Self {
        self.generations
            .insert(generation_id.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_phone_number(mut self, phone_number: &str, row: Value) -> Self {
        self.phone_numbers.insert(phone_number.to_string(), Ok(row));
        self
    }

    pub fn with_phone_number_error(mut self, phone_number: &str, message: &str) -> Self {
        self.phone_numbers
            .insert(phone_number.to_string(), Err(message.to_string()));
        self
    }

    /// Object present in the song bucket
    pub fn with_song_object(mut self, name: &str) -> Self {
        self.song_objects.push(name.to_string());
        self
    }

    /// Bytes served by any signed download URL
    pub fn with_download(mut self, bytes: Vec<u8>) -> Self {
        self.download = Some(bytes);
        self
    }

    pub fn generation_lookups(&self) -> Vec<String> {
        self.generation_lookups.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn signed_paths(&self) -> Vec<String> {
        self.signed_paths.lock().unwrap().clone()
    }
}

fn lookup<T: serde::de::DeserializeOwned>(
    rows: &HashMap<String, std::result::Result<Value, String>>,
    key: &str,
) -> Result<Option<T>> {
    match rows.get(key) {
        None => Ok(None),
        Some(Ok(row)) => Ok(Some(serde_json::from_value(row.clone())?)),
        Some(Err(message)) => Err(anyhow!("{}", message)),
    }
}

#[async_trait]
impl BaseBackend for MockBackend {
    async fn fetch_generation(&self, generation_id: &str) -> Result<Option<Generation>> {
        self.generation_lookups
            .lock()
            .unwrap()
            .push(generation_id.to_string());
        lookup(&self.generations, generation_id)
    }

    async fn fetch_phone_number_status(
        &self,
        phone_number: &str,
    ) -> Result<Option<PhoneNumberStatus>> {
        lookup(&self.phone_numbers, phone_number)
    }

    async fn search_song_objects(&self, search_key: &str) -> Result<Vec<StoredObject>> {
        self.searches.lock().unwrap().push(search_key.to_string());
        Ok(self
            .song_objects
            .iter()
            .filter(|name| name.contains(search_key))
            .take(1)
            .map(|name| StoredObject { name: name.clone() })
            .collect())
    }

    async fn create_song_download_url(&self, path: &str) -> Result<String> {
        self.signed_paths.lock().unwrap().push(path.to_string());
        Ok(format!("http://localhost:54321/storage/v1/object/sign/songs/{}?token=mock", path))
    }

    async fn download(&self, _url: &str) -> Result<Bytes> {
        match &self.download {
            Some(bytes) => Ok(Bytes::from(bytes.clone())),
            None => Err(anyhow!("Object not found")),
        }
    }
}

// =============================================================================
// Mock Task Launcher
// =============================================================================

pub struct MockTaskLauncher {
    launched: std::result::Result<Vec<String>, String>,
    described: std::result::Result<Vec<Value>, String>,
    run_calls: Mutex<Vec<RunTaskRequest>>,
    describe_calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl Default for MockTaskLauncher {
    fn default() -> Self {
        Self {
            launched: Ok(vec![MOCK_TASK_ARN.to_string()]),
            described: Ok(Vec::new()),
            run_calls: Mutex::new(Vec::new()),
            describe_calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockTaskLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Task ARNs reported as created by `run_task`
    pub fn with_launched(mut self, task_arns: Vec<&str>) -> Self {
        self.launched = Ok(task_arns.into_iter().map(String::from).collect());
        self
    }

    pub fn with_run_error(mut self, message: &str) -> Self {
        self.launched = Err(message.to_string());
        self
    }

    /// Task snapshot (launcher wire JSON) returned by every `describe_tasks`
    pub fn with_task(mut self, task: Value) -> Self {
        self.described = Ok(vec![task]);
        self
    }

    pub fn with_describe_error(mut self, message: &str) -> Self {
        self.described = Err(message.to_string());
        self
    }

    pub fn run_calls(&self) -> Vec<RunTaskRequest> {
        self.run_calls.lock().unwrap().clone()
    }

    pub fn describe_calls(&self) -> Vec<(String, Vec<String>)> {
        self.describe_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseTaskLauncher for MockTaskLauncher {
    async fn run_task(&self, request: &RunTaskRequest) -> Result<Vec<LaunchedTask>> {
        self.run_calls.lock().unwrap().push(request.clone());
        match &self.launched {
            Ok(arns) => Ok(arns
                .iter()
                .map(|arn| LaunchedTask {
                    task_arn: arn.clone(),
                })
                .collect()),
            Err(message) => Err(anyhow!("{}", message)),
        }
    }

    async fn describe_tasks(
        &self,
        cluster: &str,
        task_arns: &[String],
    ) -> Result<Vec<TaskSnapshot>> {
        self.describe_calls
            .lock()
            .unwrap()
            .push((cluster.to_string(), task_arns.to_vec()));
        match &self.described {
            Ok(tasks) => tasks
                .iter()
                .map(|task| serde_json::from_value(task.clone()).map_err(Into::into))
                .collect(),
            Err(message) => Err(anyhow!("{}", message)),
        }
    }
}

// =============================================================================
// Mock Email Service
// =============================================================================

pub struct MockEmailService {
    status: u16,
    failure: Option<String>,
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self {
            status: 202,
            failure: None,
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// HTTP status the provider answers with
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Fail every send with a transport error
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseEmailService for MockEmailService {
    async fn send(&self, email: &OutgoingEmail) -> Result<u16> {
        self.sent.lock().unwrap().push(email.clone());
        match &self.failure {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(self.status),
        }
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock services plus the ServerDeps wired to them.
///
/// The mocks stay reachable so tests can assert on recorded calls.
pub struct TestDependencies {
    pub config: Config,
    pub backend: Arc<MockBackend>,
    pub launcher: Arc<MockTaskLauncher>,
    pub email: Arc<MockEmailService>,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self {
            config: test_config(),
            backend: Arc::new(MockBackend::new()),
            launcher: Arc::new(MockTaskLauncher::new()),
            email: Arc::new(MockEmailService::new()),
        }
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend(mut self, backend: MockBackend) -> Self {
        self.backend = Arc::new(backend);
        self
    }

    pub fn launcher(mut self, launcher: MockTaskLauncher) -> Self {
        self.launcher = Arc::new(launcher);
        self
    }

    pub fn email(mut self, email: MockEmailService) -> Self {
        self.email = Arc::new(email);
        self
    }

    pub fn limits(mut self, limits: ScrapeLimits) -> Self {
        self.config.limits = limits;
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            &self.config,
            self.backend.clone(),
            self.launcher.clone(),
            self.email.clone(),
        )
    }
}
