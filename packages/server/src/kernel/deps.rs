//! Server dependencies for handlers (using traits for testability)
//!
//! This module provides the central dependency container used by both handlers.
//! All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use sendgrid::{SendgridOptions, SendgridService};
use std::sync::Arc;

use crate::config::{Config, EcsConfig, ScrapeLimits};
use crate::domains::notifications::{Notifier, OutgoingEmail};
use crate::kernel::{BaseBackend, BaseEmailService, BaseTaskLauncher, EcsCliLauncher, SupabaseBackend};

// =============================================================================
// SendgridService Adapter (implements BaseEmailService trait)
// =============================================================================

/// Wrapper around SendgridService that implements BaseEmailService trait
pub struct SendgridAdapter(pub Arc<SendgridService>);

impl SendgridAdapter {
    pub fn new(service: Arc<SendgridService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseEmailService for SendgridAdapter {
    async fn send(&self, email: &OutgoingEmail) -> Result<u16> {
        self.0
            .send_plain_text(&email.to, &email.from, &email.subject, &email.text)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to handlers (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub backend: Arc<dyn BaseBackend>,
    pub task_launcher: Arc<dyn BaseTaskLauncher>,
    /// Best-effort error emails
    pub notifier: Notifier,
    pub ecs: EcsConfig,
    pub limits: ScrapeLimits,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        config: &Config,
        backend: Arc<dyn BaseBackend>,
        task_launcher: Arc<dyn BaseTaskLauncher>,
        email: Arc<dyn BaseEmailService>,
    ) -> Self {
        Self {
            backend,
            task_launcher,
            notifier: Notifier::from_config(email, &config.sendgrid),
            ecs: config.ecs.clone(),
            limits: config.limits,
        }
    }

    /// Production dependencies: Supabase, the AWS CLI and SendGrid
    pub fn from_config(config: &Config) -> Self {
        let sendgrid = Arc::new(SendgridService::new(SendgridOptions {
            api_key: config.sendgrid.api_key.clone(),
            base_url: None,
        }));

        Self::new(
            config,
            Arc::new(SupabaseBackend::new(&config.supabase)),
            Arc::new(EcsCliLauncher::new(config.ecs.region.clone())),
            Arc::new(SendgridAdapter::new(sendgrid)),
        )
    }
}
