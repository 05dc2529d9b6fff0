use tracing::{debug, warn};

use crate::common::Rejection;
use crate::config::EcsConfig;
use crate::domains::scraping::models::{
    EnvironmentVariable, RunTaskRequest, RuntimeBudget, TaskSnapshot, LAUNCH_TYPE_FARGATE,
};
use crate::kernel::BaseTaskLauncher;

/// Submits and inspects scraper tasks on the configured cluster.
pub struct TaskLauncherGateway<'a> {
    launcher: &'a dyn BaseTaskLauncher,
    ecs: &'a EcsConfig,
}

impl<'a> TaskLauncherGateway<'a> {
    pub fn new(launcher: &'a dyn BaseTaskLauncher, ecs: &'a EcsConfig) -> Self {
        Self { launcher, ecs }
    }

    /// The run-task request for one scrape.
    pub fn scrape_request(
        &self,
        phone_number: &str,
        budget: RuntimeBudget,
        generation_id: &str,
    ) -> RunTaskRequest {
        RunTaskRequest {
            cluster: self.ecs.cluster.clone(),
            task_definition: self.ecs.task_definition.clone(),
            launch_type: LAUNCH_TYPE_FARGATE.to_string(),
            container_name: self.ecs.container_name.clone(),
            environment: vec![
                EnvironmentVariable::new("PHONE_NUMBER", phone_number),
                EnvironmentVariable::new("MAX_RUNTIME", budget.adjusted.to_string()),
                EnvironmentVariable::new("GENERATION_ID", generation_id),
            ],
            subnets: self.ecs.subnets.clone(),
            security_groups: self.ecs.security_groups.clone(),
            assign_public_ip: true,
        }
    }

    /// Submit a task and return its handle.
    pub async fn submit(&self, request: &RunTaskRequest) -> Result<String, Rejection> {
        let tasks = self
            .launcher
            .run_task(request)
            .await
            .map_err(Rejection::external)?;

        let task = tasks.into_iter().next().ok_or_else(|| {
            warn!(cluster = %request.cluster, "Launcher created no tasks");
            Rejection::TaskNotStarted
        })?;

        debug!(task_arn = %task.task_arn, "Task submitted");
        Ok(task.task_arn)
    }

    pub async fn describe(&self, task_arn: &str) -> Result<TaskSnapshot, Rejection> {
        if task_arn.is_empty() {
            return Err(Rejection::TaskNotFound);
        }

        let tasks = self
            .launcher
            .describe_tasks(&self.ecs.cluster, &[task_arn.to_string()])
            .await
            .map_err(Rejection::external)?;

        tasks.into_iter().next().ok_or(Rejection::TaskNotFound)
    }
}
