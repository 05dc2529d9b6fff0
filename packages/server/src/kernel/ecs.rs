//! ECS task operations through the AWS CLI
//!
//! Shells out to `aws ecs run-task` / `aws ecs describe-tasks` and parses
//! their JSON output. Credentials come from the CLI's usual chain.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;

use super::BaseTaskLauncher;
use crate::domains::scraping::models::{LaunchedTask, RunTaskRequest, TaskSnapshot};

/// `aws ecs run-task` output
#[derive(Debug, Deserialize)]
struct RunTaskOutput {
    #[serde(default)]
    tasks: Vec<LaunchedTask>,
    #[serde(default)]
    failures: Vec<EcsFailure>,
}

/// `aws ecs describe-tasks` output
#[derive(Debug, Deserialize)]
struct DescribeTasksOutput {
    #[serde(default)]
    tasks: Vec<TaskSnapshot>,
    #[serde(default)]
    failures: Vec<EcsFailure>,
}

#[derive(Debug, Deserialize)]
struct EcsFailure {
    #[serde(default)]
    arn: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

pub struct EcsCliLauncher {
    program: String,
    region: String,
}

impl EcsCliLauncher {
    pub fn new(region: String) -> Self {
        Self {
            program: "aws".to_string(),
            region,
        }
    }

    /// Use a different executable in place of `aws`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn run_json(&self, args: Vec<String>) -> Result<Vec<u8>> {
        tracing::debug!(program = %self.program, ?args, "Running AWS CLI");

        let output = Command::new(&self.program)
            .args(&args)
            .args(["--region", self.region.as_str(), "--output", "json"])
            .env("AWS_PAGER", "")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(program = %self.program, status = %output.status, stderr = %stderr.trim(), "AWS CLI failed");
            return Err(anyhow!("{}", cli_error_message(&stderr)));
        }

        Ok(output.stdout)
    }
}

/// One-line error from CLI stderr. The CLI prints usage text before the
/// actual error, so the last non-empty line is the one that matters.
fn cli_error_message(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(|line| line.strip_prefix("aws: error: ").unwrap_or(line).to_string())
        .unwrap_or_else(|| "The AWS CLI failed without output".to_string())
}

fn log_failures(operation: &str, failures: &[EcsFailure]) {
    for failure in failures {
        tracing::warn!(
            operation,
            arn = failure.arn.as_deref().unwrap_or("-"),
            reason = failure.reason.as_deref().unwrap_or("-"),
            "ECS reported a failure"
        );
    }
}

#[async_trait]
impl BaseTaskLauncher for EcsCliLauncher {
    async fn run_task(&self, request: &RunTaskRequest) -> Result<Vec<LaunchedTask>> {
        let overrides = request.overrides_json()?.to_string();
        let network = request.network_configuration_json()?.to_string();

        let stdout = self
            .run_json(vec![
                "ecs".into(),
                "run-task".into(),
                "--cluster".into(),
                request.cluster.clone(),
                "--task-definition".into(),
                request.task_definition.clone(),
                "--launch-type".into(),
                request.launch_type.clone(),
                "--overrides".into(),
                overrides,
                "--network-configuration".into(),
                network,
            ])
            .await?;

        let output: RunTaskOutput =
            serde_json::from_slice(&stdout).context("Failed to parse run-task output")?;
        log_failures("run-task", &output.failures);

        Ok(output.tasks)
    }

    async fn describe_tasks(
        &self,
        cluster: &str,
        task_arns: &[String],
    ) -> Result<Vec<TaskSnapshot>> {
        if task_arns.is_empty() {
            return Ok(vec![]);
        }

        let mut args: Vec<String> = vec![
            "ecs".into(),
            "describe-tasks".into(),
            "--cluster".into(),
            cluster.to_string(),
            "--tasks".into(),
        ];
        args.extend(task_arns.iter().cloned());

        let stdout = self.run_json(args).await?;

        let output: DescribeTasksOutput =
            serde_json::from_slice(&stdout).context("Failed to parse describe-tasks output")?;
        log_failures("describe-tasks", &output.failures);

        Ok(output.tasks)
    }
}
