//! Check song status action

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::common::{HandlerResponse, Rejection};
use crate::domains::generations::Validator;
use crate::domains::notifications::NotificationKind;
use crate::domains::scraping::gateway::TaskLauncherGateway;
use crate::domains::scraping::models::{TaskOutcome, TaskSnapshot};
use crate::kernel::ServerDeps;

/// Query of a status request. Missing parameters are treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongStatusQuery {
    #[serde(default)]
    pub generation_id: Option<String>,
    #[serde(default)]
    pub ecs_task_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongStatus {
    pub message: String,
    pub generation_id: String,
    pub ecs_task_status: String,
    pub ecs_task_arn: String,
}

enum StatusReport {
    InProgress(TaskSnapshot),
    Downloaded(TaskSnapshot),
}

/// Poll a scrape task and classify it.
///
/// 202 while the task runs, 200 once it stopped cleanly and the song is in
/// the bucket, 500 otherwise. Calling again against an unchanged task gives
/// the same answer.
pub async fn check_song_status(deps: &ServerDeps, query: SongStatusQuery) -> HandlerResponse {
    let generation_id = query.generation_id.unwrap_or_default();
    let ecs_task_arn = query.ecs_task_arn.unwrap_or_default();

    info!(generation_id = %generation_id, task_arn = %ecs_task_arn, "Song status requested");

    match check(deps, &generation_id, &ecs_task_arn).await {
        Ok(StatusReport::InProgress(task)) => {
            info!(generation_id = %generation_id, status = %task.last_status, "The song is still being scraped");
            HandlerResponse::accepted(SongStatus {
                message: "Song still being scraped".to_string(),
                generation_id,
                ecs_task_status: task.last_status,
                ecs_task_arn,
            })
        }
        Ok(StatusReport::Downloaded(task)) => {
            info!(generation_id = %generation_id, "The song data was downloaded");
            HandlerResponse::ok(SongStatus {
                message: "Song was downloaded".to_string(),
                generation_id,
                ecs_task_status: task.last_status,
                ecs_task_arn,
            })
        }
        Err(rejection) => {
            let message = rejection.to_string();
            error!(generation_id = %generation_id, error = %message, "Song status check failed");
            deps.notifier
                .notify(
                    NotificationKind::SongStatus,
                    &message,
                    None,
                    Some(&generation_id),
                )
                .await;
            HandlerResponse::error(message)
        }
    }
}

async fn check(
    deps: &ServerDeps,
    generation_id: &str,
    ecs_task_arn: &str,
) -> Result<StatusReport, Rejection> {
    let validator = Validator::new(deps.backend.as_ref(), &deps.limits);

    validator.check_generation_has_user(generation_id).await?;
    info!(generation_id, "The generation ID is valid");

    let gateway = TaskLauncherGateway::new(deps.task_launcher.as_ref(), &deps.ecs);
    let task = gateway.describe(ecs_task_arn).await?;

    match task.outcome() {
        TaskOutcome::InProgress(_) => Ok(StatusReport::InProgress(task)),
        TaskOutcome::Failed { reason } => Err(Rejection::TaskFailed(reason)),
        TaskOutcome::Succeeded => {
            info!(generation_id, "Container exited correctly");
            validator
                .check_generation_output_complete(generation_id)
                .await?;
            Ok(StatusReport::Downloaded(task))
        }
    }
}
