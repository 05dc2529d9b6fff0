//! Start scrape action

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::common::{HandlerResponse, Rejection};
use crate::domains::generations::Validator;
use crate::domains::notifications::NotificationKind;
use crate::domains::scraping::gateway::TaskLauncherGateway;
use crate::kernel::ServerDeps;

/// Body of a start request. Missing fields are treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartScrapeRequest {
    #[serde(default)]
    pub generation_id: Option<String>,
    /// Seconds, as text; a JSON number is accepted too
    #[serde(default, deserialize_with = "string_or_number")]
    pub max_runtime: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeStarted {
    pub message: String,
    pub generation_id: String,
    pub ecs_task_arn: String,
}

/// Validate a launch request and submit the scraper task.
///
/// Steps run in order and the first rejection ends the request: generation
/// eligibility, phone number, runtime budget, then the launch itself.
pub async fn start_scrape(deps: &ServerDeps, request: StartScrapeRequest) -> HandlerResponse {
    let generation_id = request.generation_id.unwrap_or_default();
    let phone_number = request.phone_number.unwrap_or_default();
    let max_runtime = request.max_runtime;

    info!(
        generation_id = %generation_id,
        max_runtime = ?max_runtime,
        phone_number = %phone_number,
        "Start scrape requested"
    );

    match launch(deps, &generation_id, max_runtime.as_deref(), &phone_number).await {
        Ok(ecs_task_arn) => {
            info!(generation_id = %generation_id, task_arn = %ecs_task_arn, "Fargate task started");
            HandlerResponse::ok(ScrapeStarted {
                message: "Song scraping process started".to_string(),
                generation_id,
                ecs_task_arn,
            })
        }
        Err(rejection) => {
            let message = rejection.to_string();
            error!(generation_id = %generation_id, error = %message, "Start scrape failed");
            deps.notifier
                .notify(
                    NotificationKind::ScrapeSong,
                    &message,
                    Some(&phone_number),
                    Some(&generation_id),
                )
                .await;
            HandlerResponse::error(message)
        }
    }
}

async fn launch(
    deps: &ServerDeps,
    generation_id: &str,
    max_runtime: Option<&str>,
    phone_number: &str,
) -> Result<String, Rejection> {
    let validator = Validator::new(deps.backend.as_ref(), &deps.limits);

    validator.check_generation_launch_eligible(generation_id).await?;
    info!(generation_id, "The generation is valid");

    validator.check_phone_number_usable(phone_number).await?;
    info!(generation_id, "The phone number is valid");

    let budget = validator.check_runtime_budget(max_runtime)?;
    info!(
        generation_id,
        requested = budget.requested,
        adjusted = budget.adjusted,
        "The max runtime is valid"
    );

    let gateway = TaskLauncherGateway::new(deps.task_launcher.as_ref(), &deps.ecs);
    let request = gateway.scrape_request(phone_number, budget, generation_id);
    gateway.submit(&request).await
}
