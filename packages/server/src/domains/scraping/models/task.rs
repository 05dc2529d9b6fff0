use serde::{Deserialize, Serialize};

/// Terminal lifecycle status reported by the launcher.
pub const STATUS_STOPPED: &str = "STOPPED";

/// Stop code of a task whose essential container exited on its own.
pub const STOP_CODE_ESSENTIAL_EXITED: &str = "EssentialContainerExited";

pub const LAUNCH_TYPE_FARGATE: &str = "FARGATE";

/// Everything needed to submit one scraper task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTaskRequest {
    pub cluster: String,
    pub task_definition: String,
    pub launch_type: String,
    pub container_name: String,
    pub environment: Vec<EnvironmentVariable>,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskOverride<'a> {
    container_overrides: Vec<ContainerOverride<'a>>,
}

#[derive(Debug, Serialize)]
struct ContainerOverride<'a> {
    name: &'a str,
    environment: &'a [EnvironmentVariable],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NetworkConfiguration<'a> {
    awsvpc_configuration: AwsVpcConfiguration<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AwsVpcConfiguration<'a> {
    subnets: &'a [String],
    security_groups: &'a [String],
    assign_public_ip: &'static str,
}

impl RunTaskRequest {
    /// Value of the named environment override, if set.
    pub fn env(&self, name: &str) -> Option<&str> {
        self.environment
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.value.as_str())
    }

    /// `overrides` document in the launcher's wire shape.
    pub fn overrides_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(TaskOverride {
            container_overrides: vec![ContainerOverride {
                name: &self.container_name,
                environment: &self.environment,
            }],
        })
    }

    /// `networkConfiguration` document in the launcher's wire shape.
    pub fn network_configuration_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(NetworkConfiguration {
            awsvpc_configuration: AwsVpcConfiguration {
                subnets: &self.subnets,
                security_groups: &self.security_groups,
                assign_public_ip: if self.assign_public_ip {
                    "ENABLED"
                } else {
                    "DISABLED"
                },
            },
        })
    }
}

/// A task accepted by the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchedTask {
    pub task_arn: String,
}

/// Point-in-time view of a task, fetched fresh on every status check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    #[serde(default)]
    pub task_arn: String,
    #[serde(default)]
    pub last_status: String,
    #[serde(default)]
    pub stop_code: Option<String>,
    #[serde(default)]
    pub stopped_reason: Option<String>,
    #[serde(default)]
    pub containers: Vec<ContainerSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exit_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Not yet stopped; carries the current lifecycle status
    InProgress(String),
    Succeeded,
    Failed { reason: String },
}

impl TaskSnapshot {
    pub fn is_stopped(&self) -> bool {
        self.last_status == STATUS_STOPPED
    }

    /// Classify the task.
    ///
    /// A stopped task succeeded only if its essential container exited on
    /// its own and every container reported exit code 0. A stopped task
    /// with no container reports is a failure.
    pub fn outcome(&self) -> TaskOutcome {
        if !self.is_stopped() {
            return TaskOutcome::InProgress(self.last_status.clone());
        }

        let clean_exit = self.stop_code.as_deref() == Some(STOP_CODE_ESSENTIAL_EXITED)
            && !self.containers.is_empty()
            && self.containers.iter().all(|c| c.exit_code == Some(0));

        if clean_exit {
            TaskOutcome::Succeeded
        } else {
            TaskOutcome::Failed {
                reason: self
                    .stopped_reason
                    .clone()
                    .unwrap_or_else(|| "unknown reason".to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> TaskSnapshot {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_running_task_is_in_progress() {
        let task = snapshot(json!({ "taskArn": "arn", "lastStatus": "RUNNING" }));
        assert_eq!(task.outcome(), TaskOutcome::InProgress("RUNNING".into()));

        let task = snapshot(json!({ "taskArn": "arn", "lastStatus": "PROVISIONING" }));
        assert_eq!(task.outcome(), TaskOutcome::InProgress("PROVISIONING".into()));
    }

    #[test]
    fn test_clean_exit_succeeds() {
        let task = snapshot(json!({
            "taskArn": "arn",
            "lastStatus": "STOPPED",
            "stopCode": "EssentialContainerExited",
            "stoppedReason": "Essential container in task exited",
            "containers": [{ "name": "scraper", "exitCode": 0 }, { "name": "sidecar", "exitCode": 0 }]
        }));
        assert_eq!(task.outcome(), TaskOutcome::Succeeded);
    }

    #[test]
    fn test_non_zero_exit_fails_with_reason() {
        let task = snapshot(json!({
            "taskArn": "arn",
            "lastStatus": "STOPPED",
            "stopCode": "TaskFailed",
            "stoppedReason": "Essential container in task exited",
            "containers": [{ "exitCode": 1 }]
        }));
        assert_eq!(
            task.outcome(),
            TaskOutcome::Failed {
                reason: "Essential container in task exited".into()
            }
        );
    }

    #[test]
    fn test_any_failing_container_fails_the_task() {
        let task = snapshot(json!({
            "lastStatus": "STOPPED",
            "stopCode": "EssentialContainerExited",
            "stoppedReason": "sidecar crashed",
            "containers": [{ "exitCode": 0 }, { "exitCode": 137 }]
        }));
        assert!(matches!(task.outcome(), TaskOutcome::Failed { .. }));
    }

    #[test]
    fn test_missing_exit_code_fails() {
        let task = snapshot(json!({
            "lastStatus": "STOPPED",
            "stopCode": "EssentialContainerExited",
            "containers": [{ "name": "scraper" }]
        }));
        assert_eq!(
            task.outcome(),
            TaskOutcome::Failed {
                reason: "unknown reason".into()
            }
        );
    }

    #[test]
    fn test_wire_documents() {
        let request = RunTaskRequest {
            cluster: "cluster".into(),
            task_definition: "taskdef".into(),
            launch_type: LAUNCH_TYPE_FARGATE.into(),
            container_name: "scraper".into(),
            environment: vec![EnvironmentVariable::new("MAX_RUNTIME", "500")],
            subnets: vec!["subnet-a".into(), "subnet-b".into()],
            security_groups: vec!["sg-id".into()],
            assign_public_ip: true,
        };

        assert_eq!(
            request.overrides_json().unwrap(),
            json!({
                "containerOverrides": [{
                    "name": "scraper",
                    "environment": [{ "name": "MAX_RUNTIME", "value": "500" }]
                }]
            })
        );
        assert_eq!(
            request.network_configuration_json().unwrap(),
            json!({
                "awsvpcConfiguration": {
                    "subnets": ["subnet-a", "subnet-b"],
                    "securityGroups": ["sg-id"],
                    "assignPublicIp": "ENABLED"
                }
            })
        );
        assert_eq!(request.env("MAX_RUNTIME"), Some("500"));
        assert_eq!(request.env("PHONE_NUMBER"), None);
    }
}
