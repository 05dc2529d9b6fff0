use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables.
///
/// Built once at startup; gateways and handlers borrow the section they need.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub ecs: EcsConfig,
    pub supabase: SupabaseConfig,
    pub sendgrid: SendgridConfig,
    pub limits: ScrapeLimits,
}

/// Where and how the scraper container is launched.
#[derive(Debug, Clone)]
pub struct EcsConfig {
    pub region: String,
    pub cluster: String,
    pub task_definition: String,
    pub container_name: String,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub jwt_secret: String,
    pub schema: String,
    pub app_role: String,
    /// Lifetime of each minted backend token, in seconds
    pub jwt_lifetime_secs: i64,
    pub generations_table: String,
    pub scraper_status_table: String,
    pub song_bucket: String,
    /// Lifetime of signed download URLs, in seconds
    pub download_url_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SendgridConfig {
    pub api_key: String,
    pub to: String,
    pub from: String,
}

/// Business limits applied before a scrape is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeLimits {
    /// Seconds the container needs before the scraper starts working
    pub fargate_warmup: i64,
    pub min_runtime: i64,
    pub max_runtime: i64,
    pub min_credit_balance: i64,
}

impl Default for ScrapeLimits {
    fn default() -> Self {
        Self {
            fargate_warmup: 100,
            min_runtime: 60,
            max_runtime: 1800,
            min_credit_balance: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = ScrapeLimits::default();

        Ok(Self {
            port: parse_or("PORT", 3000)?,
            ecs: EcsConfig {
                region: required("TARGET_REGION")?,
                cluster: required("ECS_CLUSTER")?,
                task_definition: required("TASK_DEFINITION")?,
                container_name: required("CONTAINER_NAME")?,
                subnets: split_list(&required("SUBNETS")?),
                security_groups: split_list(&required("SECURITY_GROUPS")?),
            },
            supabase: SupabaseConfig {
                url: required("SUPABASE_URL")?,
                anon_key: required("SUPABASE_ANON_KEY")?,
                jwt_secret: required("SUPABASE_JWT_SECRET")?,
                schema: env::var("SUPABASE_SCHEMA").unwrap_or_else(|_| "public".to_string()),
                app_role: env::var("SUPABASE_APP_ROLE")
                    .unwrap_or_else(|_| "aws_lambda".to_string()),
                jwt_lifetime_secs: parse_or("SUPABASE_JWT_LIFETIME", 60)?,
                generations_table: env::var("SUPABASE_SONG_GENERATIONS_TABLE")
                    .unwrap_or_else(|_| "song_generations".to_string()),
                scraper_status_table: env::var("SUPABASE_SCRAPER_STATUS_TABLE")
                    .unwrap_or_else(|_| "scraper_status".to_string()),
                song_bucket: env::var("SUPABASE_SONG_BUCKET")
                    .unwrap_or_else(|_| "songs".to_string()),
                download_url_lifetime_secs: parse_or("MAX_SONG_DOWNLOAD_WAIT_TIME", 60)?,
            },
            sendgrid: SendgridConfig {
                api_key: required("SENDGRID_API_KEY")?,
                to: required("SENDGRID_TO")?,
                from: required("SENDGRID_FROM")?,
            },
            limits: ScrapeLimits {
                fargate_warmup: parse_or("FARGATE_WARMUP", defaults.fargate_warmup)?,
                min_runtime: parse_or("MIN_RUNTIME", defaults.min_runtime)?,
                max_runtime: parse_or("MAX_RUNTIME", defaults.max_runtime)?,
                min_credit_balance: parse_or(
                    "MIN_SUNO_CREDIT_BALANCE",
                    defaults.min_credit_balance,
                )?,
            },
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated list, dropping blank entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
