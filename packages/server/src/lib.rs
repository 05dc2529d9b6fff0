// Suno Scraper API - Core
//
// This crate launches long-running Suno scrape tasks on Fargate and reports
// on their progress. Preconditions and results live in Supabase; failures
// are emailed to operators through SendGrid.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
