//! Scraping domain - launching and polling the scraper container
//!
//! Responsibilities:
//! - Runtime budget adjustment
//! - Task submission and outcome classification
//! - The start and status handlers

pub mod actions;
pub mod gateway;
pub mod models;

pub use actions::{check_song_status, start_scrape};
pub use gateway::TaskLauncherGateway;
