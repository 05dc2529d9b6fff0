//! Scraping domain actions - the two request handlers
//!
//! Actions are async functions called directly from the HTTP routes.

mod check_song_status;
mod start_scrape;

pub use check_song_status::{check_song_status, SongStatus, SongStatusQuery};
pub use start_scrape::{start_scrape, ScrapeStarted, StartScrapeRequest};
