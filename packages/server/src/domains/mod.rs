pub mod auth;
pub mod generations;
pub mod notifications;
pub mod scraping;
