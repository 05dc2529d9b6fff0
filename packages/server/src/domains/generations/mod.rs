//! Generations domain - song generation and scraper account records
//!
//! Responsibilities:
//! - Typed views over backend rows
//! - Launch, ownership and output preconditions

pub mod models;
pub mod validation;

pub use validation::Validator;
