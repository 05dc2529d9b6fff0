//! Auth domain - credentials this service presents to the backend
//!
//! Responsibilities:
//! - Minting short-lived, role-scoped backend tokens

pub mod jwt;

pub use jwt::{BackendTokenService, Claims};
