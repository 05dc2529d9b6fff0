// Shared types used across domains
pub mod rejection;
pub mod response;

pub use rejection::Rejection;
pub use response::HandlerResponse;
