//! Kernel module - server infrastructure and dependencies.

pub mod backend;
pub mod deps;
pub mod ecs;
pub mod test_dependencies;
pub mod traits;

pub use backend::SupabaseBackend;
pub use deps::{SendgridAdapter, ServerDeps};
pub use ecs::EcsCliLauncher;
pub use test_dependencies::TestDependencies;
pub use traits::*;
