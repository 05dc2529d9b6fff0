mod runtime;
mod task;

pub use runtime::{leading_integer, RuntimeBudget};
pub use task::*;
