//! Orchestrator - target fan-out and result aggregation

mod orchestrator;
mod progress;

pub use orchestrator::{default_concurrency, Orchestrator};
pub use progress::{ProgressSnapshot, ProgressTracker};
