mod orchestrator;
mod record;
mod score;

pub use orchestrator::BatchOrchestrator;
#[cfg(test)]
pub use record::BatchRecord;
pub use record::{BatchStatus, SessionReport};
