pub mod orchestrator;
pub mod run_context;

pub use orchestrator::*;
pub use run_context::*;
