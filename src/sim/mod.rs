//! Trip simulation: range tracking, charging-stop decisions, plan types.

pub mod engine;
pub mod range;
pub mod types;
