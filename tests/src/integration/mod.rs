//! Cross-component integration tests, grouped by the property they exercise.

pub mod fairness;
pub mod harness;
pub mod restart_recovery;
pub mod scenarios;
