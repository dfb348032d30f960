// src/analysis/mod.rs
pub mod runner;
pub mod sampling;
pub mod summary;
pub mod trial;

// Re-export commonly used types
pub use runner::{
    ExecutionMode,
    SimulationResult,
    SimulationRunner,
    TrialTable,
};
pub use sampling::{TrialDraws, TrialSampler};
pub use summary::{PercentileSummary, SensitivityEntry, SummaryReport};
pub use trial::{evaluate_trial, TrialColumn, TrialRecord};
