// src/lib.rs
pub mod analysis;
pub mod config;
pub mod error;
pub mod file;

pub use analysis::{
    ExecutionMode,
    SimulationResult,
    SimulationRunner,
    SummaryReport,
    TrialColumn,
    TrialRecord,
    TrialTable,
};
pub use config::{Configuration, ProjectInputs, RiskDriver};
pub use error::{ConfigError, SimulationError};
