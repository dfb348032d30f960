// src/error.rs
use thiserror::Error;

/// Rejections raised while turning raw project inputs into a `Configuration`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{role} daily rate must be a non-negative number, got {value}")]
    InvalidRate { role: &'static str, value: f64 },

    #[error("{role} headcount {count} is outside the allowed range {min}..={max}")]
    HeadcountOutOfRange {
        role: &'static str,
        count: u32,
        min: u32,
        max: u32,
    },

    #[error("base scope must be a positive number of story points, got {0}")]
    NonPositiveScope(f64),

    #[error("{driver} risk must be between 0 and 100 percent, got {value}")]
    RiskOutOfRange { driver: &'static str, value: f64 },

    #[error("cloud monthly costs must be non-negative numbers, got min={min} max={max}")]
    InvalidCloudCost { min: f64, max: f64 },

    #[error("cloud minimum monthly cost {min} exceeds the maximum {max}")]
    CloudRangeInverted { min: f64, max: f64 },

    #[error("managed service percentage must be between {min} and {max}, got {value}")]
    ManagedServiceOutOfRange { value: f64, min: f64, max: f64 },

    #[error("trial count {count} is outside the allowed range {min}..={max}")]
    TrialCountOutOfRange { count: usize, min: usize, max: usize },

    #[error("inputs are too large: worst-case trial costs overflow (total cost {tco_total})")]
    CostOverflow { tco_total: f64 },
}

/// Failures that abort a whole simulation run. No partial trial table survives them.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build {name} distribution: {reason}")]
    Distribution { name: &'static str, reason: String },

    #[error("run produced {actual} trials, expected {expected}")]
    IncompleteRun { expected: usize, actual: usize },
}
