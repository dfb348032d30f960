// src/config/mod.rs
pub mod project;
pub mod risk;
pub mod team;

// Re-export commonly used types
pub use project::{
    CloudCostRange,
    Configuration,
    NominalEstimate,
    ProjectInputs,
    MANAGED_SERVICE_PCT_RANGE,
    PROFIT_MARKUP,
    TRIAL_RANGE,
};
pub use risk::{RiskDriver, RiskLevels};
pub use team::{Role, RoleStaffing, TeamConfig};
