// src/config/risk.rs
use serde::{Serialize, Deserialize};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskDriver {
    Scope,
    Velocity,
    Rework,
    ScopeChange,
}

impl RiskDriver {
    /// Order in which highest-impact risks are reported.
    pub const ALL: [RiskDriver; 4] = [
        RiskDriver::Rework,
        RiskDriver::Scope,
        RiskDriver::Velocity,
        RiskDriver::ScopeChange,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskDriver::Scope => "Scope",
            RiskDriver::Velocity => "Velocity",
            RiskDriver::Rework => "Bugs",
            RiskDriver::ScopeChange => "Changes",
        }
    }
}

/// Risk levels normalized to [0, 1].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RiskLevels {
    pub scope: f64,
    pub velocity: f64,
    pub rework: f64,
    pub scope_change: f64,
}

impl RiskLevels {
    /// Builds levels from 0-100 percentages.
    pub fn from_percentages(
        scope: f64,
        velocity: f64,
        rework: f64,
        scope_change: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            scope: normalize(RiskDriver::Scope, scope)?,
            velocity: normalize(RiskDriver::Velocity, velocity)?,
            rework: normalize(RiskDriver::Rework, rework)?,
            scope_change: normalize(RiskDriver::ScopeChange, scope_change)?,
        })
    }

    pub fn level(&self, driver: RiskDriver) -> f64 {
        match driver {
            RiskDriver::Scope => self.scope,
            RiskDriver::Velocity => self.velocity,
            RiskDriver::Rework => self.rework,
            RiskDriver::ScopeChange => self.scope_change,
        }
    }
}

fn normalize(driver: RiskDriver, percent: f64) -> Result<f64, ConfigError> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(ConfigError::RiskOutOfRange {
            driver: driver.label(),
            value: percent,
        });
    }
    Ok(percent / 100.0)
}
