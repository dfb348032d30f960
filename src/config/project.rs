// src/config/project.rs
use serde::{Serialize, Deserialize};
use std::ops::RangeInclusive;

use super::{RiskLevels, RoleStaffing, TeamConfig};
use crate::analysis::sampling::{TrialDraws, BASE_VELOCITY, MAX_SCOPE_DEVIATIONS, MIN_VELOCITY};
use crate::analysis::trial::{evaluate_trial, TrialColumn, DAYS_PER_SPRINT, WORK_DAYS_PER_MONTH};
use crate::error::ConfigError;

pub const TRIAL_RANGE: RangeInclusive<usize> = 1_000..=10_000;
pub const MANAGED_SERVICE_PCT_RANGE: RangeInclusive<f64> = 5.0..=50.0;
/// Markup applied to the one-off cost to derive revenue.
pub const PROFIT_MARKUP: f64 = 0.20;

/// Raw project inputs as entered on the configuration form.
/// Percentages are 0-100 here and are only normalized once validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectInputs {
    pub developer_rate: f64,
    pub qa_rate: f64,
    pub pm_rate: f64,
    pub developer_count: u32,
    pub qa_count: u32,
    pub pm_count: u32,
    pub base_scope: f64,
    pub risk_scope_pct: f64,
    pub risk_velocity_pct: f64,
    pub risk_bugs_pct: f64,
    pub risk_changes_pct: f64,
    pub cloud_enabled: bool,
    pub cloud_min_monthly: f64,
    pub cloud_max_monthly: f64,
    pub managed_service_enabled: bool,
    pub managed_service_pct: f64,
    pub trials: usize,
    pub seed: u64,
}

impl Default for ProjectInputs {
    fn default() -> Self {
        Self {
            developer_rate: 400.0,
            qa_rate: 350.0,
            pm_rate: 500.0,
            developer_count: 2,
            qa_count: 2,
            pm_count: 1,
            base_scope: 500.0,
            risk_scope_pct: 30.0,
            risk_velocity_pct: 25.0,
            risk_bugs_pct: 35.0,
            risk_changes_pct: 20.0,
            cloud_enabled: true,
            cloud_min_monthly: 1_000.0,
            cloud_max_monthly: 5_000.0,
            managed_service_enabled: true,
            managed_service_pct: 15.0,
            trials: 5_000,
            seed: 42,
        }
    }
}

/// Monthly cloud cost bounds. Both zero when cloud infrastructure is not used.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CloudCostRange {
    pub min_monthly: f64,
    pub max_monthly: f64,
}

impl CloudCostRange {
    pub const DISABLED: CloudCostRange = CloudCostRange { min_monthly: 0.0, max_monthly: 0.0 };

    pub fn new(min_monthly: f64, max_monthly: f64) -> Result<Self, ConfigError> {
        let finite = min_monthly.is_finite() && max_monthly.is_finite();
        if !finite || min_monthly < 0.0 || max_monthly < 0.0 {
            return Err(ConfigError::InvalidCloudCost { min: min_monthly, max: max_monthly });
        }
        if min_monthly > max_monthly {
            return Err(ConfigError::CloudRangeInverted { min: min_monthly, max: max_monthly });
        }
        Ok(Self { min_monthly, max_monthly })
    }

    pub fn is_enabled(&self) -> bool {
        self.max_monthly > 0.0
    }
}

/// Deterministic no-risk preview shown next to the scope input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NominalEstimate {
    pub sprints: f64,
    pub months: f64,
}

/// Validated, immutable parameters for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    team: TeamConfig,
    base_scope: f64,
    risks: RiskLevels,
    cloud: CloudCostRange,
    managed_service_pct: f64,
    profit_markup: f64,
    trials: usize,
    seed: u64,
}

impl Configuration {
    pub fn from_inputs(inputs: &ProjectInputs) -> Result<Self, ConfigError> {
        let team = TeamConfig {
            developer: RoleStaffing::new(inputs.developer_rate, inputs.developer_count),
            qa: RoleStaffing::new(inputs.qa_rate, inputs.qa_count),
            project_manager: RoleStaffing::new(inputs.pm_rate, inputs.pm_count),
        };
        team.validate()?;

        if !inputs.base_scope.is_finite() || inputs.base_scope <= 0.0 {
            return Err(ConfigError::NonPositiveScope(inputs.base_scope));
        }

        let risks = RiskLevels::from_percentages(
            inputs.risk_scope_pct,
            inputs.risk_velocity_pct,
            inputs.risk_bugs_pct,
            inputs.risk_changes_pct,
        )?;

        let cloud = if inputs.cloud_enabled {
            CloudCostRange::new(inputs.cloud_min_monthly, inputs.cloud_max_monthly)?
        } else {
            CloudCostRange::DISABLED
        };

        let managed_service_pct = if inputs.managed_service_enabled {
            if !MANAGED_SERVICE_PCT_RANGE.contains(&inputs.managed_service_pct) {
                return Err(ConfigError::ManagedServiceOutOfRange {
                    value: inputs.managed_service_pct,
                    min: *MANAGED_SERVICE_PCT_RANGE.start(),
                    max: *MANAGED_SERVICE_PCT_RANGE.end(),
                });
            }
            inputs.managed_service_pct / 100.0
        } else {
            0.0
        };

        if !TRIAL_RANGE.contains(&inputs.trials) {
            return Err(ConfigError::TrialCountOutOfRange {
                count: inputs.trials,
                min: *TRIAL_RANGE.start(),
                max: *TRIAL_RANGE.end(),
            });
        }

        let config = Self {
            team,
            base_scope: inputs.base_scope,
            risks,
            cloud,
            managed_service_pct,
            profit_markup: PROFIT_MARKUP,
            trials: inputs.trials,
            seed: inputs.seed,
        };
        config.check_worst_case()?;
        Ok(config)
    }

    /// Evaluates the costliest trial the samplers can produce: the largest
    /// scope, floored velocity, full rework and the top cloud rate. Costs grow
    /// monotonically with these, so if this trial stays finite every trial does.
    fn check_worst_case(&self) -> Result<(), ConfigError> {
        let worst = evaluate_trial(self, &TrialDraws {
            scope_volatility: MAX_SCOPE_DEVIATIONS * self.risks.scope,
            scope_change: self.risks.scope_change,
            velocity: MIN_VELOCITY,
            rework_factor: 1.0,
            cloud_monthly: self.cloud.max_monthly,
        });

        if TrialColumn::ALL.iter().all(|column| column.value(&worst).is_finite()) {
            Ok(())
        } else {
            Err(ConfigError::CostOverflow { tco_total: worst.tco_total })
        }
    }

    pub fn team(&self) -> &TeamConfig {
        &self.team
    }

    pub fn base_scope(&self) -> f64 {
        self.base_scope
    }

    pub fn risks(&self) -> &RiskLevels {
        &self.risks
    }

    pub fn cloud(&self) -> &CloudCostRange {
        &self.cloud
    }

    /// Managed-service fraction of the one-off cost (0 when disabled).
    pub fn managed_service_pct(&self) -> f64 {
        self.managed_service_pct
    }

    pub fn profit_markup(&self) -> f64 {
        self.profit_markup
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn nominal_estimate(&self) -> NominalEstimate {
        let sprints = self.base_scope / BASE_VELOCITY;
        NominalEstimate {
            sprints,
            months: sprints * DAYS_PER_SPRINT / WORK_DAYS_PER_MONTH,
        }
    }
}
