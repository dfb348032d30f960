// src/analysis/trial.rs

use serde::{Serialize, Deserialize};
use crate::analysis::sampling::{TrialDraws, MIN_VELOCITY};
use crate::config::{Configuration, RiskDriver, RiskLevels};

pub const DAYS_PER_SPRINT: f64 = 10.0;
pub const WORK_DAYS_PER_MONTH: f64 = 20.0;
pub const MIN_SCOPE: f64 = 100.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Outcome of one simulated project. Created once by `evaluate_trial`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrialRecord {
    pub final_scope: f64,
    pub velocity: f64,
    pub sprints: f64,
    pub total_days: f64,
    pub duration_months: f64,
    pub labor_cost: f64,
    pub rework_factor: f64,
    pub rework_cost: f64,
    pub cloud_cost: f64,
    pub tco_one_off: f64,
    pub managed_service_annual: f64,
    pub tco_total: f64,
    pub revenue: f64,
    pub profit: f64,
    pub profit_margin: f64,
    pub risks: RiskLevels,
}

/// Combines one set of draws with the configuration into a trial outcome.
pub fn evaluate_trial(config: &Configuration, draws: &TrialDraws) -> TrialRecord {
    let final_scope = (config.base_scope()
        * (1.0 + draws.scope_volatility + draws.scope_change))
        .max(MIN_SCOPE);

    // Duration
    let velocity = draws.velocity.max(MIN_VELOCITY);
    let sprints = final_scope / velocity;
    let total_days = sprints * DAYS_PER_SPRINT;
    let duration_months = total_days / WORK_DAYS_PER_MONTH;

    // Delivery cost
    let labor_cost = config.team().labor_cost(total_days);
    let rework_factor = draws.rework_factor.clamp(0.0, 1.0);
    let rework_cost = rework_factor * labor_cost;
    let cloud_cost = draws.cloud_monthly * duration_months;
    let tco_one_off = labor_cost + rework_cost + cloud_cost;

    // Ongoing support, amortized over the project duration
    let managed_service_annual = config.managed_service_pct() * tco_one_off;
    let tco_total = tco_one_off + managed_service_annual * duration_months / MONTHS_PER_YEAR;

    let revenue = tco_one_off * (1.0 + config.profit_markup());
    let profit = revenue - tco_total;
    let profit_margin = if revenue > 0.0 {
        profit / revenue * 100.0
    } else {
        0.0
    };

    TrialRecord {
        final_scope,
        velocity,
        sprints,
        total_days,
        duration_months,
        labor_cost,
        rework_factor,
        rework_cost,
        cloud_cost,
        tco_one_off,
        managed_service_annual,
        tco_total,
        revenue,
        profit,
        profit_margin,
        risks: *config.risks(),
    }
}

/// Every numeric column of a `TrialRecord`, labelled as in the results table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TrialColumn {
    ScopeSp,
    VelocitySp,
    Sprints,
    DurationDays,
    DurationMonths,
    LaborCost,
    ReworkCost,
    CloudCost,
    ManagedServiceAnnual,
    TcoOneOff,
    TcoTotal,
    Revenue,
    Profit,
    ProfitMarginPct,
    RiskScope,
    RiskVelocity,
    RiskBugs,
    RiskChanges,
}

impl TrialColumn {
    pub const ALL: [TrialColumn; 18] = [
        TrialColumn::ScopeSp,
        TrialColumn::VelocitySp,
        TrialColumn::Sprints,
        TrialColumn::DurationDays,
        TrialColumn::DurationMonths,
        TrialColumn::LaborCost,
        TrialColumn::ReworkCost,
        TrialColumn::CloudCost,
        TrialColumn::ManagedServiceAnnual,
        TrialColumn::TcoOneOff,
        TrialColumn::TcoTotal,
        TrialColumn::Revenue,
        TrialColumn::Profit,
        TrialColumn::ProfitMarginPct,
        TrialColumn::RiskScope,
        TrialColumn::RiskVelocity,
        TrialColumn::RiskBugs,
        TrialColumn::RiskChanges,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrialColumn::ScopeSp => "Scope_SP",
            TrialColumn::VelocitySp => "Velocity_SP",
            TrialColumn::Sprints => "Sprints",
            TrialColumn::DurationDays => "Duration_Days",
            TrialColumn::DurationMonths => "Duration_Months",
            TrialColumn::LaborCost => "Labor_Cost",
            TrialColumn::ReworkCost => "Rework_Cost",
            TrialColumn::CloudCost => "Cloud_Cost",
            TrialColumn::ManagedServiceAnnual => "Managed_Service_Annual",
            TrialColumn::TcoOneOff => "TCO_OneOff",
            TrialColumn::TcoTotal => "TCO_Total",
            TrialColumn::Revenue => "Revenue",
            TrialColumn::Profit => "Profit",
            TrialColumn::ProfitMarginPct => "Profit_Margin_%",
            TrialColumn::RiskScope => "Risk_Scope",
            TrialColumn::RiskVelocity => "Risk_Velocity",
            TrialColumn::RiskBugs => "Risk_Bugs",
            TrialColumn::RiskChanges => "Risk_Changes",
        }
    }

    pub fn value(&self, record: &TrialRecord) -> f64 {
        match self {
            TrialColumn::ScopeSp => record.final_scope,
            TrialColumn::VelocitySp => record.velocity,
            TrialColumn::Sprints => record.sprints,
            TrialColumn::DurationDays => record.total_days,
            TrialColumn::DurationMonths => record.duration_months,
            TrialColumn::LaborCost => record.labor_cost,
            TrialColumn::ReworkCost => record.rework_cost,
            TrialColumn::CloudCost => record.cloud_cost,
            TrialColumn::ManagedServiceAnnual => record.managed_service_annual,
            TrialColumn::TcoOneOff => record.tco_one_off,
            TrialColumn::TcoTotal => record.tco_total,
            TrialColumn::Revenue => record.revenue,
            TrialColumn::Profit => record.profit,
            TrialColumn::ProfitMarginPct => record.profit_margin,
            TrialColumn::RiskScope => record.risks.scope,
            TrialColumn::RiskVelocity => record.risks.velocity,
            TrialColumn::RiskBugs => record.risks.rework,
            TrialColumn::RiskChanges => record.risks.scope_change,
        }
    }

    pub fn risk_driver(&self) -> Option<RiskDriver> {
        match self {
            TrialColumn::RiskScope => Some(RiskDriver::Scope),
            TrialColumn::RiskVelocity => Some(RiskDriver::Velocity),
            TrialColumn::RiskBugs => Some(RiskDriver::Rework),
            TrialColumn::RiskChanges => Some(RiskDriver::ScopeChange),
            _ => None,
        }
    }
}

impl From<RiskDriver> for TrialColumn {
    fn from(driver: RiskDriver) -> Self {
        match driver {
            RiskDriver::Scope => TrialColumn::RiskScope,
            RiskDriver::Velocity => TrialColumn::RiskVelocity,
            RiskDriver::Rework => TrialColumn::RiskBugs,
            RiskDriver::ScopeChange => TrialColumn::RiskChanges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::config::ProjectInputs;

    fn no_risk_inputs() -> ProjectInputs {
        ProjectInputs {
            risk_scope_pct: 0.0,
            risk_velocity_pct: 0.0,
            risk_bugs_pct: 0.0,
            risk_changes_pct: 0.0,
            cloud_enabled: false,
            managed_service_enabled: false,
            ..ProjectInputs::default()
        }
    }

    fn draws(velocity: f64, rework_factor: f64, cloud_monthly: f64) -> TrialDraws {
        TrialDraws {
            scope_volatility: 0.0,
            scope_change: 0.0,
            velocity,
            rework_factor,
            cloud_monthly,
        }
    }

    #[test]
    fn nominal_trial_matches_hand_calculation() {
        let config = Configuration::from_inputs(&no_risk_inputs()).unwrap();
        let record = evaluate_trial(&config, &draws(20.0, 0.25, 0.0));

        assert_eq!(record.final_scope, 500.0);
        assert_eq!(record.sprints, 25.0);
        assert_eq!(record.total_days, 250.0);
        assert_eq!(record.duration_months, 12.5);
        assert_eq!(record.labor_cost, 500_000.0);
        assert_eq!(record.rework_cost, 125_000.0);
        assert_eq!(record.cloud_cost, 0.0);
        assert_eq!(record.tco_one_off, 625_000.0);
        assert_eq!(record.managed_service_annual, 0.0);
        assert_eq!(record.tco_total, 625_000.0);
        assert_relative_eq!(record.revenue, 750_000.0, max_relative = 1e-12);
        assert_relative_eq!(record.profit, 125_000.0, max_relative = 1e-9);
        assert_relative_eq!(record.profit_margin, 100.0 / 6.0, max_relative = 1e-9);
    }

    #[test]
    fn managed_service_is_amortized_over_duration() {
        let inputs = ProjectInputs {
            managed_service_enabled: true,
            managed_service_pct: 15.0,
            cloud_enabled: true,
            cloud_min_monthly: 1_000.0,
            cloud_max_monthly: 5_000.0,
            ..no_risk_inputs()
        };
        let config = Configuration::from_inputs(&inputs).unwrap();
        let record = evaluate_trial(&config, &draws(20.0, 0.0, 2_000.0));

        assert_eq!(record.cloud_cost, 25_000.0);
        assert_eq!(record.tco_one_off, 525_000.0);
        assert_relative_eq!(record.managed_service_annual, 78_750.0, max_relative = 1e-12);
        assert_relative_eq!(
            record.tco_total,
            525_000.0 + 78_750.0 * 12.5 / 12.0,
            max_relative = 1e-12
        );
        assert!(record.tco_total > record.tco_one_off);
    }

    #[test]
    fn scope_and_velocity_floors_apply() {
        let config = Configuration::from_inputs(&no_risk_inputs()).unwrap();
        let shrunk = TrialDraws {
            scope_volatility: -3.0,
            scope_change: 0.0,
            velocity: 0.0,
            rework_factor: 2.0,
            cloud_monthly: 0.0,
        };
        let record = evaluate_trial(&config, &shrunk);

        assert_eq!(record.final_scope, MIN_SCOPE);
        assert_eq!(record.velocity, MIN_VELOCITY);
        assert_eq!(record.sprints, 20.0);
        assert_eq!(record.rework_factor, 1.0);
    }

    #[test]
    fn zero_revenue_has_zero_margin() {
        let inputs = ProjectInputs {
            developer_rate: 0.0,
            qa_rate: 0.0,
            pm_rate: 0.0,
            ..no_risk_inputs()
        };
        let config = Configuration::from_inputs(&inputs).unwrap();
        let record = evaluate_trial(&config, &draws(20.0, 0.5, 0.0));

        assert_eq!(record.revenue, 0.0);
        assert_eq!(record.profit_margin, 0.0);
    }

    #[test]
    fn columns_read_back_record_fields() {
        let config = Configuration::from_inputs(&ProjectInputs::default()).unwrap();
        let record = evaluate_trial(&config, &draws(18.0, 0.3, 3_000.0));

        assert_eq!(TrialColumn::TcoTotal.value(&record), record.tco_total);
        assert_eq!(TrialColumn::RiskBugs.value(&record), 0.35);
        assert_eq!(TrialColumn::ProfitMarginPct.label(), "Profit_Margin_%");
        for driver in RiskDriver::ALL {
            assert_eq!(TrialColumn::from(driver).risk_driver(), Some(driver));
        }
    }
}
