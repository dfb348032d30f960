// src/analysis/sampling.rs

use serde::{Serialize, Deserialize};
use rand::Rng;
use rand_distr::{Beta, Distribution, Exp1, StandardNormal, Uniform};
use crate::config::{CloudCostRange, Configuration};
use crate::error::SimulationError;

/// Story points a team completes per sprint with no velocity risk.
pub const BASE_VELOCITY: f64 = 20.0;
pub const MIN_VELOCITY: f64 = 5.0;
/// Largest |z| a scope volatility draw may reach, in standard deviations.
pub const MAX_SCOPE_DEVIATIONS: f64 = 16.0;

const SCOPE_CHANGE_SHAPE: (f64, f64) = (2.0, 5.0);
const REWORK_BASELINE_SHAPE: (f64, f64) = (3.0, 8.0);

/// Random inputs consumed by a single trial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrialDraws {
    pub scope_volatility: f64,
    pub scope_change: f64,
    pub velocity: f64,
    pub rework_factor: f64,
    pub cloud_monthly: f64,
}

/// Symmetric requirements uncertainty: Normal(0, scope_risk), truncated at
/// `MAX_SCOPE_DEVIATIONS` so the worst-case scope is known up front.
pub fn sample_scope_volatility<R: Rng + ?Sized>(scope_risk: f64, rng: &mut R) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    z.clamp(-MAX_SCOPE_DEVIATIONS, MAX_SCOPE_DEVIATIONS) * scope_risk
}

/// Normal(BASE_VELOCITY, BASE_VELOCITY * velocity_risk), floored at MIN_VELOCITY.
pub fn sample_velocity<R: Rng + ?Sized>(velocity_risk: f64, rng: &mut R) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    let std_dev = BASE_VELOCITY * velocity_risk;
    (BASE_VELOCITY + std_dev * z).max(MIN_VELOCITY)
}

/// Uniform over the monthly range. A disabled range is always 0 and a
/// degenerate range (min == max) is its single value; neither consumes the stream.
pub fn sample_cloud_monthly<R: Rng + ?Sized>(range: &CloudCostRange, rng: &mut R) -> f64 {
    if !range.is_enabled() {
        return 0.0;
    }
    if range.max_monthly > range.min_monthly {
        Uniform::new(range.min_monthly, range.max_monthly).sample(rng)
    } else {
        range.min_monthly
    }
}

/// Holds the fixed-shape Beta distributions so they are built once per run.
#[derive(Debug, Clone)]
pub struct TrialSampler {
    scope_change: Beta<f64>,
    rework_baseline: Beta<f64>,
}

impl TrialSampler {
    pub fn new() -> Result<Self, SimulationError> {
        let scope_change = Beta::new(SCOPE_CHANGE_SHAPE.0, SCOPE_CHANGE_SHAPE.1)
            .map_err(|e| SimulationError::Distribution {
                name: "scope change Beta(2, 5)",
                reason: e.to_string(),
            })?;
        let rework_baseline = Beta::new(REWORK_BASELINE_SHAPE.0, REWORK_BASELINE_SHAPE.1)
            .map_err(|e| SimulationError::Distribution {
                name: "rework baseline Beta(3, 8)",
                reason: e.to_string(),
            })?;

        Ok(Self { scope_change, rework_baseline })
    }

    /// Feature creep: Beta(2, 5) scaled by the change risk. Never negative.
    pub fn sample_scope_change<R: Rng + ?Sized>(&self, change_risk: f64, rng: &mut R) -> f64 {
        self.scope_change.sample(rng) * change_risk
    }

    /// Beta(3, 8) baseline plus an exponential tail whose scale (mean) is the
    /// bug risk, capped at 1. The baseline remains when bug risk is zero.
    pub fn sample_rework_factor<R: Rng + ?Sized>(&self, bug_risk: f64, rng: &mut R) -> f64 {
        let baseline = self.rework_baseline.sample(rng);
        let tail: f64 = Exp1.sample(rng);
        (baseline + bug_risk * tail).clamp(0.0, 1.0)
    }

    /// Draws every input of one trial in a fixed order.
    pub fn draw<R: Rng + ?Sized>(&self, config: &Configuration, rng: &mut R) -> TrialDraws {
        let risks = config.risks();
        let scope_volatility = sample_scope_volatility(risks.scope, rng);
        let scope_change = self.sample_scope_change(risks.scope_change, rng);
        let velocity = sample_velocity(risks.velocity, rng);
        let rework_factor = self.sample_rework_factor(risks.rework, rng);
        let cloud_monthly = sample_cloud_monthly(config.cloud(), rng);

        TrialDraws {
            scope_volatility,
            scope_change,
            velocity,
            rework_factor,
            cloud_monthly,
        }
    }
}
