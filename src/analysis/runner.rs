// src/analysis/runner.rs

use std::time::Instant;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::sampling::TrialSampler;
use crate::analysis::summary::SummaryReport;
use crate::analysis::trial::{evaluate_trial, TrialColumn, TrialRecord};
use crate::config::{Configuration, ProjectInputs};
use crate::error::SimulationError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    #[default]
    Parallel,
}

/// Trial outcomes in generation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrialTable {
    records: Vec<TrialRecord>,
}

impl TrialTable {
    pub fn from_records(records: Vec<TrialRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrialRecord> {
        self.records.iter()
    }

    pub fn column(&self, column: TrialColumn) -> Vec<f64> {
        self.records.iter().map(|r| column.value(r)).collect()
    }
}

impl<'a> IntoIterator for &'a TrialTable {
    type Item = &'a TrialRecord;
    type IntoIter = std::slice::Iter<'a, TrialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A completed run. Owned by the caller; nothing is retained by the runner.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub run_id: String,
    pub completed_at: DateTime<Utc>,
    configuration: Configuration,
    trials: TrialTable,
}

impl SimulationResult {
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn trials(&self) -> &TrialTable {
        &self.trials
    }

    pub fn into_trials(self) -> TrialTable {
        self.trials
    }

    pub fn summary(&self) -> SummaryReport {
        SummaryReport::from_table(&self.trials)
    }
}

/// Random stream for one trial: the run seed selects the key and the trial
/// index selects the ChaCha stream, so trials never share draws.
pub fn trial_rng(seed: u64, trial_index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(trial_index as u64);
    rng
}

#[derive(Debug, Clone)]
pub struct SimulationRunner {
    config: Configuration,
    mode: ExecutionMode,
    sampler: TrialSampler,
}

impl SimulationRunner {
    pub fn new(config: Configuration) -> Result<Self, SimulationError> {
        Ok(Self {
            config,
            mode: ExecutionMode::default(),
            sampler: TrialSampler::new()?,
        })
    }

    pub fn from_inputs(inputs: &ProjectInputs) -> Result<Self, SimulationError> {
        Self::new(Configuration::from_inputs(inputs)?)
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Evaluates a single trial from its own sub-stream.
    pub fn run_trial(&self, trial_index: usize) -> TrialRecord {
        let mut rng = trial_rng(self.config.seed(), trial_index);
        let draws = self.sampler.draw(&self.config, &mut rng);
        evaluate_trial(&self.config, &draws)
    }

    pub fn run(&self) -> Result<SimulationResult, SimulationError> {
        let expected = self.config.trials();
        info!(
            trials = expected,
            seed = self.config.seed(),
            mode = ?self.mode,
            "starting Monte Carlo run"
        );
        let started = Instant::now();

        let records: Vec<TrialRecord> = match self.mode {
            ExecutionMode::Sequential => (0..expected)
                .map(|i| self.run_trial(i))
                .collect(),
            ExecutionMode::Parallel => (0..expected)
                .into_par_iter()
                .map(|i| self.run_trial(i))
                .collect(),
        };

        if records.len() != expected {
            return Err(SimulationError::IncompleteRun {
                expected,
                actual: records.len(),
            });
        }

        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "trials complete");

        let result = SimulationResult {
            run_id: Uuid::new_v4().to_string(),
            completed_at: Utc::now(),
            configuration: self.config.clone(),
            trials: TrialTable::from_records(records),
        };
        info!(run_id = %result.run_id, "Monte Carlo run finished");
        Ok(result)
    }
}
