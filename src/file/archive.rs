// src/file/archive.rs

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Result, Context, anyhow};
use chrono::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use super::{pretty_config, ConfigFileHandler, FileHandler};
use super::export::export_to_path;
use crate::analysis::{SimulationResult, SummaryReport};
use crate::config::ProjectInputs;

const INPUTS_FILE: &str = "inputs.ron";
const SUMMARY_FILE: &str = "summary.ron";
const TRIALS_FILE: &str = "trials.csv";
const METADATA_FILE: &str = "metadata.ron";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunMetadata {
    pub version: String,
    pub run_id: String,
    pub created: DateTime<Utc>,
    pub seed: u64,
    pub trial_count: usize,
    pub files: Vec<String>,
}

/// Stores completed runs under `<project>/runs/<run_id>/`.
#[derive(Debug)]
pub struct RunArchive {
    base_path: PathBuf,
}

impl RunArchive {
    pub fn new(project_path: &Path) -> Self {
        Self {
            base_path: project_path.join("runs"),
        }
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.base_path.join(run_id)
    }

    /// Writes the inputs, summary, export table and metadata of a run.
    /// Returns the run directory.
    pub fn save_run(
        &self,
        inputs: &ProjectInputs,
        result: &SimulationResult,
        summary: &SummaryReport,
    ) -> Result<PathBuf> {
        let run_dir = self.run_dir(&result.run_id);
        fs::create_dir_all(&run_dir)
            .with_context(|| format!("Failed to create run directory: {}", run_dir.display()))?;

        ConfigFileHandler::new().save(inputs, &run_dir.join(INPUTS_FILE))?;

        let summary_content = ron::ser::to_string_pretty(summary, pretty_config())?;
        fs::write(run_dir.join(SUMMARY_FILE), summary_content)?;

        export_to_path(result.trials(), run_dir.join(TRIALS_FILE))?;

        let metadata = RunMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: result.run_id.clone(),
            created: result.completed_at,
            seed: result.configuration().seed(),
            trial_count: result.trials().len(),
            files: vec![
                INPUTS_FILE.to_string(),
                SUMMARY_FILE.to_string(),
                TRIALS_FILE.to_string(),
            ],
        };
        let metadata_content = ron::ser::to_string_pretty(&metadata, pretty_config())?;
        fs::write(run_dir.join(METADATA_FILE), metadata_content)?;

        info!(run_id = %result.run_id, path = %run_dir.display(), "run archived");
        Ok(run_dir)
    }

    pub fn load_metadata(&self, run_id: &str) -> Result<RunMetadata> {
        self.read_ron(run_id, METADATA_FILE)
    }

    pub fn load_summary(&self, run_id: &str) -> Result<SummaryReport> {
        self.read_ron(run_id, SUMMARY_FILE)
    }

    pub fn load_inputs(&self, run_id: &str) -> Result<ProjectInputs> {
        ConfigFileHandler::new().load(&self.run_dir(run_id).join(INPUTS_FILE))
    }

    /// Metadata of every archived run that can still be read, oldest first.
    pub fn list_runs(&self) -> Result<Vec<RunMetadata>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().into_owned();
            match self.load_metadata(&run_id) {
                Ok(metadata) => runs.push(metadata),
                Err(e) => warn!(run_id = %run_id, error = %e, "skipping unreadable run"),
            }
        }

        runs.sort_by(|a, b| a.created.cmp(&b.created));
        Ok(runs)
    }

    fn read_ron<T: for<'de> Deserialize<'de>>(&self, run_id: &str, file: &str) -> Result<T> {
        let path = self.run_dir(run_id).join(file);
        if !path.exists() {
            return Err(anyhow!("Run file not found: {}", path.display()));
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read run file: {}", path.display()))?;
        ron::from_str(&content)
            .with_context(|| format!("Failed to parse run file: {}", path.display()))
    }
}
