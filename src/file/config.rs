// src/file/config.rs
use super::{pretty_config, FileHandler};
use crate::config::ProjectInputs;
use std::path::Path;
use std::fs;
use anyhow::{Result, Context};
use tracing::debug;

#[derive(Debug, Default)]
pub struct ConfigFileHandler;

impl ConfigFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<ProjectInputs> for ConfigFileHandler {
    fn load(&self, path: &Path) -> Result<ProjectInputs> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project inputs: {}", path.display()))?;
        let inputs = ron::from_str(&content)
            .with_context(|| format!("Failed to parse project inputs: {}", path.display()))?;
        debug!(path = %path.display(), "loaded project inputs");
        Ok(inputs)
    }

    fn save(&self, data: &ProjectInputs, path: &Path) -> Result<()> {
        let content = ron::ser::to_string_pretty(data, pretty_config())?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write project inputs: {}", path.display()))?;
        Ok(())
    }
}
