// src/file/mod.rs
use anyhow::Result;
use std::path::Path;

pub mod archive;
pub mod config;
pub mod export;

pub use archive::{RunArchive, RunMetadata};
pub use config::ConfigFileHandler;
pub use export::{export_to_path, read_trial_export, write_trial_export, ExportRow, EXPORT_COLUMNS};

// Core trait for file operations
pub trait FileHandler<T> {
    fn load(&self, path: &Path) -> Result<T>;
    fn save(&self, data: &T, path: &Path) -> Result<()>;
}

pub(crate) fn pretty_config() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .new_line("\n".to_string())
        .depth_limit(4)
        .separate_tuple_members(true)
}
