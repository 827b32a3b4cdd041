//! Configuration for the screening engine.

use std::path::{Path, PathBuf};

/// Conventional file name of the growth reference table
pub const REFERENCE_FILE: &str = "who_growth_reference.csv";
/// Conventional file name of the model artifact
pub const MODEL_FILE: &str = "stunting_model.json";
/// Conventional file name of the scaler artifact
pub const SCALER_FILE: &str = "stunting_scaler.json";
/// Conventional file name of the history database
pub const HISTORY_FILE: &str = "stunting_history.db";

/// Configuration for the `ScreeningEngine`
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path to the WHO growth reference CSV
    pub reference_path: PathBuf,
    /// Path to the model artifact JSON
    pub model_path: PathBuf,
    /// Path to the scaler artifact JSON
    pub scaler_path: PathBuf,
    /// Path to the SQLite history database
    pub history_path: PathBuf,
}

impl EngineConfig {
    /// Build a configuration from a data directory holding the
    /// conventionally named files
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            reference_path: dir.join(REFERENCE_FILE),
            model_path: dir.join(MODEL_FILE),
            scaler_path: dir.join(SCALER_FILE),
            history_path: dir.join(HISTORY_FILE),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_dir(Path::new("./data"))
    }
}
