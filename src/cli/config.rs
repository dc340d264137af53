//! Configuration file loading for CLI commands

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};

use crate::pipeline::TrainingConfig;

/// Load a training configuration from a JSON file
///
/// Missing fields fall back to their defaults, so a file may set only the
/// values it cares about:
///
/// ```json
/// { "episodes": 2000, "learner": { "learning_rate": 0.2 } }
/// ```
pub fn load_training_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
