use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::{AppError, Result};
use crate::modules::fees::FeeSchedule;

/// Where the fee rule table comes from
#[derive(Debug, Clone, Default)]
pub struct FeeScheduleConfig {
    /// YAML file with a `structures` list; the built-in table is used when unset
    pub path: Option<PathBuf>,
}

impl FeeScheduleConfig {
    pub fn from_env() -> Self {
        Self {
            path: env::var("FEE_SCHEDULE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Read and validate the configured schedule
    pub fn load(&self) -> Result<FeeSchedule> {
        match &self.path {
            Some(path) => {
                let yaml = fs::read_to_string(path).map_err(|e| {
                    AppError::Configuration(format!(
                        "Failed to read fee schedule {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let schedule = FeeSchedule::from_yaml_str(&yaml)?;
                tracing::info!(
                    path = %path.display(),
                    structures = schedule.structures().len(),
                    "Loaded fee schedule"
                );
                Ok(schedule)
            }
            None => {
                tracing::info!("Using built-in fee schedule");
                Ok(FeeSchedule::default())
            }
        }
    }
}
