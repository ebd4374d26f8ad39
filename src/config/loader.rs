//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the fee
//! schedule from a YAML configuration directory.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::FeeSchedule;

/// Loads and provides access to the fee schedule configuration.
///
/// # Directory Structure
///
/// The configuration directory should contain:
/// ```text
/// config/
/// └── fees.yaml   # Shift and job-posting fee schedules
/// ```
///
/// # Example
///
/// ```no_run
/// use shiftmatch_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Shift fee rate: {}", loader.fees().shift.service_fee_rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    fees: FeeSchedule,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if the fees file
    /// is missing (`ConfigNotFound`) or contains invalid YAML
    /// (`ConfigParseError`).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let fees_path = path.as_ref().join("fees.yaml");
        let contents = fs::read_to_string(&fees_path).map_err(|_| EngineError::ConfigNotFound {
            path: fees_path.display().to_string(),
        })?;
        let fees: FeeSchedule =
            serde_yaml::from_str(&contents).map_err(|e| EngineError::ConfigParseError {
                path: fees_path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { fees })
    }

    /// Creates a loader directly from an already-built fee schedule.
    ///
    /// Useful for tests and embedded deployments that do not read files.
    pub fn from_fees(fees: FeeSchedule) -> Self {
        Self { fees }
    }

    /// Returns the loaded fee schedule.
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_load_from_shipped_config() {
        let loader = ConfigLoader::load("./config").unwrap();
        assert_eq!(
            loader.fees().shift.service_fee_rate,
            Decimal::from_str("0.12").unwrap()
        );
        assert_eq!(
            loader.fees().job_posting.weekly_rate,
            Decimal::from_str("0.05").unwrap()
        );
    }

    #[test]
    fn test_missing_directory_returns_config_not_found() {
        let result = ConfigLoader::load("./no_such_dir");
        match result.unwrap_err() {
            EngineError::ConfigNotFound { path } => {
                assert!(path.contains("fees.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }
}
