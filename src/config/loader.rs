//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the leave
//! policy from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{LeaveTypesConfig, PolicyConfig, PolicyMetadata};

/// Loads and provides access to the leave policy configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/leave/
/// ├── policy.yaml       # Policy metadata and leave-year start month
/// └── leave_types.yaml  # Accrual rates and caps per leave type
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/leave").unwrap();
/// let sick = loader.config().policy("sick").unwrap();
/// println!("{} accrues {} days/month", sick.name, sick.monthly_rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g. "./config/leave")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The leave-year start month is out of range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<PolicyMetadata>(&path.join("policy.yaml"))?;
        let leave_types = Self::load_yaml::<LeaveTypesConfig>(&path.join("leave_types.yaml"))?;

        let config = PolicyConfig::new(metadata, leave_types.leave_types)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParse {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying policy configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_directory_reports_path() {
        let result = ConfigLoader::load("/nonexistent/config/leave");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_repo_config_directory() {
        let loader = ConfigLoader::load("./config/leave").unwrap();
        let config = loader.config();
        assert_eq!(config.leave_year_start_month(), 4);
        assert!(config.policy("earned_annual").is_ok());
        assert!(config.policy("sick").is_ok());
        assert!(config.policy("casual").is_ok());
        assert!(config.policy("unpaid").is_ok());
    }

    #[test]
    fn test_repo_config_matches_standard_policy() {
        let loader = ConfigLoader::load("./config/leave").unwrap();
        let standard = PolicyConfig::standard();
        for (code, policy) in standard.leave_types() {
            let loaded = loader.config().policy(code).unwrap();
            assert_eq!(loaded, policy, "policy mismatch for {}", code);
        }
    }
}
