//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::payroll::PayRates;

use super::types::{AuthConfig, CompanyConfig, OvertimeLimits, PayrollConfig, ServerConfig};

/// Loads and provides access to the payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── payroll.yaml   # Company, payroll defaults, overtime limits, server, auth
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Running payroll for {}", loader.company().name);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `payroll.yaml` is missing, is not valid YAML, or
    /// lacks a required field.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config = Self::load_yaml::<PayrollConfig>(&path.as_ref().join("payroll.yaml"))?;
        Ok(Self::from_config(config))
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the company metadata.
    pub fn company(&self) -> &CompanyConfig {
        &self.config.company
    }

    /// The configured default rates.
    pub fn default_rates(&self) -> PayRates {
        PayRates {
            basic_salary: self.config.payroll.default_basic_salary,
            overtime_rate: self.config.payroll.default_overtime_rate,
        }
    }

    /// Rates for a run, falling back to the defaults for any value not given.
    pub fn rates_or_default(
        &self,
        basic_salary: Option<Decimal>,
        overtime_rate: Option<Decimal>,
    ) -> PayRates {
        let defaults = self.default_rates();
        PayRates {
            basic_salary: basic_salary.unwrap_or(defaults.basic_salary),
            overtime_rate: overtime_rate.unwrap_or(defaults.overtime_rate),
        }
    }

    /// Bounds for new overtime requests.
    pub fn overtime_limits(&self) -> OvertimeLimits {
        self.config.overtime
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.config.server
    }

    /// Returns the authentication settings.
    pub fn auth(&self) -> &AuthConfig {
        &self.config.auth
    }
}
