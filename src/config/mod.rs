//! Configuration loading and management for the payroll engine.
//!
//! This module loads `payroll.yaml`: company metadata, default pay rates,
//! overtime request limits, and server and authentication settings.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Currency: {}", config.company().currency);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AuthConfig, CompanyConfig, OvertimeLimits, PayrollConfig, PayrollDefaults, ServerConfig,
};
