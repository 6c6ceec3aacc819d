//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `payroll.yaml`.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Company the payroll is run for.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    /// Legal or display name of the company.
    pub name: String,
    /// ISO currency code all amounts are expressed in (e.g., "IDR").
    pub currency: String,
}

/// Defaults applied when a payroll request omits its rates.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollDefaults {
    /// Basic salary for one pay period.
    pub default_basic_salary: Decimal,
    /// Amount paid per approved overtime hour.
    pub default_overtime_rate: Decimal,
}

/// Bounds for the hours of a new overtime request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OvertimeLimits {
    /// Fewest hours a request may claim.
    pub min_hours: Decimal,
    /// Most hours a request may claim.
    pub max_hours: Decimal,
}

impl OvertimeLimits {
    /// Returns true if `hours` lies within `[min_hours, max_hours]`.
    pub fn allows(&self, hours: Decimal) -> bool {
        hours >= self.min_hours && hours <= self.max_hours
    }
}

impl Default for OvertimeLimits {
    fn default() -> Self {
        Self {
            min_hours: Decimal::ONE,
            max_hours: Decimal::new(3, 0),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_address: String,
}

/// Settings of the upstream authentication layer.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens.
    pub jwt_secret: String,
}

/// The complete configuration loaded from `payroll.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Company metadata.
    pub company: CompanyConfig,
    /// Payroll defaults.
    pub payroll: PayrollDefaults,
    /// Overtime request limits.
    #[serde(default)]
    pub overtime: OvertimeLimits,
    /// Server settings.
    pub server: ServerConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
}
