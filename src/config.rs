//! Reconciliation configuration

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::*;
use crate::utils::validation::validate_tolerance;

/// Environment variable holding the value tolerance
pub const TOLERANCE_ENV: &str = "GST_RECON_TOLERANCE";
/// Environment variable toggling the `invoice value` column requirement
pub const REQUIRE_VALUE_COLUMN_ENV: &str = "GST_RECON_REQUIRE_VALUE_COLUMN";

/// Settings for a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Largest absolute invoice value difference still reported as matched
    pub tolerance: BigDecimal,
    /// Fail with a schema error when `invoice value` is absent from either table.
    /// When false, an absent value column compares as zero.
    pub require_value_column: bool,
    /// Suffix for Books columns that clash with GSTR columns on export
    pub books_suffix: String,
    /// Suffix for GSTR columns that clash with Books columns on export
    pub gstr_suffix: String,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            require_value_column: true,
            books_suffix: "_books".to_string(),
            gstr_suffix: "_gstr".to_string(),
        }
    }
}

/// Half a rupee
fn default_tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(2)
}

impl ReconConfig {
    /// Load configuration from environment variables, using defaults for unset ones
    pub fn from_env() -> ReconResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ReconConfig::from_env`] with an explicit variable lookup
    pub fn from_lookup<F>(lookup: F) -> ReconResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(TOLERANCE_ENV) {
            config.tolerance = BigDecimal::from_str(raw.trim()).map_err(|e| {
                ReconError::Config(format!("{} must be a decimal number: {}", TOLERANCE_ENV, e))
            })?;
        }

        if let Some(raw) = lookup(REQUIRE_VALUE_COLUMN_ENV) {
            config.require_value_column = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(ReconError::Config(format!(
                        "{} must be a boolean, got '{}'",
                        REQUIRE_VALUE_COLUMN_ENV, other
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the tolerance
    pub fn with_tolerance(mut self, tolerance: BigDecimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set whether the `invoice value` column is required
    pub fn with_required_value_column(mut self, required: bool) -> Self {
        self.require_value_column = required;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> ReconResult<()> {
        validate_tolerance(&self.tolerance)?;

        if self.books_suffix.is_empty() || self.gstr_suffix.is_empty() {
            return Err(ReconError::Config(
                "Column suffixes cannot be empty".to_string(),
            ));
        }
        if self.books_suffix == self.gstr_suffix {
            return Err(ReconError::Config(format!(
                "Books and GSTR suffixes must differ, both are '{}'",
                self.books_suffix
            )));
        }

        Ok(())
    }
}
