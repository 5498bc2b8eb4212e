//! Validation utilities

use crate::types::*;
use bigdecimal::{BigDecimal, Zero};

/// Validate that a tolerance is non-negative
pub fn validate_tolerance(tolerance: &BigDecimal) -> ReconResult<()> {
    if *tolerance < BigDecimal::zero() {
        Err(ReconError::InvalidTolerance(format!(
            "tolerance must be non-negative, got {}",
            tolerance
        )))
    } else {
        Ok(())
    }
}

/// Validate that every required column is present in a normalized header
pub fn validate_required_columns(
    side: Side,
    columns: &[String],
    required: &[&str],
) -> ReconResult<()> {
    for column in required {
        if !columns.iter().any(|c| c == column) {
            return Err(ReconError::Schema {
                side,
                column: column.to_string(),
            });
        }
    }

    Ok(())
}
