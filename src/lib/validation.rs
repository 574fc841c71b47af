//! Input validation utilities
//!
//! Checks for command-line parameters with consistent error messages, returned as
//! [`SplitError::InvalidParameter`].

use crate::errors::{Result, SplitError};
use std::fmt::Display;

/// Validate that a value is positive (> 0)
///
/// # Arguments
/// * `value` - Value to validate
/// * `name` - Name of the parameter for error messages
///
/// # Errors
/// Returns an error if the value is not positive
///
/// # Example
/// ```
/// use vcfsplit_lib::validation::validate_positive;
///
/// validate_positive(10, "lines").unwrap();
///
/// let result = validate_positive(0, "threads");
/// assert!(result.is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(SplitError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be positive (> 0), got: {value}"),
        });
    }
    Ok(())
}

/// Validate that a megabytes-per-part value can be expressed in bytes.
///
/// # Errors
/// Returns an error if `mb * 1 MiB` overflows a `u64`.
pub fn validate_megabytes(mb: u64, name: &str) -> Result<()> {
    if mb.checked_mul(crate::batch::BYTES_PER_MB).is_none() {
        return Err(SplitError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("{mb} MB does not fit in a 64-bit byte count"),
        });
    }
    Ok(())
}
