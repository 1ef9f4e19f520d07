//! Tool argument validation.

use crate::error::AppError;

/// Returns the value of the required argument `name`, rejecting a missing or
/// empty value.
pub fn required(value: Option<String>, name: &'static str) -> Result<String, AppError> {
    match value {
        None => Err(AppError::MissingParameter(name)),
        Some(v) if v.is_empty() => Err(AppError::EmptyParameter(name)),
        Some(v) => Ok(v),
    }
}
