use regex::Regex;

use crate::shared::errors::AppError;

/// Minimum length for a resolution reason on reject/dismiss.
pub const MIN_RESOLUTION_REASON_LEN: usize = 10;

pub struct Validator;

impl Validator {
    /// Resolution reason required when rejecting or dismissing an item
    pub fn validate_resolution_reason(reason: &str) -> Result<(), AppError> {
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(AppError::ValidationError(
                "Resolution reason cannot be empty".to_string(),
            ));
        }
        if trimmed.len() < MIN_RESOLUTION_REASON_LEN {
            return Err(AppError::ValidationError(format!(
                "Resolution reason too short (min {} characters)",
                MIN_RESOLUTION_REASON_LEN
            )));
        }
        if trimmed.len() > 2000 {
            return Err(AppError::ValidationError(
                "Resolution reason too long (max 2000 characters)".to_string(),
            ));
        }
        Ok(())
    }

    /// Free-text description attached to a report
    pub fn validate_report_description(description: &str) -> Result<(), AppError> {
        if description.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Report description cannot be empty".to_string(),
            ));
        }
        if description.len() > 4000 {
            return Err(AppError::ValidationError(
                "Report description too long (max 4000 characters)".to_string(),
            ));
        }
        Ok(())
    }

    /// Proposed field names in a contribution payload must be plain
    /// snake_case identifiers
    pub fn validate_payload_field_name(name: &str) -> Result<(), AppError> {
        let re = Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
        if !re.is_match(name) {
            return Err(AppError::ValidationError(format!(
                "Invalid payload field name: '{}'",
                name
            )));
        }
        Ok(())
    }

    pub fn validate_pagination(offset: i64, limit: i64) -> Result<(), AppError> {
        if offset < 0 {
            return Err(AppError::ValidationError(
                "Offset cannot be negative".to_string(),
            ));
        }
        if limit <= 0 {
            return Err(AppError::ValidationError(
                "Limit must be positive".to_string(),
            ));
        }
        if limit > 100 {
            return Err(AppError::ValidationError(
                "Limit cannot exceed 100".to_string(),
            ));
        }
        Ok(())
    }
}
