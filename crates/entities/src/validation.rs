//! Schema constraints for task records.

use thiserror::Error;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// A task payload violated a schema constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title missing, empty, or whitespace only.
    #[error("Task title is required")]
    TitleRequired,

    /// Title longer than [`TITLE_MAX_CHARS`].
    #[error("Task title cannot exceed 100 characters")]
    TitleTooLong,

    /// Description longer than [`DESCRIPTION_MAX_CHARS`].
    #[error("Task description cannot exceed 500 characters")]
    DescriptionTooLong,

    /// Status explicitly set to null.
    #[error("Task status is required")]
    StatusRequired,

    /// Priority explicitly set to null.
    #[error("Task priority is required")]
    PriorityRequired,

    /// Status outside the fixed enumeration.
    #[error("Status must be pending, in_progress or done")]
    InvalidStatus(String),

    /// Priority outside the fixed enumeration.
    #[error("Priority must be low, medium or high")]
    InvalidPriority(String),
}

/// Checks the title constraint.
pub fn validate_title(title: Option<&str>) -> Result<(), ValidationError> {
    let title = title.ok_or(ValidationError::TitleRequired)?;
    if title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// Checks the description constraint.
pub fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    match description {
        Some(text) if text.chars().count() > DESCRIPTION_MAX_CHARS => {
            Err(ValidationError::DescriptionTooLong)
        }
        _ => Ok(()),
    }
}
