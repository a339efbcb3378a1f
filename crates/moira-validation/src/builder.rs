//! Validation builder for collecting every failure of a form.

use crate::error::ValidationError;

/// Message used by most required-field checks.
pub const CANT_BE_EMPTY: &str = "Can't be empty";

/// A builder for performing multiple validations with error collection.
///
/// # Example
///
/// ```
/// use moira_validation::ValidationBuilder;
///
/// let result = ValidationBuilder::new()
///     .validate_not_empty("name", "cpu load", "Can't be empty")
///     .validate_not_empty_list("tags", &["prod"], "Select at least one tag")
///     .finish();
///
/// assert!(result.is_ok());
/// ```
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<ValidationError>,
}

impl ValidationBuilder {
    /// Create a new validation builder.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add a validation check.
    #[must_use]
    pub fn validate<F>(mut self, check: F) -> Self
    where
        F: FnOnce() -> Result<(), ValidationError>,
    {
        if let Err(e) = check() {
            self.errors.push(e);
        }
        self
    }

    /// Validate that a string is not blank.
    #[must_use]
    pub fn validate_not_empty(mut self, field: &str, value: &str, message: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::empty(field, message));
        }
        self
    }

    /// Validate that a list has at least one item.
    #[must_use]
    pub fn validate_not_empty_list<T>(mut self, field: &str, items: &[T], message: &str) -> Self {
        if items.is_empty() {
            self.errors.push(ValidationError::empty(field, message));
        }
        self
    }

    /// Record `error` when `failed` is true.
    #[must_use]
    pub fn check(mut self, failed: bool, error: impl FnOnce() -> ValidationError) -> Self {
        if failed {
            self.errors.push(error());
        }
        self
    }

    /// Check if any errors have been collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors collected.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Finish validation and return result.
    pub fn finish(self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Finish validation and return only the first error.
    pub fn finish_first(mut self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.remove(0))
        }
    }

    /// Consume and return all collected errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}
