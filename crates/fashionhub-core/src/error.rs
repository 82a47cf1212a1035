//! # Error Types
//!
//! Domain-specific error types for fashionhub-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fashionhub-core errors (this file)                                     │
//! │  ├── ValidationError  - One field, one user-facing message              │
//! │  ├── FieldErrors      - Every failing field of one form                 │
//! │  └── CoreError        - General domain errors                           │
//! │                                                                         │
//! │  fashionhub-store errors (separate crate)                               │
//! │  └── StoreError       - REST call / decode failures                     │
//! │                                                                         │
//! │  Dashboard errors (in app)                                              │
//! │  └── ApiError         - What views see (serialized)                     │
//! │                                                                         │
//! │  Flow: FieldErrors → CoreError → ApiError → View                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation messages are shown verbatim next to the form field, so the
//! `Display` of a [`ValidationError`] is exactly its message and nothing else.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A single field failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A whole form failed validation (one message per failing field).
    #[error("Invalid input: {0}")]
    InvalidForm(#[from] FieldErrors),

    /// A monetary amount could not be represented.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single validation failure on a named form field.
///
/// The variant records which rule was violated; `message` is the exact text
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{message}")]
    Required { field: String, message: String },

    /// Field value is too long.
    #[error("{message}")]
    TooLong {
        field: String,
        max: usize,
        message: String,
    },

    /// Value could not be parsed as a number.
    #[error("{message}")]
    NotANumber { field: String, message: String },

    /// Numeric value is below its lower bound.
    #[error("{message}")]
    Negative { field: String, message: String },

    /// Invalid format (URL, slug pattern, fractional count).
    #[error("{message}")]
    InvalidFormat { field: String, message: String },
}

impl ValidationError {
    pub fn required(field: &str, message: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn too_long(field: &str, max: usize, message: &str) -> Self {
        ValidationError::TooLong {
            field: field.to_string(),
            max,
            message: message.to_string(),
        }
    }

    pub fn not_a_number(field: &str, message: &str) -> Self {
        ValidationError::NotANumber {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn negative(field: &str, message: &str) -> Self {
        ValidationError::Negative {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_format(field: &str, message: &str) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// The form field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::NotANumber { field, .. }
            | ValidationError::Negative { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        match self {
            ValidationError::Required { message, .. }
            | ValidationError::TooLong { message, .. }
            | ValidationError::NotANumber { message, .. }
            | ValidationError::Negative { message, .. }
            | ValidationError::InvalidFormat { message, .. } => message,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Every failing field of one form, keyed by field name.
///
/// Only the first violated rule per field is kept, matching how a form shows
/// one message under each input.
///
/// ## Example
/// ```rust
/// use fashionhub_core::{FieldErrors, ValidationError};
///
/// let mut errors = FieldErrors::new();
/// errors.push(ValidationError::required("name", "Product name is required"));
/// errors.push(ValidationError::too_long("name", 100, "Name is too long"));
///
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors.get("name"), Some("Product name is required"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, ValidationError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error unless the field already has one.
    pub fn push(&mut self, error: ValidationError) {
        self.errors
            .entry(error.field().to_string())
            .or_insert(error);
    }

    /// Records the error of a field check, if any.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    /// Message for one field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(ValidationError::message)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, error)| (field.as_str(), error.message()))
    }

    /// Copies the errors into a plain map (for serialization to views).
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(field, message)| (field.to_string(), message.to_string()))
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<ValidationError> for FieldErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(error);
        errors
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_displays_message_only() {
        let err = ValidationError::required("name", "Product name is required");
        assert_eq!(err.to_string(), "Product name is required");
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn test_field_errors_keep_first_per_field() {
        let mut errors = FieldErrors::new();
        errors.push(ValidationError::negative("price", "Price must be positive"));
        errors.push(ValidationError::not_a_number("price", "Price must be a number"));
        errors.push(ValidationError::required("category", "Category is required"));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("price"), Some("Price must be positive"));
        assert!(errors.contains("category"));
        assert_eq!(
            errors.to_string(),
            "category: Category is required; price: Price must be positive"
        );
    }

    #[test]
    fn test_field_errors_convert_to_core_error() {
        let errors: FieldErrors = ValidationError::required("slug", "Slug is required").into();
        let core_err: CoreError = errors.into();
        assert!(matches!(core_err, CoreError::InvalidForm(_)));
        assert_eq!(core_err.to_string(), "Invalid input: slug: Slug is required");
    }
}
