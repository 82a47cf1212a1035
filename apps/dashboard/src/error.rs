//! # API Error Type
//!
//! Unified error type for dashboard queries, mutations and commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Dashboard                          │
//! │                                                                         │
//! │  Form input ── validate_product ── FieldErrors ──────────┐              │
//! │       │                                                  │              │
//! │       ▼ (valid)                                          │              │
//! │  Store call ── StoreError::Http("Failed to ...") ────────┤              │
//! │       │         StoreError::NotFound { .. } ─────────────┤              │
//! │       │                                                  ▼              │
//! │  Auth call ─── AuthError::InvalidCredentials ───────► ApiError ───────► │
//! │                                                     { code, message }   │
//! │                                                                         │
//! │  Reads:  ApiError lands in QueryState::error (is_error = true)          │
//! │  Writes: ApiError is returned to the caller; the form stays open        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! `ApiError` is `Clone` (one failed shared read is handed to every waiter)
//! and serializes to:
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "price: Price must be positive",
//!   "fields": { "price": "Price must be positive" }
//! }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;

use fashionhub_core::{CoreError, FieldErrors, ValidationError};
use fashionhub_store::{AuthError, StoreError};

/// Error returned by every dashboard operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record does not exist
    NotFound,

    /// Form input failed validation; nothing was sent
    ValidationError,

    /// The store call failed
    StoreError,

    /// The auth provider rejected the request
    AuthError,

    /// The command needs a signed-in user
    Unauthenticated,

    /// Internal error (configuration, session file, cache)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error carrying every field message.
    pub fn invalid_form(errors: &FieldErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: errors.to_string(),
            fields: Some(errors.to_map()),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthenticated, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Message for one form field, if validation flagged it.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.as_ref()?.get(name).map(String::as_str)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Http { .. } | StoreError::Network { .. } => {
                ApiError::new(ErrorCode::StoreError, err.to_string())
            }
            StoreError::Decode { ref operation, ref reason } => {
                // Log the actual cause but show the operation
                tracing::error!(operation = %operation, reason = %reason, "Store response rejected");
                ApiError::new(ErrorCode::StoreError, operation.clone())
            }
            StoreError::InvalidConfig(_)
            | StoreError::ConfigLoadFailed(_)
            | StoreError::ConfigSaveFailed(_) => ApiError::internal(err.to_string()),
        }
    }
}

/// Converts auth errors to API errors.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::new(ErrorCode::AuthError, err.to_string()),
            AuthError::SessionExpired => {
                ApiError::unauthenticated(err.to_string())
            }
            AuthError::Store(e) => e.into(),
            AuthError::SessionFile(_) => ApiError::internal(err.to_string()),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::InvalidForm(errors) => errors.into(),
            CoreError::InvalidAmount(_) => {
                ApiError::new(ErrorCode::ValidationError, err.to_string())
            }
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::invalid_form(&errors)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::invalid_form(&FieldErrors::from(err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_keep_operation_message() {
        let err: ApiError = StoreError::Http {
            operation: "Failed to fetch products".to_string(),
            status: 500,
        }
        .into();
        assert_eq!(err.code, ErrorCode::StoreError);
        assert_eq!(err.message, "Failed to fetch products");

        let err: ApiError = StoreError::not_found("Product", 42).into();
        assert!(err.is_not_found());
        assert_eq!(err.message, "Product not found: 42");
    }

    #[test]
    fn test_auth_errors() {
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.code, ErrorCode::AuthError);
        assert_eq!(err.message, "Invalid email or password");

        let err: ApiError = AuthError::SessionExpired.into();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_field_errors_become_validation_error() {
        let mut errors = FieldErrors::new();
        errors.push(ValidationError::negative("price", "Price must be positive"));
        errors.push(ValidationError::required("name", "Product name is required"));

        let err: ApiError = errors.into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field("price"), Some("Price must be positive"));
        assert_eq!(err.field("name"), Some("Product name is required"));
        assert_eq!(err.field("stock"), None);
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::not_found("Product", "7")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(json.get("fields").is_none());
    }
}
