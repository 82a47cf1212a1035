//! # Store Error Types
//!
//! Error types for calls to the remote data store and the auth provider.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest / serde_json / toml errors                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError / AuthError (this module) ← Adds the failed operation       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in dashboard) ← Serialized for views                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  View shows "Failed to fetch products" / "Invalid email or password"    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Store Error
// =============================================================================

/// Errors from the REST data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status.
    ///
    /// Displays only the operation name (e.g. `Failed to fetch products`);
    /// the status is kept for logging and for callers that branch on it.
    #[error("{operation}")]
    Http { operation: String, status: u16 },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("{operation}: {reason}")]
    Network { operation: String, reason: String },

    /// The requested record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The response did not match the expected shape or contract.
    ///
    /// ## When This Occurs
    /// - Body is not JSON or rows are missing required fields
    /// - A product with negative price or stock
    /// - A category whose slug is not lowercase-hyphenated
    /// - A paginated list without a total count
    #[error("{operation}: invalid response ({reason})")]
    Decode { operation: String, reason: String },

    /// Configuration is unusable (bad URL, missing API key, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn decode(operation: &str, reason: impl Into<String>) -> Self {
        StoreError::Decode {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        StoreError::InvalidConfig(format!("invalid store URL: {}", err))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Auth Error
// =============================================================================

/// Errors from the auth provider and the local session file.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email/password, or the provider rejected the sign-in.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The stored session could not be refreshed.
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// The auth endpoint failed for a reason other than bad credentials.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reading or writing the session file failed.
    #[error("Session file error: {0}")]
    SessionFile(String),
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::SessionFile(err.to_string())
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_displays_operation() {
        let err = StoreError::Http {
            operation: "Failed to fetch products".to_string(),
            status: 500,
        };
        assert_eq!(err.to_string(), "Failed to fetch products");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found("Product", 42);
        assert_eq!(err.to_string(), "Product not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        let wrapped: AuthError = StoreError::InvalidConfig("no url".into()).into();
        assert_eq!(wrapped.to_string(), "Invalid configuration: no url");
    }
}
