//! # fashionhub-store: Remote Data Store Client for FashionHub
//!
//! This crate talks to the hosted backend: a table-over-HTTP REST API for
//! products and categories, and an auth API for email/password sessions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FashionHub Data Flow                               │
//! │                                                                         │
//! │  Dashboard query / mutation                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                 fashionhub-store (THIS CRATE)                   │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │    Store      │    │  Repositories │    │  AuthClient  │    │    │
//! │  │   │  (client.rs)  │    │ (product.rs)  │    │  (auth.rs)   │    │    │
//! │  │   │               │    │               │    │              │    │    │
//! │  │   │ RestClient    │◄───│ ProductRepo   │    │ GoTrueAuth   │    │    │
//! │  │   │ Credentials   │    │ CategoryRepo  │    │ SessionFile  │    │    │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘    │    │
//! │  │           │  dyn Transport                                      │    │
//! │  └───────────┼─────────────────────────────────────────────────────┘    │
//! │              ▼                                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │   https://<project>/rest/v1/...   https://<project>/auth/v1/... │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Layered configuration and credential sources
//! - [`transport`] - Request/response types and the HTTP seam
//! - [`client`] - `Store` handle and shared request plumbing
//! - [`repository`] - Product and category operations
//! - [`auth`] - Auth provider, session file, token refresh
//! - [`error`] - Store and auth error types
//! - `testing` - Recording transport for tests (`testing` feature)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fashionhub_store::{DashboardConfig, SharedConfig, Store};
//! use fashionhub_core::ProductQuery;
//!
//! let config = SharedConfig::new(DashboardConfig::load(None)?);
//! let store = Store::new(config)?;
//!
//! let page = store.products().list(&ProductQuery::new().search("shirt")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod repository;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::{AuthClient, AuthProvider, GoTrueAuth, SessionFile, TokenInfo};
pub use client::{RestClient, Store};
pub use config::{CredentialSource, DashboardConfig, SharedConfig, StoreCredentials};
pub use error::{AuthError, AuthResult, StoreError, StoreResult};
pub use transport::{HttpTransport, Transport};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
