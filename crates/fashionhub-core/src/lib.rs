//! # fashionhub-core: Pure Domain Logic for FashionHub
//!
//! This crate holds the data model and every rule that can be checked
//! without talking to the remote data store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FashionHub Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Views (fashionhub CLI)                       │   │
//! │  │   Product list ──► Product form ──► Delete dialog ──► Sign-in   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             Data access (query cache + mutations)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ fashionhub-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   query   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ ProductQ. │  │  schemas  │  │   │
//! │  │   │  Category │  │           │  │ ProductPg │  │  slugify  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                fashionhub-store (REST client)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, drafts, forms)
//! - [`money`] - Money type held as integer cents
//! - [`query`] - Product list parameters and paginated results
//! - [`error`] - Domain error types
//! - [`validation`] - Form validation schemas and slug rules
//!
//! ## Example Usage
//!
//! ```rust
//! use fashionhub_core::validation::{is_valid_slug, slugify};
//!
//! assert_eq!(slugify("Men's Wear"), "men-s-wear");
//! assert!(is_valid_slug("mens-wear"));
//! assert!(!is_valid_slug("Mens Wear"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, FieldErrors, ValidationError};
pub use money::Money;
pub use query::{ProductPage, ProductQuery};
pub use types::*;
pub use validation::{CategoryForm, ProductForm};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Status assigned to categories created from the dashboard.
pub const DEFAULT_STATUS: &str = "active";

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 100;

/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Default number of products per page in list views.
pub const DEFAULT_PAGE_SIZE: u32 = 12;
