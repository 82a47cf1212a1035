//! # Repository Module
//!
//! Table-level operations against the REST data store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Data-access layer                                                      │
//! │       │                                                                 │
//! │       │  store.products().list(&query)                                  │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── list(&self, query)        GET    /rest/v1/products?...             │
//! │  ├── get_by_id(&self, id)      GET    /rest/v1/products?id=eq.{id}      │
//! │  ├── create(&self, draft)      POST   /rest/v1/products                 │
//! │  ├── update(&self, id, draft)  PATCH  /rest/v1/products?id=eq.{id}      │
//! │  └── delete(&self, id)         DELETE /rest/v1/products?id=eq.{id}      │
//! │                                                                         │
//! │  CategoryRepository                                                     │
//! │  ├── list(&self)               GET    /rest/v1/categories?select=*      │
//! │  └── create(&self, draft)      POST   /rest/v1/categories               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every decoded row is checked against the same invariants the forms
//! enforce; a row that breaks them is a decode error, never a silent value.

pub mod category;
pub mod product;

/// `eq.{id}` filter value for a primary key.
pub(crate) fn eq(id: i64) -> String {
    format!("eq.{}", id)
}
