//! # Domain Types
//!
//! Core domain types used throughout the FashionHub dashboard.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │    AuthUser     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (store)     │   │  id (store)     │   │  id (UUID)      │       │
//! │  │  name           │   │  name           │   │  email          │       │
//! │  │  price (Money)  │   │  slug?          │   └─────────────────┘       │
//! │  │  category label │   │  status?        │                              │
//! │  │  stock, status  │   └─────────────────┘                              │
//! │  └────────▲────────┘            ▲                                       │
//! │           │ written as          │ written as                            │
//! │  ┌────────┴────────┐   ┌────────┴────────┐                              │
//! │  │  ProductDraft   │   │  CategoryDraft  │  ◄── only produced by        │
//! │  └─────────────────┘   └─────────────────┘      validation.rs           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Ids are assigned by the data store. The client never invents one; it
//! only echoes ids it has read back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::{self, Money};

// =============================================================================
// Product
// =============================================================================

/// A product record as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: i64,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Unit price. Decimal on the wire, cents in memory.
    #[serde(with = "money::decimal")]
    #[ts(type = "number")]
    pub price: Money,

    /// Free-text category label (matched against category names/slugs).
    pub category: String,

    /// Units on hand.
    pub stock: i64,

    /// Lifecycle status, conventionally `"active"`.
    pub status: String,

    /// Product image URL.
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether any units are on hand.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Value of the stock on hand at the current price, `None` when it
    /// does not fit in the cent range.
    #[inline]
    pub fn stock_value(&self) -> Option<Money> {
        self.price.multiply_quantity(self.stock)
    }
}

// =============================================================================
// Category
// =============================================================================

/// A category record as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Value used when filtering products by this category: the slug when
    /// present, otherwise the name.
    pub fn filter_value(&self) -> &str {
        match self.slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug,
            _ => &self.name,
        }
    }
}

// =============================================================================
// Write Payloads
// =============================================================================

/// Validated product payload for create and update.
///
/// Produced only by [`crate::validation::validate_product`]; every field is
/// sent on update, so the store copy becomes exactly this draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    #[serde(with = "money::decimal")]
    #[ts(type = "number")]
    pub price: Money,
    pub category: String,
    pub stock: i64,
    pub status: String,
    /// `None` clears the image on update.
    pub image: Option<String>,
}

/// Validated category payload for create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    /// Always [`crate::DEFAULT_STATUS`] for categories created here.
    pub status: String,
}

// =============================================================================
// Auth
// =============================================================================

/// The signed-in user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthUser {
    #[ts(as = "String")]
    pub id: Uuid,
    pub email: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
