//! # Category Repository
//!
//! REST operations for the `categories` table. Categories are labels: a
//! product refers to one by name or slug, not by foreign key.

use serde_json::json;
use tracing::{debug, info};

use crate::client::{decode_first, decode_rows, RestClient};
use crate::error::{StoreError, StoreResult};
use crate::transport::Method;
use fashionhub_core::validation::is_valid_slug;
use fashionhub_core::{Category, CategoryDraft};

const TABLE: &str = "categories";

pub const FETCH_CATEGORIES: &str = "Failed to fetch categories";
pub const CREATE_CATEGORY: &str = "Failed to create category";

/// Repository for category REST operations.
#[derive(Clone)]
pub struct CategoryRepository {
    rest: RestClient,
}

impl CategoryRepository {
    pub fn new(rest: RestClient) -> Self {
        CategoryRepository { rest }
    }

    /// Lists every category in store order.
    pub async fn list(&self) -> StoreResult<Vec<Category>> {
        let request = self.rest.request(Method::Get, TABLE)?.query("select", "*");

        let response = self.rest.execute(request, FETCH_CATEGORIES).await?;
        let rows: Vec<Category> = decode_rows(FETCH_CATEGORIES, &response.body)?;
        let rows = rows
            .into_iter()
            .map(|row| check_category(FETCH_CATEGORIES, row))
            .collect::<StoreResult<Vec<_>>>()?;

        debug!(count = rows.len(), "Listed categories");
        Ok(rows)
    }

    /// Inserts a category and returns the stored row.
    pub async fn create(&self, draft: &CategoryDraft) -> StoreResult<Category> {
        let body = json!({
            "name": draft.name,
            "slug": draft.slug,
            "status": draft.status,
        });
        let request = self.rest.request(Method::Post, TABLE)?.json(body);

        let response = self.rest.execute(request, CREATE_CATEGORY).await?;
        let category = decode_first::<Category>(CREATE_CATEGORY, &response.body)?
            .ok_or_else(|| StoreError::decode(CREATE_CATEGORY, "empty representation"))?;
        let category = check_category(CREATE_CATEGORY, category)?;

        info!(id = category.id, slug = ?category.slug, "Category created");
        Ok(category)
    }
}

/// Blank slugs read as absent; a present slug must be lowercase-hyphenated.
fn check_category(operation: &str, mut category: Category) -> StoreResult<Category> {
    if category.slug.as_deref().is_some_and(|s| s.trim().is_empty()) {
        category.slug = None;
    }

    match category.slug.as_deref() {
        Some(slug) if !is_valid_slug(slug) => Err(StoreError::decode(
            operation,
            format!("category {} has invalid slug '{}'", category.id, slug),
        )),
        _ => Ok(category),
    }
}
