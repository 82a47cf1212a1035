//! # Product Repository
//!
//! REST operations for the `products` table.
//!
//! ## List Request Shape
//! ```text
//! ProductQuery { search: "shirt", category: "mens", page: 2, limit: 12 }
//!      │
//!      ▼
//! GET /rest/v1/products
//!     ?select=*
//!     &name=ilike.*shirt*          ← case-insensitive substring
//!     &category=ilike.*mens*
//!     &order=created_at.desc       ← always newest first
//!     &limit=12&offset=12          ← only with page AND limit
//! Prefer: count=exact              ← total arrives in Content-Range: 12-23/30
//! ```

use tracing::{debug, info};

use crate::client::{decode_first, decode_rows, RestClient};
use crate::error::{StoreError, StoreResult};
use crate::repository::eq;
use crate::transport::{Method, StoreResponse};
use fashionhub_core::{Product, ProductDraft, ProductPage, ProductQuery};

const TABLE: &str = "products";

pub const FETCH_PRODUCTS: &str = "Failed to fetch products";
pub const FETCH_PRODUCT: &str = "Failed to fetch product";
pub const CREATE_PRODUCT: &str = "Failed to create product";
pub const UPDATE_PRODUCT: &str = "Failed to update product";
pub const DELETE_PRODUCT: &str = "Failed to delete product";

/// Repository for product REST operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// let page = repo.list(&ProductQuery::new().page(1, 12)).await?;
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Clone)]
pub struct ProductRepository {
    rest: RestClient,
}

impl ProductRepository {
    pub fn new(rest: RestClient) -> Self {
        ProductRepository { rest }
    }

    /// Lists products matching `query`, newest first.
    ///
    /// ## Filters
    /// - `search` matches the name, case-insensitive substring
    /// - `category` matches the category label, case-insensitive substring
    /// - `page` + `limit` select one page and request an exact total
    ///
    /// Blank filters are ignored.
    pub async fn list(&self, query: &ProductQuery) -> StoreResult<ProductPage> {
        let query = query.normalized();
        debug!(?query, "Listing products");

        let mut request = self.rest.request(Method::Get, TABLE)?.query("select", "*");

        if let Some(search) = &query.search {
            request = request.query("name", &format!("ilike.*{}*", search));
        }
        if let Some(category) = &query.category {
            request = request.query("category", &format!("ilike.*{}*", category));
        }

        request = request.query("order", "created_at.desc");

        if let (Some((_, limit)), Some(offset)) = (query.pagination(), query.offset()) {
            request = request
                .query("limit", &limit.to_string())
                .query("offset", &offset.to_string())
                .header("Prefer", "count=exact");
        }

        let response = self.rest.execute(request, FETCH_PRODUCTS).await?;
        let rows: Vec<Product> = decode_rows(FETCH_PRODUCTS, &response.body)?;
        let rows = check_products(FETCH_PRODUCTS, rows)?;

        let total = match query.pagination() {
            Some(_) => content_range_total(&response)
                .ok_or_else(|| StoreError::decode(FETCH_PRODUCTS, "missing total count"))?,
            None => rows.len() as u64,
        };

        debug!(count = rows.len(), total, "Listed products");
        Ok(ProductPage::new(rows, total, &query))
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Product found
    /// * `Err(StoreError::NotFound)` - No row with this id
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Product> {
        debug!(id, "Fetching product");

        let request = self
            .rest
            .request(Method::Get, TABLE)?
            .query("id", &eq(id))
            .query("select", "*");

        let response = self.rest.execute(request, FETCH_PRODUCT).await?;
        let row = decode_first::<Product>(FETCH_PRODUCT, &response.body)?
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        check_product(FETCH_PRODUCT, row)
    }

    /// Inserts a product and returns the stored row.
    pub async fn create(&self, draft: &ProductDraft) -> StoreResult<Product> {
        let body = to_json(CREATE_PRODUCT, draft)?;
        let request = self.rest.request(Method::Post, TABLE)?.json(body);

        let response = self.rest.execute(request, CREATE_PRODUCT).await?;
        let product = decode_first::<Product>(CREATE_PRODUCT, &response.body)?
            .ok_or_else(|| StoreError::decode(CREATE_PRODUCT, "empty representation"))?;
        let product = check_product(CREATE_PRODUCT, product)?;

        info!(id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Replaces every editable field of product `id` with `draft`.
    pub async fn update(&self, id: i64, draft: &ProductDraft) -> StoreResult<Product> {
        let body = to_json(UPDATE_PRODUCT, draft)?;
        let request = self
            .rest
            .request(Method::Patch, TABLE)?
            .query("id", &eq(id))
            .json(body);

        let response = self.rest.execute(request, UPDATE_PRODUCT).await?;
        let product = decode_first::<Product>(UPDATE_PRODUCT, &response.body)?
            .ok_or_else(|| StoreError::not_found("Product", id))?;
        let product = check_product(UPDATE_PRODUCT, product)?;

        info!(id, "Product updated");
        Ok(product)
    }

    /// Deletes product `id`.
    ///
    /// An explicit empty representation (`[]`) means no row matched; a
    /// bodiless `204` is taken as success.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let request = self.rest.request(Method::Delete, TABLE)?.query("id", &eq(id));

        let response = self.rest.execute(request, DELETE_PRODUCT).await?;
        if !response.body.trim().is_empty() {
            let rows: Vec<serde_json::Value> = decode_rows(DELETE_PRODUCT, &response.body)?;
            if rows.is_empty() {
                return Err(StoreError::not_found("Product", id));
            }
        }

        info!(id, "Product deleted");
        Ok(())
    }

    /// Number of products. Reads a single row and takes the exact total
    /// from `Content-Range`.
    pub async fn count(&self) -> StoreResult<u64> {
        Ok(self.list(&ProductQuery::new().page(1, 1)).await?.total)
    }
}

// =============================================================================
// Decode Contracts
// =============================================================================

fn check_product(operation: &str, product: Product) -> StoreResult<Product> {
    if product.price.is_negative() {
        return Err(StoreError::decode(
            operation,
            format!("product {} has negative price", product.id),
        ));
    }
    if product.stock < 0 {
        return Err(StoreError::decode(
            operation,
            format!("product {} has negative stock", product.id),
        ));
    }
    Ok(product)
}

fn check_products(operation: &str, rows: Vec<Product>) -> StoreResult<Vec<Product>> {
    rows.into_iter()
        .map(|row| check_product(operation, row))
        .collect()
}

fn to_json(operation: &str, draft: &ProductDraft) -> StoreResult<serde_json::Value> {
    serde_json::to_value(draft).map_err(|e| StoreError::decode(operation, e.to_string()))
}

/// Total from `Content-Range: <range>/<total>` (`*/0` for an empty result).
pub fn content_range_total(response: &StoreResponse) -> Option<u64> {
    response
        .header("content-range")?
        .rsplit('/')
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreCredentials;
    use crate::testing::RecordingTransport;
    use crate::Store;
    use fashionhub_core::Money;
    use std::sync::Arc;

    const SHIRT: &str = r#"{"id":7,"name":"Linen Shirt","description":"Summer","price":49.99,
        "category":"mens-wear","stock":3,"status":"active","image":null,
        "created_at":"2024-03-01T10:00:00+00:00"}"#;

    fn store(transport: &Arc<RecordingTransport>) -> Store {
        let creds = StoreCredentials::new("https://xyz.supabase.co", "anon", None).unwrap();
        Store::with_transport(transport.clone(), Arc::new(creds))
    }

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Linen Shirt".to_string(),
            description: "Summer".to_string(),
            price: Money::from_cents(4999),
            category: "mens-wear".to_string(),
            stock: 3,
            status: "active".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_search_builds_ilike_filter() {
        let transport = Arc::new(RecordingTransport::new());
        let store = store(&transport);

        store
            .products()
            .list(&ProductQuery::new().search("shirt"))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_value("name").as_deref(), Some("ilike.*shirt*"));
        assert_eq!(request.query_value("order").as_deref(), Some("created_at.desc"));
        assert_eq!(request.query_value("select").as_deref(), Some("*"));
        assert_eq!(request.query_value("limit"), None);
    }

    #[tokio::test]
    async fn test_pagination_uses_offset_and_total() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(
            StoreResponse::new(206, format!("[{}]", SHIRT)).with_header("Content-Range", "12-12/30"),
        );
        let store = store(&transport);

        let page = store
            .products()
            .list(&ProductQuery::new().page(2, 12))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_value("limit").as_deref(), Some("12"));
        assert_eq!(request.query_value("offset").as_deref(), Some("12"));
        assert_eq!(request.header_value("Prefer"), Some("count=exact"));

        assert_eq!(page.total, 30);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data[0].price.cents(), 4999);
    }

    #[tokio::test]
    async fn test_count_reads_one_row_and_exact_total() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(
            StoreResponse::new(206, format!("[{}]", SHIRT)).with_header("Content-Range", "0-0/41"),
        );
        let store = store(&transport);

        assert_eq!(store.products().count().await.unwrap(), 41);
        let request = transport.last_request().unwrap();
        assert_eq!(request.query_value("limit").as_deref(), Some("1"));
        assert_eq!(request.header_value("Prefer"), Some("count=exact"));
    }

    #[tokio::test]
    async fn test_paginated_list_without_total_is_decode_error() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(StoreResponse::new(200, "[]"));
        let store = store(&transport);

        let err = store
            .products()
            .list(&ProductQuery::new().page(1, 12))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_blank_filters_are_not_sent() {
        let transport = Arc::new(RecordingTransport::new());
        let store = store(&transport);

        store
            .products()
            .list(&ProductQuery::new().search("   ").category(""))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_value("name"), None);
        assert_eq!(request.query_value("category"), None);
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let transport = Arc::new(RecordingTransport::new());
        let store = store(&transport);

        let err = store.products().get_by_id(99).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Product not found: 99");

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_value("id").as_deref(), Some("eq.99"));
    }

    #[tokio::test]
    async fn test_negative_stock_row_is_rejected() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(StoreResponse::new(
            200,
            r#"[{"id":1,"name":"X","description":"","price":1,"category":"c","stock":-2,"status":"active"}]"#,
        ));
        let store = store(&transport);

        let err = store.products().list(&ProductQuery::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_create_sends_draft_and_returns_row() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(StoreResponse::new(201, format!("[{}]", SHIRT)));
        let store = store(&transport);

        let product = store.products().create(&draft()).await.unwrap();
        assert_eq!(product.id, 7);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.header_value("Prefer"), Some("return=representation"));
        let body = request.body.unwrap();
        assert_eq!(body["price"], serde_json::json!(49.99));
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let transport = Arc::new(RecordingTransport::new());
        let store = store(&transport);

        let err = store.products().update(5, &draft()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(transport.last_request().unwrap().method, Method::Patch);
    }

    #[tokio::test]
    async fn test_delete_outcomes() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(StoreResponse::new(200, format!("[{}]", SHIRT)));
        transport.respond(StoreResponse::new(204, ""));
        transport.respond(StoreResponse::new(200, "[]"));
        transport.respond(StoreResponse::new(500, "boom"));
        let store = store(&transport);
        let repo = store.products();

        assert!(repo.delete(7).await.is_ok());
        assert!(repo.delete(7).await.is_ok());
        assert!(repo.delete(7).await.unwrap_err().is_not_found());
        assert_eq!(
            repo.delete(7).await.unwrap_err().to_string(),
            "Failed to delete product"
        );
    }

    #[test]
    fn test_content_range_parsing() {
        let with = |v: &str| StoreResponse::new(200, "").with_header("Content-Range", v);
        assert_eq!(content_range_total(&with("0-11/30")), Some(30));
        assert_eq!(content_range_total(&with("*/0")), Some(0));
        assert_eq!(content_range_total(&with("0-11/*")), None);
        assert_eq!(content_range_total(&StoreResponse::new(200, "")), None);
    }
}
