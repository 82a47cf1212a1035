//! # Data-Access Layer
//!
//! Cached reads and cache-invalidating writes over the store.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Reads (QueryState<T>)                 Key                              │
//! │  ─────────────────────                 ───                              │
//! │  catalog.categories()                  categories / list                │
//! │  catalog.products(&query)              products   / list:{query json}   │
//! │  catalog.product(Some(id))             products   / detail:{id}         │
//! │  catalog.product(None | Some(0))       (idle, nothing requested)        │
//! │                                                                         │
//! │  Writes (Mutation<I, O>)               Invalidates                      │
//! │  ───────────────────────               ───────────                      │
//! │  create_category   CategoryForm        categories                       │
//! │  create_product    ProductForm         products                         │
//! │  update_product    ProductUpdate       products                         │
//! │  delete_product    id                  products                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes validate their form first; an invalid form fails with a
//! `VALIDATION_ERROR` and nothing is sent.

pub mod mutation;
pub mod observer;

pub use mutation::Mutation;
pub use observer::{Observed, QueryObserver, Ticket};

use tracing::info;

use crate::error::ApiError;
use crate::state::{QueryCache, QueryKey, QueryState};
use fashionhub_core::validation::{validate_category, validate_product};
use fashionhub_core::{Category, CategoryForm, Product, ProductForm, ProductPage, ProductQuery};
use fashionhub_store::Store;

/// Key scope of product reads.
pub const PRODUCTS: &str = "products";

/// Key scope of category reads.
pub const CATEGORIES: &str = "categories";

pub fn categories_key() -> QueryKey {
    QueryKey::new(CATEGORIES, "list")
}

/// Equivalent queries (after trimming) share a key.
pub fn products_key(query: &ProductQuery) -> QueryKey {
    let params = serde_json::to_string(&query.normalized()).unwrap_or_default();
    QueryKey::new(PRODUCTS, format!("list:{}", params))
}

pub fn product_key(id: i64) -> QueryKey {
    QueryKey::new(PRODUCTS, format!("detail:{}", id))
}

/// Input of the edit-product write.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub id: i64,
    pub form: ProductForm,
}

/// Reads and writes for the product catalog.
#[derive(Clone)]
pub struct Catalog {
    store: Store,
    cache: QueryCache,
    create_category: Mutation<CategoryForm, Category>,
    create_product: Mutation<ProductForm, Product>,
    update_product: Mutation<ProductUpdate, Product>,
    delete_product: Mutation<i64, ()>,
}

impl Catalog {
    pub fn new(store: Store, cache: QueryCache) -> Self {
        let create_category = {
            let (store, cache) = (store.clone(), cache.clone());
            Mutation::new("create_category", move |form: CategoryForm| {
                let (store, cache) = (store.clone(), cache.clone());
                async move {
                    let draft = validate_category(&form)?;
                    let category = store.categories().create(&draft).await?;
                    cache.invalidate(CATEGORIES);
                    Ok(category)
                }
            })
        };

        let create_product = {
            let (store, cache) = (store.clone(), cache.clone());
            Mutation::new("create_product", move |form: ProductForm| {
                let (store, cache) = (store.clone(), cache.clone());
                async move {
                    let draft = validate_product(&form)?;
                    let product = store.products().create(&draft).await?;
                    cache.invalidate(PRODUCTS);
                    Ok(product)
                }
            })
        };

        let update_product = {
            let (store, cache) = (store.clone(), cache.clone());
            Mutation::new("update_product", move |update: ProductUpdate| {
                let (store, cache) = (store.clone(), cache.clone());
                async move {
                    let draft = validate_product(&update.form)?;
                    let product = store.products().update(update.id, &draft).await?;
                    cache.invalidate(PRODUCTS);
                    Ok(product)
                }
            })
        };

        let delete_product = {
            let (store, cache) = (store.clone(), cache.clone());
            Mutation::new("delete_product", move |id: i64| {
                let (store, cache) = (store.clone(), cache.clone());
                async move {
                    store.products().delete(id).await?;
                    cache.invalidate(PRODUCTS);
                    info!(id, "Product removed from catalog");
                    Ok(())
                }
            })
        };

        Catalog {
            store,
            cache,
            create_category,
            create_product,
            update_product,
            delete_product,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn categories(&self) -> QueryState<Vec<Category>> {
        let store = self.store.clone();
        let result = self
            .cache
            .fetch(categories_key(), move || async move {
                store.categories().list().await.map_err(ApiError::from)
            })
            .await;
        QueryState::from_result(result)
    }

    pub async fn products(&self, query: &ProductQuery) -> QueryState<ProductPage> {
        let store = self.store.clone();
        let query = query.normalized();
        let result = self
            .cache
            .fetch(products_key(&query), move || async move {
                store.products().list(&query).await.map_err(ApiError::from)
            })
            .await;
        QueryState::from_result(result)
    }

    /// Detail read; idle without an id (or with id 0).
    pub async fn product(&self, id: Option<i64>) -> QueryState<Product> {
        let Some(id) = id.filter(|id| *id != 0) else {
            return QueryState::idle();
        };
        let store = self.store.clone();
        let result = self
            .cache
            .fetch(product_key(id), move || async move {
                store.products().get_by_id(id).await.map_err(ApiError::from)
            })
            .await;
        QueryState::from_result(result)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub fn create_category(&self) -> Mutation<CategoryForm, Category> {
        self.create_category.clone()
    }

    pub fn create_product(&self) -> Mutation<ProductForm, Product> {
        self.create_product.clone()
    }

    pub fn update_product(&self) -> Mutation<ProductUpdate, Product> {
        self.update_product.clone()
    }

    pub fn delete_product(&self) -> Mutation<i64, ()> {
        self.delete_product.clone()
    }
}
