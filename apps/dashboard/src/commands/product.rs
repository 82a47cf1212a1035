//! # Product Commands
//!
//! Product list (grid or list layout), detail, add/edit forms and the
//! delete confirmation.
//!
//! ## List Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product List Flow                                    │
//! │                                                                         │
//! │  products list --search shirt --category "Men's Wear" --page 2          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  gate: signed in? ──── no ──► Unauthenticated (sign-in hint)            │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  "Men's Wear" ──► cached categories ──► filter value "men-s-wear"       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductQuery { search, category, page, limit = catalog.page_size }     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  product_list.observe(key, catalog.products(&query))                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  grid of cards │ table rows, then "Page 2 of 3 · 30 products"           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::ValueEnum;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::commands::{fit, table};
use crate::error::ApiError;
use crate::queries::{products_key, Observed, ProductUpdate};
use crate::state::QueryState;
use crate::App;
use fashionhub_core::{Product, ProductForm, ProductPage, ProductQuery};

// =============================================================================
// Options
// =============================================================================

/// How the product list is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Cards, several per row.
    #[default]
    Grid,
    /// One table row per product.
    List,
}

/// Filters and paging of the product list view.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    /// Category name or slug.
    pub category: Option<String>,
    /// 1-based; 0 reads as the first page.
    pub page: u32,
    /// Defaults to the configured page size.
    pub limit: Option<u32>,
    pub layout: Layout,
}

/// Field overrides for the edit form; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductEdits {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub stock: Option<String>,
    pub status: Option<String>,
    /// An empty string clears the image.
    pub image: Option<String>,
}

impl ProductEdits {
    pub fn apply(self, form: &mut ProductForm) {
        let fields = [
            (self.name, &mut form.name),
            (self.description, &mut form.description),
            (self.price, &mut form.price),
            (self.category, &mut form.category),
            (self.stock, &mut form.stock),
            (self.status, &mut form.status),
            (self.image, &mut form.image),
        ];
        for (edit, field) in fields {
            if let Some(value) = edit {
                *field = value;
            }
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// Renders one page of products.
///
/// When a newer list read started meanwhile this one renders nothing.
pub async fn list_products(app: &App, options: ListOptions) -> Result<String, ApiError> {
    app.session.require_user()?;
    let start = Instant::now();

    let category = match options.category.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Some(resolve_category(app, text).await),
        _ => None,
    };
    let query = ProductQuery {
        search: options.search,
        category,
        page: Some(options.page),
        limit: Some(options.limit.unwrap_or(app.page_size)),
    }
    .normalized();

    debug!(?query, "list_products command");

    let state = match app
        .product_list
        .observe(products_key(&query), app.catalog.products(&query))
        .await
    {
        Observed::Current(state) => state,
        Observed::Superseded => return Ok(String::new()),
    };
    let page = loaded(state)?;

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = page.data.len(),
        total = page.total,
        "list_products complete"
    );

    Ok(render_page(&page, options.layout))
}

/// Renders the detail view of one product.
pub async fn show_product(app: &App, id: i64) -> Result<String, ApiError> {
    app.session.require_user()?;
    debug!(id, "show_product command");
    let product = load_product(app, id).await?;
    Ok(render_detail(&product))
}

/// Submits the "Add product" form.
pub async fn add_product(app: &App, form: ProductForm) -> Result<String, ApiError> {
    app.session.require_user()?;
    debug!(name = %form.name, "add_product command");
    let product = app.catalog.create_product().mutate_async(form).await?;
    Ok(format!("Created product #{} {}", product.id, product.name))
}

/// Submits the "Edit product" form, pre-filled from the stored record.
pub async fn edit_product(app: &App, id: i64, edits: ProductEdits) -> Result<String, ApiError> {
    app.session.require_user()?;
    debug!(id, "edit_product command");

    let current = load_product(app, id).await?;
    let mut form = ProductForm::from_product(&current);
    edits.apply(&mut form);

    let product = app
        .catalog
        .update_product()
        .mutate_async(ProductUpdate { id, form })
        .await?;
    Ok(format!("Updated product #{} {}", product.id, product.name))
}

/// Deletes a product once confirmed; otherwise shows the confirmation.
pub async fn delete_product(app: &App, id: i64, confirmed: bool) -> Result<String, ApiError> {
    app.session.require_user()?;
    debug!(id, confirmed, "delete_product command");

    let product = load_product(app, id).await?;
    if !confirmed {
        return Ok(format!(
            "This permanently deletes \"{}\" (#{}). Re-run with --yes to confirm.",
            product.name, product.id
        ));
    }

    app.catalog.delete_product().mutate_async(id).await?;
    Ok(format!("Deleted product #{} {}", product.id, product.name))
}

// =============================================================================
// Helpers
// =============================================================================

/// Matches `text` against category names and slugs; unknown text is used
/// as typed.
async fn resolve_category(app: &App, text: &str) -> String {
    let categories = app.catalog.categories().await;
    categories
        .data
        .as_ref()
        .and_then(|all| {
            all.iter().find(|c| {
                c.name.eq_ignore_ascii_case(text) || c.slug.as_deref() == Some(text)
            })
        })
        .map(|c| c.filter_value().to_string())
        .unwrap_or_else(|| text.to_string())
}

async fn load_product(app: &App, id: i64) -> Result<Arc<Product>, ApiError> {
    loaded(app.catalog.product(Some(id)).await)
}

fn loaded<T>(state: QueryState<T>) -> Result<Arc<T>, ApiError> {
    state
        .into_result()?
        .ok_or_else(|| ApiError::internal("Read finished without data"))
}

// =============================================================================
// Rendering
// =============================================================================

const CARD_WIDTH: usize = 24;
const CARDS_PER_ROW: usize = 3;

fn stock_label(product: &Product) -> String {
    if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "Out of stock".to_string()
    }
}

fn card(product: &Product) -> Vec<String> {
    let border = "─".repeat(CARD_WIDTH + 2);
    let body = [
        format!("#{} {}", product.id, product.name),
        product.price.to_string(),
        stock_label(product),
        format!("{} · {}", product.category, product.status),
    ];

    let mut lines = vec![format!("┌{}┐", border)];
    lines.extend(body.iter().map(|line| format!("│ {} │", fit(line, CARD_WIDTH))));
    lines.push(format!("└{}┘", border));
    lines
}

fn render_grid(products: &[Product]) -> String {
    products
        .chunks(CARDS_PER_ROW)
        .map(|row| {
            let cards: Vec<Vec<String>> = row.iter().map(card).collect();
            let height = cards.first().map_or(0, Vec::len);
            (0..height)
                .map(|i| {
                    cards
                        .iter()
                        .map(|card| card[i].as_str())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_list(products: &[Product]) -> String {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                fit(&p.name, 32).trim_end().to_string(),
                p.category.clone(),
                p.price.to_string(),
                p.stock.to_string(),
                p.status.clone(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "CATEGORY", "PRICE", "STOCK", "STATUS"], &rows)
}

pub(crate) fn render_page(page: &ProductPage, layout: Layout) -> String {
    if page.is_empty() {
        return "No products found".to_string();
    }

    let body = match layout {
        Layout::Grid => render_grid(&page.data),
        Layout::List => render_list(&page.data),
    };

    let noun = if page.total == 1 { "product" } else { "products" };
    let mut footer = format!(
        "Page {} of {} · {} {}",
        page.page, page.total_pages, page.total, noun
    );
    if page.has_previous() {
        footer.push_str(&format!(" · previous: --page {}", page.page - 1));
    }
    if page.has_next() {
        footer.push_str(&format!(" · next: --page {}", page.page + 1));
    }

    format!("{}\n\n{}", body, footer)
}

fn render_detail(product: &Product) -> String {
    let stock_value = product
        .stock_value()
        .map_or_else(|| "n/a".to_string(), |value| value.to_string());
    let mut lines = vec![
        format!("#{} {}", product.id, product.name),
        String::new(),
        format!("Price:       {}", product.price),
        format!("Category:    {}", product.category),
        format!("Stock:       {}", stock_label(product)),
        format!("Stock value: {}", stock_value),
        format!("Status:      {}", product.status),
    ];
    if let Some(image) = &product.image {
        lines.push(format!("Image:       {}", image));
    }
    if let Some(created_at) = product.created_at {
        lines.push(format!("Created:     {}", created_at.format("%Y-%m-%d %H:%M")));
    }
    if !product.description.is_empty() {
        lines.push(String::new());
        lines.push(product.description.clone());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fashionhub_core::Money;

    fn product(id: i64, name: &str, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price: Money::from_cents(4999),
            category: "men-s-wear".to_string(),
            stock,
            status: "active".to_string(),
            image: None,
            created_at: None,
        }
    }

    fn page(products: Vec<Product>, total: u64, query: ProductQuery) -> ProductPage {
        ProductPage::new(products, total, &query)
    }

    #[test]
    fn test_grid_puts_three_cards_per_row() {
        let products: Vec<Product> = (1..=4).map(|i| product(i, "Shirt", 1)).collect();
        let rendered = render_grid(&products);
        let first_line = rendered.lines().next().unwrap();
        assert_eq!(first_line.matches('┌').count(), 3);
        // two rows of six lines each
        assert_eq!(rendered.lines().count(), 12);
    }

    #[test]
    fn test_list_layout_has_header_and_rows() {
        let rendered = render_page(
            &page(vec![product(7, "Linen Shirt", 0)], 1, ProductQuery::new()),
            Layout::List,
        );
        assert!(rendered.starts_with("ID"));
        assert!(rendered.contains("Linen Shirt"));
        assert!(rendered.contains("$49.99"));
        assert!(rendered.ends_with("Page 1 of 1 · 1 product"));
    }

    #[test]
    fn test_footer_offers_navigation() {
        let rendered = render_page(
            &page(
                vec![product(1, "Scarf", 2)],
                30,
                ProductQuery::new().page(2, 12),
            ),
            Layout::Grid,
        );
        assert!(rendered.contains("Page 2 of 3 · 30 products"));
        assert!(rendered.contains("previous: --page 1"));
        assert!(rendered.contains("next: --page 3"));
    }

    #[test]
    fn test_empty_page() {
        let rendered = render_page(&page(Vec::new(), 0, ProductQuery::new()), Layout::Grid);
        assert_eq!(rendered, "No products found");
    }

    #[test]
    fn test_detail_shows_out_of_stock() {
        let rendered = render_detail(&product(3, "Wool Scarf", 0));
        assert!(rendered.contains("Out of stock"));
        assert!(rendered.contains("Stock value: $0.00"));
    }

    #[test]
    fn test_detail_stock_value_out_of_range() {
        let mut item = product(7, "Gold Coat", 100_000);
        item.price = Money::from_cents(100_000_000_000_000_000);
        let rendered = render_detail(&item);
        assert!(rendered.contains("Stock value: n/a"));
        assert!(rendered.contains("Price:       $1000000000000000.00"));
    }

    #[test]
    fn test_edits_keep_unset_fields() {
        let mut form = ProductForm::from_product(&product(3, "Wool Scarf", 4));
        ProductEdits {
            price: Some("19.50".to_string()),
            image: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut form);

        assert_eq!(form.name, "Wool Scarf");
        assert_eq!(form.price, "19.50");
        assert_eq!(form.stock, "4");
        assert_eq!(form.image, "");
    }
}
