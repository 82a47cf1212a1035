//! # Validation Module
//!
//! Form schemas for the product and category editors.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ProductForm (raw text input)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_product ← THIS MODULE                                         │
//! │       │                                                                 │
//! │       ├── any field invalid? → FieldErrors { field → message }          │
//! │       │                        (form stays open, NOTHING is sent)       │
//! │       │                                                                 │
//! │       └── OK → ProductDraft (trimmed, typed) → REST client              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every field is checked, so a form with several mistakes reports all of
//! them at once. Each field reports only the first rule it breaks.
//!
//! ## Usage
//! ```rust
//! use fashionhub_core::validation::{validate_category, CategoryForm};
//!
//! let draft = validate_category(&CategoryForm::from_name("Mens Wear")).unwrap();
//! assert_eq!(draft.slug, "mens-wear");
//!
//! let errors = validate_category(&CategoryForm::new("Kids", "Kids Wear")).unwrap_err();
//! assert_eq!(
//!     errors.get("slug"),
//!     Some("Slug must be lowercase with hyphens (e.g., mens-wear)")
//! );
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use url::Url;

use crate::error::{FieldErrors, ValidationError};
use crate::money::Money;
use crate::types::{CategoryDraft, Product, ProductDraft};
use crate::{DEFAULT_STATUS, MAX_DESCRIPTION_LEN, MAX_PRODUCT_NAME_LEN};

/// Result type for single-field checks.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Pattern every stored slug matches: lowercase words joined by single hyphens.
pub const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

// =============================================================================
// Forms
// =============================================================================

/// Raw product editor input.
///
/// Numbers are kept as the text the user typed so that "not a number" can be
/// reported like any other field error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    pub status: String,
    pub image: String,
}

impl Default for ProductForm {
    /// An empty "Add product" form.
    fn default() -> Self {
        ProductForm {
            name: String::new(),
            description: String::new(),
            price: "0".to_string(),
            category: String::new(),
            stock: "0".to_string(),
            status: DEFAULT_STATUS.to_string(),
            image: String::new(),
        }
    }
}

impl ProductForm {
    /// An "Edit product" form pre-filled from the stored record.
    pub fn from_product(product: &Product) -> Self {
        ProductForm {
            name: product.name.clone(),
            description: product.description.clone(),
            price: format!("{}.{:02}", product.price.dollars(), product.price.cents_part()),
            category: product.category.clone(),
            stock: product.stock.to_string(),
            status: product.status.clone(),
            image: product.image.clone().unwrap_or_default(),
        }
    }
}

/// Raw category editor input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryForm {
    pub name: String,
    pub slug: String,
}

impl CategoryForm {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        CategoryForm {
            name: name.into(),
            slug: slug.into(),
        }
    }

    /// A form whose slug is derived from the name; the user may still
    /// overwrite it.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        CategoryForm { name, slug }
    }
}

// =============================================================================
// Schemas
// =============================================================================

/// Validates the product editor and produces the write payload.
///
/// ## Rules
/// | Field       | Rule                              | Message                        |
/// |-------------|-----------------------------------|--------------------------------|
/// | name        | required, at most 100 characters  | `Product name is required` / `Name is too long` |
/// | description | required, at most 500 characters  | `Description is required` / `Description is too long` |
/// | price       | number, not negative              | `Price must be a number` / `Price must be positive` |
/// | category    | required                          | `Category is required`         |
/// | stock       | number, not negative, whole       | `Stock must be a number` / `Stock cannot be negative` / `Stock must be a whole number` |
/// | status      | required                          | `Status is required`           |
/// | image       | empty, or an absolute URL         | `Invalid URL`                  |
pub fn validate_product(form: &ProductForm) -> Result<ProductDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = errors.check(validate_product_name(&form.name));
    let description = errors.check(validate_description(&form.description));
    let price = errors.check(validate_price(&form.price));
    let category = errors.check(required(&form.category, "category", "Category is required"));
    let stock = errors.check(validate_stock(&form.stock));
    let status = errors.check(required(&form.status, "status", "Status is required"));
    let image = errors.check(validate_image(&form.image));

    match (name, description, price, category, stock, status, image) {
        (
            Some(name),
            Some(description),
            Some(price),
            Some(category),
            Some(stock),
            Some(status),
            Some(image),
        ) if errors.is_empty() => Ok(ProductDraft {
            name,
            description,
            price,
            category,
            stock,
            status,
            image,
        }),
        _ => Err(errors),
    }
}

/// Validates the category editor and produces the write payload.
pub fn validate_category(form: &CategoryForm) -> Result<CategoryDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = errors.check(required(&form.name, "name", "Category name is required"));
    let slug = errors.check(validate_slug(&form.slug));

    match (name, slug) {
        (Some(name), Some(slug)) if errors.is_empty() => Ok(CategoryDraft {
            name,
            slug,
            status: DEFAULT_STATUS.to_string(),
        }),
        _ => Err(errors),
    }
}

// =============================================================================
// Field Validators
// =============================================================================

fn required(value: &str, field: &str, message: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field, message));
    }
    Ok(value.to_string())
}

/// Validates a product name: required, at most 100 characters.
///
/// ```rust
/// use fashionhub_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Linen Shirt ").unwrap(), "Linen Shirt");
/// assert!(validate_product_name("").is_err());
/// assert!(validate_product_name(&"A".repeat(101)).is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = required(name, "name", "Product name is required")?;

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::too_long(
            "name",
            MAX_PRODUCT_NAME_LEN,
            "Name is too long",
        ));
    }

    Ok(name)
}

pub fn validate_description(description: &str) -> ValidationResult<String> {
    let description = required(description, "description", "Description is required")?;

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::too_long(
            "description",
            MAX_DESCRIPTION_LEN,
            "Description is too long",
        ));
    }

    Ok(description)
}

/// Parses a price typed as a decimal number. Zero is allowed.
///
/// ```rust
/// use fashionhub_core::validation::validate_price;
///
/// assert_eq!(validate_price("49.99").unwrap().cents(), 4999);
/// assert_eq!(validate_price("0").unwrap().cents(), 0);
/// assert!(validate_price("-1").is_err());
/// assert!(validate_price("abc").is_err());
/// ```
pub fn validate_price(price: &str) -> ValidationResult<Money> {
    let amount = parse_number(price, "price", "Price must be a number")?;

    if amount < 0.0 {
        return Err(ValidationError::negative("price", "Price must be positive"));
    }

    Money::from_decimal(amount)
        .map_err(|_| ValidationError::not_a_number("price", "Price must be a number"))
}

/// Parses a stock count: a non-negative whole number.
pub fn validate_stock(stock: &str) -> ValidationResult<i64> {
    let count = parse_number(stock, "stock", "Stock must be a number")?;

    if count < 0.0 {
        return Err(ValidationError::negative("stock", "Stock cannot be negative"));
    }

    if count.fract() != 0.0 || count > i64::MAX as f64 {
        return Err(ValidationError::invalid_format(
            "stock",
            "Stock must be a whole number",
        ));
    }

    Ok(count as i64)
}

/// Image URL: empty means "no image", anything else must be an absolute URL.
pub fn validate_image(image: &str) -> ValidationResult<Option<String>> {
    let image = image.trim();
    if image.is_empty() {
        return Ok(None);
    }

    match Url::parse(image) {
        Ok(url) if url.has_host() || url.scheme() == "data" => Ok(Some(image.to_string())),
        _ => Err(ValidationError::invalid_format("image", "Invalid URL")),
    }
}

/// Validates a category slug.
///
/// ```rust
/// use fashionhub_core::validation::validate_slug;
///
/// assert!(validate_slug("mens-wear").is_ok());
/// assert!(validate_slug("Mens Wear").is_err());
/// ```
pub fn validate_slug(slug: &str) -> ValidationResult<String> {
    let slug = required(slug, "slug", "Slug is required")?;

    if !is_valid_slug(&slug) {
        return Err(ValidationError::invalid_format(
            "slug",
            "Slug must be lowercase with hyphens (e.g., mens-wear)",
        ));
    }

    Ok(slug)
}

fn parse_number(value: &str, field: &str, message: &str) -> ValidationResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValidationError::not_a_number(field, message))
}

// =============================================================================
// Slugs
// =============================================================================

/// Whether `slug` matches [`SLUG_PATTERN`].
pub fn is_valid_slug(slug: &str) -> bool {
    static SLUG_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    match SLUG_REGEX.get_or_init(|| Regex::new(SLUG_PATTERN)) {
        Ok(regex) => regex.is_match(slug),
        Err(_) => false,
    }
}

/// Derives a slug from a display name.
///
/// Lowercases, turns every run of characters outside `a-z0-9` into a single
/// hyphen, and strips hyphens from both ends. The result is either empty or
/// a valid slug.
///
/// ```rust
/// use fashionhub_core::validation::slugify;
///
/// assert_eq!(slugify("Men's Wear"), "men-s-wear");
/// assert_eq!(slugify("  Shoes & Bags!! "), "shoes-bags");
/// assert_eq!(slugify("***"), "");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            name: "Linen Shirt".to_string(),
            description: "Breathable summer shirt".to_string(),
            price: "49.99".to_string(),
            category: "mens-wear".to_string(),
            stock: "12".to_string(),
            status: "active".to_string(),
            image: "https://cdn.example.com/shirt.png".to_string(),
        }
    }

    #[test]
    fn test_valid_product_form() {
        let draft = validate_product(&valid_form()).unwrap();
        assert_eq!(draft.name, "Linen Shirt");
        assert_eq!(draft.price.cents(), 4999);
        assert_eq!(draft.stock, 12);
        assert_eq!(
            draft.image.as_deref(),
            Some("https://cdn.example.com/shirt.png")
        );
    }

    #[test]
    fn test_product_fields_are_trimmed() {
        let mut form = valid_form();
        form.name = "  Linen Shirt  ".to_string();
        form.image = "   ".to_string();

        let draft = validate_product(&form).unwrap();
        assert_eq!(draft.name, "Linen Shirt");
        assert_eq!(draft.image, None);
    }

    #[test]
    fn test_empty_product_form_reports_every_field() {
        let form = ProductForm {
            name: String::new(),
            description: String::new(),
            price: "-5".to_string(),
            category: " ".to_string(),
            stock: "-1".to_string(),
            status: String::new(),
            image: "not a url".to_string(),
        };

        let errors = validate_product(&form).unwrap_err();
        assert_eq!(errors.get("name"), Some("Product name is required"));
        assert_eq!(errors.get("description"), Some("Description is required"));
        assert_eq!(errors.get("price"), Some("Price must be positive"));
        assert_eq!(errors.get("category"), Some("Category is required"));
        assert_eq!(errors.get("stock"), Some("Stock cannot be negative"));
        assert_eq!(errors.get("status"), Some("Status is required"));
        assert_eq!(errors.get("image"), Some("Invalid URL"));
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn test_length_limits() {
        let mut form = valid_form();
        form.name = "A".repeat(100);
        form.description = "B".repeat(500);
        assert!(validate_product(&form).is_ok());

        form.name = "A".repeat(101);
        form.description = "B".repeat(501);
        let errors = validate_product(&form).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is too long"));
        assert_eq!(errors.get("description"), Some("Description is too long"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(validate_price("abc").unwrap_err().message(), "Price must be a number");
        assert_eq!(validate_price("NaN").unwrap_err().message(), "Price must be a number");
        assert_eq!(validate_price("0").unwrap(), Money::zero());

        assert_eq!(validate_stock("0").unwrap(), 0);
        assert_eq!(validate_stock("").unwrap_err().message(), "Stock must be a number");
        assert_eq!(
            validate_stock("2.5").unwrap_err().message(),
            "Stock must be a whole number"
        );
    }

    #[test]
    fn test_image_rules() {
        assert_eq!(validate_image("").unwrap(), None);
        assert!(validate_image("https://example.com/a.jpg").unwrap().is_some());
        assert!(validate_image("/relative/path.png").is_err());
        assert!(validate_image("example.com/a.jpg").is_err());
    }

    #[test]
    fn test_slug_pattern() {
        assert!(is_valid_slug("mens-wear"));
        assert!(is_valid_slug("electronics"));
        assert!(is_valid_slug("a1-b2"));

        assert!(!is_valid_slug("Mens Wear"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_category_schema() {
        let draft = validate_category(&CategoryForm::new("Mens Wear", "mens-wear")).unwrap();
        assert_eq!(draft.status, "active");

        let errors = validate_category(&CategoryForm::new("", "")).unwrap_err();
        assert_eq!(errors.get("name"), Some("Category name is required"));
        assert_eq!(errors.get("slug"), Some("Slug is required"));

        let errors = validate_category(&CategoryForm::new("Kids", "Kids Wear")).unwrap_err();
        assert_eq!(
            errors.get("slug"),
            Some("Slug must be lowercase with hyphens (e.g., mens-wear)")
        );
    }

    #[test]
    fn test_slugify_produces_valid_slugs() {
        for name in ["Mens Wear", "Women's Shoes", "  Kids -- Toys  ", "Sale 2024!"] {
            let slug = slugify(name);
            assert!(is_valid_slug(&slug), "{name} -> {slug}");
        }
        assert_eq!(slugify("Sale 2024!"), "sale-2024");
    }

    #[test]
    fn test_form_defaults_and_prefill() {
        let form = ProductForm::default();
        assert_eq!(form.status, "active");
        assert_eq!(form.price, "0");
        assert_eq!(form.stock, "0");

        let product = Product {
            id: 3,
            name: "Scarf".to_string(),
            description: "Wool scarf".to_string(),
            price: Money::from_cents(1205),
            category: "accessories".to_string(),
            stock: 4,
            status: "active".to_string(),
            image: None,
            created_at: None,
        };
        let form = ProductForm::from_product(&product);
        assert_eq!(form.price, "12.05");
        assert_eq!(form.image, "");

        let draft = validate_product(&form).unwrap();
        assert_eq!(draft.price, product.price);
    }
}
