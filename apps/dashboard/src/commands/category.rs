//! # Category Commands

use tracing::debug;

use crate::commands::table;
use crate::error::ApiError;
use crate::App;
use fashionhub_core::{Category, CategoryForm};

pub async fn list_categories(app: &App) -> Result<String, ApiError> {
    app.session.require_user()?;
    debug!("list_categories command");

    let categories = app
        .catalog
        .categories()
        .await
        .into_result()?
        .unwrap_or_default();
    Ok(render_categories(&categories))
}

/// Submits the "Add category" form. Without `slug` the slug is derived
/// from the name.
pub async fn add_category(
    app: &App,
    name: &str,
    slug: Option<String>,
) -> Result<String, ApiError> {
    app.session.require_user()?;
    debug!(name, "add_category command");

    let mut form = CategoryForm::from_name(name);
    if let Some(slug) = slug {
        form.slug = slug;
    }

    let category = app.catalog.create_category().mutate_async(form).await?;
    Ok(format!(
        "Created category {} ({})",
        category.name,
        category.filter_value()
    ))
}

fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories yet".to_string();
    }
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.slug.clone().unwrap_or_default(),
                c.status.clone().unwrap_or_default(),
            ]
        })
        .collect();
    table(&["NAME", "SLUG", "STATUS"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_missing_slug_as_blank() {
        let rendered = render_categories(&[Category {
            id: 1,
            name: "Footwear".to_string(),
            slug: None,
            status: Some("active".to_string()),
            created_at: None,
        }]);
        assert!(rendered.lines().nth(2).unwrap().starts_with("Footwear"));
        assert!(rendered.contains("active"));
    }

    #[test]
    fn test_empty_categories() {
        assert_eq!(render_categories(&[]), "No categories yet");
    }
}
