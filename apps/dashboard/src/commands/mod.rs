//! # Commands Module
//!
//! One function per dashboard view. Each takes the [`App`](crate::App),
//! returns the rendered view as text, or an [`ApiError`](crate::error::ApiError).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports, text layout helpers)
//! ├── auth.rs     ◄─── sign-in, sign-out, whoami
//! ├── product.rs  ◄─── list (grid/list), detail, add, edit, delete
//! └── category.rs ◄─── list, add
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  main.rs parses `fashionhub products list --search shirt`               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::product::list_products(&app, options)                        │
//! │         │                                                               │
//! │         ├── session.require_user()  ◄── gate: anonymous → redirect      │
//! │         │                                                               │
//! │         ├── catalog.products(&query) ◄── cached read                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Ok(String) printed to stdout │ Err(ApiError) printed per field          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod category;
pub mod product;

/// Pads or truncates `text` to exactly `width` characters.
pub(crate) fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

/// Renders rows as left-aligned columns under a header.
pub(crate) fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| fit(cell, *width))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = vec![line(headers.iter().map(|h| h.to_string()).collect())];
    out.push(line(widths.iter().map(|w| "─".repeat(*w)).collect()));
    out.extend(rows.iter().map(|row| line(row.clone())));
    out.join("\n")
}
