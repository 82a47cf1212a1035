//! # Seed Data Generator
//!
//! Populates an empty store with fashion categories and sample products for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed everything (categories + 4 products per category)
//! cargo run -p fashionhub-store --bin seed
//!
//! # Fewer products, explicit config file
//! cargo run -p fashionhub-store --bin seed -- --count 10 --config ./fashionhub.toml
//!
//! # Show what would be created without writing
//! cargo run -p fashionhub-store --bin seed -- --dry-run
//! ```
//!
//! Every record goes through the same validation as the dashboard forms
//! before it is sent.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fashionhub_core::validation::{validate_category, validate_product};
use fashionhub_core::{CategoryForm, ProductForm};
use fashionhub_store::{DashboardConfig, SharedConfig, Store};

/// Categories and the product lines sold under each.
const CATALOG: &[(&str, &[(&str, &str)])] = &[
    (
        "Men's Wear",
        &[
            ("Linen Shirt", "Breathable linen shirt for warm days"),
            ("Chino Trousers", "Slim-fit cotton chinos"),
            ("Wool Blazer", "Single-breasted wool blazer"),
            ("Denim Jacket", "Classic washed denim jacket"),
        ],
    ),
    (
        "Women's Wear",
        &[
            ("Wrap Dress", "Floral wrap dress in viscose"),
            ("Pleated Skirt", "Midi skirt with knife pleats"),
            ("Silk Blouse", "Relaxed silk blouse"),
            ("Trench Coat", "Water-repellent cotton trench"),
        ],
    ),
    (
        "Footwear",
        &[
            ("Leather Loafers", "Hand-stitched leather loafers"),
            ("Canvas Sneakers", "Low-top canvas sneakers"),
            ("Chelsea Boots", "Suede Chelsea boots"),
            ("Espadrilles", "Jute-soled summer espadrilles"),
        ],
    ),
    (
        "Accessories",
        &[
            ("Wool Scarf", "Merino wool scarf"),
            ("Leather Belt", "Full-grain leather belt"),
            ("Canvas Tote", "Heavy canvas tote bag"),
            ("Aviator Sunglasses", "Polarised aviator sunglasses"),
        ],
    ),
];

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Seed a FashionHub store with sample categories and products")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of products to create
    #[arg(short, long, default_value_t = 16)]
    count: usize,

    /// Seed even when the store already has products
    #[arg(long)]
    force: bool,

    /// Print what would be created without sending anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("🌱 FashionHub Seed Data Generator");
    println!("=================================");

    let forms = sample_products(cli.count);

    if cli.dry_run {
        for (name, _) in CATALOG {
            println!("  category  {}", name);
        }
        for form in &forms {
            println!("  product   {} ({}, ${})", form.name, form.category, form.price);
        }
        println!();
        println!("✓ Dry run: {} categories, {} products", CATALOG.len(), forms.len());
        return Ok(());
    }

    let config = DashboardConfig::load(cli.config).context("loading configuration")?;
    println!("Store: {}", config.store.url);
    let store = Store::new(SharedConfig::new(config))?;

    let existing = store.products().count().await?;
    if existing > 0 && !cli.force {
        println!("⚠ Store already has {} products", existing);
        println!("  Skipping seed to avoid duplicates (use --force to seed anyway).");
        return Ok(());
    }

    println!();
    println!("Creating categories...");
    for (name, _) in CATALOG {
        let draft = match validate_category(&CategoryForm::from_name(*name)) {
            Ok(draft) => draft,
            Err(errors) => bail!("sample category '{}' is invalid: {}", name, errors),
        };
        match store.categories().create(&draft).await {
            Ok(category) => println!("  ✓ {} ({})", category.name, draft.slug),
            Err(e) => eprintln!("  ✗ {}: {}", name, e),
        }
    }

    println!();
    println!("Creating products...");
    let start = std::time::Instant::now();
    let mut created = 0;

    for form in &forms {
        let draft = match validate_product(form) {
            Ok(draft) => draft,
            Err(errors) => bail!("sample product '{}' is invalid: {}", form.name, errors),
        };
        match store.products().create(&draft).await {
            Ok(product) => {
                created += 1;
                println!("  ✓ #{} {} {}", product.id, product.name, product.price);
            }
            Err(e) => eprintln!("  ✗ {}: {}", form.name, e),
        }
    }

    println!();
    println!("✓ Created {} products in {:?}", created, start.elapsed());
    Ok(())
}

/// Builds up to `count` product forms, cycling through the catalog.
fn sample_products(count: usize) -> Vec<ProductForm> {
    CATALOG
        .iter()
        .flat_map(|(category, lines)| {
            let slug = CategoryForm::from_name(*category).slug;
            lines
                .iter()
                .enumerate()
                .map(move |(idx, (name, description))| (slug.clone(), idx, *name, *description))
        })
        .enumerate()
        .take(count)
        .map(|(seed, (category, idx, name, description))| {
            // $19.99 - $149.99
            let cents = 1999 + (seed * 37 % 14) * 1000;
            ProductForm {
                name: name.to_string(),
                description: description.to_string(),
                price: format!("{}.{:02}", cents / 100, cents % 100),
                category,
                stock: ((seed * 13 + idx * 7) % 60).to_string(),
                ..ProductForm::default()
            }
        })
        .collect()
}
