//! # FashionHub Dashboard Entry Point
//!
//! Command-line front end of the inventory dashboard.
//!
//! ## Usage
//! ```bash
//! fashionhub sign-in --email ada@fashionhub.test
//! fashionhub products list --search shirt --layout list
//! fashionhub products add --name "Linen Shirt" --description "Breathable linen" --price 49.99 --category men-s-wear --stock 3
//! fashionhub products edit 7 --stock 10
//! fashionhub products delete 7 --yes
//! fashionhub categories add "Men's Wear"
//! fashionhub sign-out
//! ```
//!
//! ## Exit Codes
//! - `0` the view rendered
//! - `1` the command failed (not signed in, invalid form, store error)

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use fashionhub_core::{ProductForm, DEFAULT_STATUS};
use fashionhub_dashboard::commands::product::{Layout, ListOptions, ProductEdits};
use fashionhub_dashboard::commands::{auth, category, product};
use fashionhub_dashboard::error::{ApiError, ErrorCode};
use fashionhub_dashboard::{init_tracing, App};
use fashionhub_store::DashboardConfig;

#[derive(Parser)]
#[command(name = "fashionhub")]
#[command(about = "FashionHub product inventory dashboard", version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,
        /// Read from FASHIONHUB_PASSWORD when omitted
        #[arg(long, env = "FASHIONHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the saved session
    SignOut,
    /// Show the signed-in user
    Whoami,
    /// Manage products
    #[command(subcommand)]
    Products(ProductCommand),
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Subcommand)]
enum ProductCommand {
    /// List products, newest first
    List {
        /// Name contains (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Category name or slug
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Products per page (defaults to catalog.page_size)
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, value_enum, default_value_t = Layout::Grid)]
        layout: Layout,
    },
    /// Show one product
    Show { id: i64 },
    /// Add a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "0")]
        price: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "0")]
        stock: String,
        #[arg(long, default_value = DEFAULT_STATUS)]
        status: String,
        /// Image URL
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Edit a product; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        stock: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Image URL ("" clears it)
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a product
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// List categories
    List,
    /// Add a category
    Add {
        name: String,
        /// Defaults to a slug derived from the name
        #[arg(long)]
        slug: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let config = DashboardConfig::load(cli.config).context("loading configuration")?;
    let app = App::new(config).context("starting dashboard")?;
    app.start().await;

    match run(&app, cli.command).await {
        Ok(view) => {
            if !view.is_empty() {
                println!("{}", view);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            report(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(app: &App, command: Command) -> Result<String, ApiError> {
    match command {
        Command::SignIn { email, password } => auth::sign_in(app, &email, &password).await,
        Command::SignOut => auth::sign_out(app).await,
        Command::Whoami => auth::whoami(app),
        Command::Products(command) => run_product(app, command).await,
        Command::Categories(CategoryCommand::List) => category::list_categories(app).await,
        Command::Categories(CategoryCommand::Add { name, slug }) => {
            category::add_category(app, &name, slug).await
        }
    }
}

async fn run_product(app: &App, command: ProductCommand) -> Result<String, ApiError> {
    match command {
        ProductCommand::List {
            search,
            category,
            page,
            limit,
            layout,
        } => {
            let options = ListOptions {
                search,
                category,
                page,
                limit,
                layout,
            };
            product::list_products(app, options).await
        }
        ProductCommand::Show { id } => product::show_product(app, id).await,
        ProductCommand::Add {
            name,
            description,
            price,
            category,
            stock,
            status,
            image,
        } => {
            let form = ProductForm {
                name,
                description,
                price,
                category,
                stock,
                status,
                image,
            };
            product::add_product(app, form).await
        }
        ProductCommand::Edit {
            id,
            name,
            description,
            price,
            category,
            stock,
            status,
            image,
        } => {
            let edits = ProductEdits {
                name,
                description,
                price,
                category,
                stock,
                status,
                image,
            };
            product::edit_product(app, id, edits).await
        }
        ProductCommand::Delete { id, yes } => product::delete_product(app, id, yes).await,
    }
}

/// Prints a failed command: one line per invalid field, otherwise the message.
fn report(e: &ApiError) {
    match (&e.code, &e.fields) {
        (ErrorCode::ValidationError, Some(fields)) => {
            eprintln!("Please fix the following:");
            for (field, message) in fields {
                eprintln!("  {}: {}", field, message);
            }
        }
        (ErrorCode::StoreError | ErrorCode::Internal, _) => {
            error!(code = ?e.code, message = %e.message, "Command failed");
            eprintln!("Error: {}", e.message);
        }
        _ => eprintln!("{}", e.message),
    }
}
