//! Corner Shop CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! cs-cli migrate
//!
//! # Load categories and products from a YAML file
//! cs-cli seed crates/cli/seed/catalog.yaml
//!
//! # Add a category (slug generated unless given)
//! cs-cli category add -n "Fiction" -p books
//!
//! # Print the category tree
//! cs-cli category tree
//!
//! # Add a product
//! cs-cli product add -n "Django Book" -c books --price 39.99
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use corner_shop_core::{Price, Slug};

mod commands;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Corner Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Load a catalog from a YAML file
    Seed {
        /// Path to the YAML file
        file: String,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a category
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Slug of the parent category
        #[arg(short, long)]
        parent: Option<Slug>,

        /// Explicit slug (generated from the name if omitted)
        #[arg(short, long)]
        slug: Option<Slug>,
    },
    /// Print every category as an indented tree
    Tree,
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a product
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Slug of the product's category
        #[arg(short, long)]
        category: Slug,

        /// Unit price (defaults to 99.99)
        #[arg(long)]
        price: Option<Price>,

        #[arg(short, long, default_value = "")]
        brand: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Explicit slug (derived from the name if omitted)
        #[arg(short, long)]
        slug: Option<Slug>,

        /// Image path relative to the media directory
        #[arg(long)]
        image: Option<String>,

        /// Hide the product from the storefront
        #[arg(long)]
        unavailable: bool,
    },
}

#[tokio::main]
async fn main() {
    // Command output goes through tracing, so default to info
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,sqlx=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { file } => commands::seed::catalog(&file).await?,
        Commands::Category { action } => match action {
            CategoryAction::Add { name, parent, slug } => {
                commands::catalog::add_category(name, parent, slug).await?;
            }
            CategoryAction::Tree => commands::catalog::print_tree().await?,
        },
        Commands::Product { action } => match action {
            ProductAction::Add {
                name,
                category,
                price,
                brand,
                description,
                slug,
                image,
                unavailable,
            } => {
                let input = commands::catalog::ProductInput {
                    name,
                    category,
                    price: price.unwrap_or_else(Price::default_product_price),
                    brand,
                    description,
                    slug,
                    image,
                    available: !unavailable,
                };
                commands::catalog::add_product(input).await?;
            }
        },
    }
    Ok(())
}
