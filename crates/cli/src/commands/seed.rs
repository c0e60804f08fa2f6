//! Seed the catalog from a YAML file.
//!
//! The file describes the category forest with products nested under the
//! category they belong to:
//!
//! ```yaml
//! categories:
//!   - name: Books
//!     slug: books
//!     children:
//!       - name: Programming
//!         products:
//!           - name: Django Book
//!             price: "39.99"
//! ```
//!
//! Seeding is re-runnable. A category is reused when its slug already
//! exists, or, without a slug, when a category of the same name exists under
//! the same parent. A reused category must sit under the parent the file
//! gives it. Products whose slug already exists are skipped.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{error, info, warn};

use corner_shop_core::{CategoryId, Price, Slug};
use corner_shop_storefront::db::{CategoryRepository, ProductRepository, RepositoryError};
use corner_shop_storefront::models::{NewCategory, NewProduct};

/// Longest category or product name the schema accepts.
const MAX_NAME_LENGTH: usize = 100;

/// Top-level seed document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    pub categories: Vec<SeedCategory>,
}

/// A category with its products and subcategories.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCategory {
    pub name: String,
    pub slug: Option<Slug>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    #[serde(default)]
    pub children: Vec<SeedCategory>,
}

/// A product listed under its category.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedProduct {
    pub name: String,
    pub slug: Option<Slug>,
    #[serde(default = "Price::default_product_price")]
    pub price: Price,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

/// Counts reported after seeding.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub categories_reused: usize,
    pub products_created: usize,
    pub products_skipped: usize,
}

/// Check names against the schema limits and explicit slugs for
/// duplicates within categories and within products.
///
/// Returns one message per problem, with the category path for context.
#[must_use]
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut category_slugs = HashSet::new();
    let mut product_slugs = HashSet::new();
    let mut stack: Vec<(&SeedCategory, String)> = seed
        .categories
        .iter()
        .rev()
        .map(|c| (c, c.name.clone()))
        .collect();

    while let Some((category, path)) = stack.pop() {
        check_name(&category.name, &path, &mut errors);
        if let Some(slug) = &category.slug
            && !category_slugs.insert(slug)
        {
            errors.push(format!("{path}: category slug {slug} is used more than once"));
        }

        for product in &category.products {
            let context = format!("{path} / {}", product.name);
            check_name(&product.name, &context, &mut errors);
            if let Some(slug) = &product.slug
                && !product_slugs.insert(slug)
            {
                errors.push(format!("{context}: product slug {slug} is used more than once"));
            }
        }

        stack.extend(
            category
                .children
                .iter()
                .rev()
                .map(|child| (child, format!("{path} > {}", child.name))),
        );
    }

    errors
}

fn check_name(name: &str, context: &str, errors: &mut Vec<String>) {
    if name.trim().is_empty() {
        errors.push(format!("{context}: name is empty"));
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(format!(
            "{context}: name is longer than {MAX_NAME_LENGTH} characters"
        ));
    }
}

/// Seed the catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or a database operation fails.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = super::connect().await?;
    let summary = seed_catalog(&pool, &seed).await?;

    info!("Seeding complete!");
    info!("  Categories created: {}", summary.categories_created);
    info!("  Categories reused: {}", summary.categories_reused);
    info!("  Products created: {}", summary.products_created);
    info!("  Products skipped (already exist): {}", summary.products_skipped);

    Ok(())
}

/// Reject reusing a category that the database places under another parent.
fn check_parent(
    slug: &Slug,
    stored: Option<CategoryId>,
    wanted: Option<CategoryId>,
) -> Result<(), RepositoryError> {
    if stored == wanted {
        return Ok(());
    }
    let describe = |parent: Option<CategoryId>| {
        parent.map_or_else(|| "the top level".to_string(), |id| format!("category {id}"))
    };
    Err(RepositoryError::Conflict(format!(
        "category {slug} exists under {} but the seed file places it under {}",
        describe(stored),
        describe(wanted)
    )))
}

/// Insert every category and product, parents before children.
async fn seed_catalog(pool: &PgPool, seed: &SeedFile) -> Result<SeedSummary, RepositoryError> {
    let categories = CategoryRepository::new(pool);
    let products = ProductRepository::new(pool);
    let mut summary = SeedSummary::default();

    let mut stack: Vec<(&SeedCategory, Option<CategoryId>)> =
        seed.categories.iter().rev().map(|c| (c, None)).collect();

    while let Some((entry, parent_id)) = stack.pop() {
        let existing = match &entry.slug {
            Some(slug) => categories.get_by_slug(slug).await?,
            None => categories.find_by_name(&entry.name, parent_id).await?,
        };

        let category = if let Some(category) = existing {
            check_parent(&category.slug, category.parent_id, parent_id)?;
            summary.categories_reused += 1;
            category
        } else {
            summary.categories_created += 1;
            categories
                .create(&NewCategory {
                    name: entry.name.clone(),
                    slug: entry.slug.clone(),
                    parent_id,
                })
                .await?
        };
        info!(slug = %category.slug, name = %category.name, "Category ready");

        for product in &entry.products {
            let new = NewProduct {
                category_id: category.id,
                name: product.name.clone(),
                brand: product.brand.clone(),
                description: product.description.clone(),
                slug: product.slug.clone(),
                price: product.price,
                image: product.image.clone(),
                available: product.available,
            };
            match products.create(&new).await {
                Ok(_) => summary.products_created += 1,
                Err(RepositoryError::Conflict(reason)) => {
                    warn!(name = %product.name, %reason, "Skipping product");
                    summary.products_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        stack.extend(entry.children.iter().rev().map(|c| (c, Some(category.id))));
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
categories:
  - name: Books
    slug: books
    products:
      - name: Atlas
        price: "12.50"
    children:
      - name: Programming
        slug: programming
        products:
          - name: Django Book
            slug: django-book
            price: 39.99
            brand: Two Scoops
  - name: Music
"#;

    #[test]
    fn test_parse_nested_catalog() {
        let seed: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();

        assert_eq!(seed.categories.len(), 2);
        let books = &seed.categories[0];
        assert_eq!(books.products[0].price, Price::from_cents(1250));
        assert!(books.products[0].available);

        let programming = &books.children[0];
        assert_eq!(programming.products[0].price, Price::from_cents(3999));
        assert_eq!(programming.products[0].brand, "Two Scoops");

        let music = &seed.categories[1];
        assert!(music.slug.is_none());
        assert!(music.products.is_empty());
    }

    #[test]
    fn test_missing_price_uses_default() {
        let seed: SeedFile =
            serde_yaml::from_str("categories:\n  - name: Tea\n    products:\n      - name: Sencha\n")
                .unwrap();
        assert_eq!(
            seed.categories[0].products[0].price,
            Price::default_product_price()
        );
    }

    #[test]
    fn test_rejects_invalid_slug_and_unknown_fields() {
        assert!(serde_yaml::from_str::<SeedFile>("categories:\n  - name: A\n    slug: a b\n").is_err());
        assert!(serde_yaml::from_str::<SeedFile>("categories:\n  - name: A\n    colour: red\n").is_err());
    }

    #[test]
    fn test_validate_reports_path() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        let yaml = format!(
            "categories:\n  - name: Books\n    children:\n      - name: \"\"\n    products:\n      - name: {long}\n"
        );
        let seed: SeedFile = serde_yaml::from_str(&yaml).unwrap();

        let mut errors = validate(&seed);
        errors.sort();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.starts_with("Books > : name is empty")));
        assert!(errors.iter().any(|e| e.contains("longer than 100")));
    }

    #[test]
    fn test_valid_sample_has_no_errors() {
        let seed: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(validate(&seed).is_empty());
    }

    #[test]
    fn test_validate_reports_duplicate_slugs() {
        let yaml = r"
categories:
  - name: Tea
    slug: tea
    products:
      - name: Tea
        slug: tea
  - name: Green Tea
    slug: tea
";
        let seed: SeedFile = serde_yaml::from_str(yaml).unwrap();
        // A category and a product may share a slug; two categories may not
        assert_eq!(
            validate(&seed),
            ["Green Tea: category slug tea is used more than once"]
        );
    }

    #[test]
    fn test_check_parent_accepts_same_parent() {
        let slug = Slug::parse("fiction").unwrap();
        assert!(check_parent(&slug, None, None).is_ok());
        let books = Some(CategoryId::new(1));
        assert!(check_parent(&slug, books, books).is_ok());
    }

    #[test]
    fn test_check_parent_rejects_moved_category() {
        let slug = Slug::parse("fiction").unwrap();
        let err = check_parent(&slug, Some(CategoryId::new(1)), None).unwrap_err();
        let RepositoryError::Conflict(message) = err else {
            panic!("expected a conflict, got {err:?}");
        };
        assert_eq!(
            message,
            "category fiction exists under category 1 but the seed file places it under the top level"
        );
        assert!(check_parent(&slug, None, Some(CategoryId::new(2))).is_err());
    }
}
