//! Category and product management commands.

use tracing::info;

use corner_shop_core::{CategoryTree, Price, Slug};
use corner_shop_storefront::db::{CategoryRepository, ProductRepository};
use corner_shop_storefront::models::{NewCategory, NewProduct};

/// Arguments for `product add`.
#[derive(Debug)]
pub struct ProductInput {
    pub name: String,
    pub category: Slug,
    pub price: Price,
    pub brand: String,
    pub description: String,
    pub slug: Option<Slug>,
    pub image: Option<String>,
    pub available: bool,
}

/// Create a category, optionally under a parent given by slug.
///
/// # Errors
///
/// Returns an error if the parent does not exist, the slug is taken, or
/// the database is unreachable.
pub async fn add_category(
    name: String,
    parent: Option<Slug>,
    slug: Option<Slug>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let repo = CategoryRepository::new(&pool);

    let parent_id = match parent {
        Some(parent_slug) => Some(
            repo.get_by_slug(&parent_slug)
                .await?
                .ok_or_else(|| format!("Parent category not found: {parent_slug}"))?
                .id,
        ),
        None => None,
    };

    let category = repo
        .create(&NewCategory {
            name,
            slug,
            parent_id,
        })
        .await?;

    info!(
        id = %category.id,
        slug = %category.slug,
        "Created category {}",
        category.name
    );
    Ok(())
}

/// Print every category as an indented tree with its full slug.
///
/// # Errors
///
/// Returns an error if the categories cannot be loaded.
pub async fn print_tree() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let tree = CategoryRepository::new(&pool).load_tree().await?;

    if tree.is_empty() {
        info!("No categories yet");
        return Ok(());
    }

    for line in render_tree(&tree) {
        info!("{line}");
    }
    Ok(())
}

/// Render the forest depth-first, two spaces of indent per level.
fn render_tree(tree: &CategoryTree) -> Vec<String> {
    let mut lines = Vec::with_capacity(tree.len());
    let mut stack: Vec<_> = tree.roots().map(|node| (node, 0_usize)).collect();
    stack.reverse();

    while let Some((node, depth)) = stack.pop() {
        lines.push(format!("{}{} [{}]", "  ".repeat(depth), node.name, node.slug));

        let mut children: Vec<_> = tree.children(node.id).map(|c| (c, depth + 1)).collect();
        children.reverse();
        stack.extend(children);
    }

    lines
}

/// Create a product in the category given by slug.
///
/// # Errors
///
/// Returns an error if the category does not exist, the slug is taken, or
/// the database is unreachable.
pub async fn add_product(input: ProductInput) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let category = CategoryRepository::new(&pool)
        .get_by_slug(&input.category)
        .await?
        .ok_or_else(|| format!("Category not found: {}", input.category))?;

    let product = ProductRepository::new(&pool)
        .create(&NewProduct {
            category_id: category.id,
            name: input.name,
            brand: input.brand,
            description: input.description,
            slug: input.slug,
            price: input.price,
            image: input.image,
            available: input.available,
        })
        .await?;

    info!(
        id = %product.id,
        slug = %product.slug,
        price = %product.price,
        "Created product {} in {}",
        product.name,
        category.name
    );
    Ok(())
}
