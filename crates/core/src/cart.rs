//! Session cart.
//!
//! A cart maps product ids to a quantity and the unit price captured when
//! the product was first added. Later catalog price changes do not touch
//! lines already in the cart. Lines keep insertion order.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, Slug};

/// Errors produced by cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity is outside the accepted range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),
    /// Incrementing the line would overflow its quantity.
    #[error("quantity for product {0} is too large")]
    QuantityOverflow(ProductId),
}

/// What the cart copies from a product when it is first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub slug: Slug,
    pub price: Price,
}

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub slug: Slug,
    pub quantity: u32,
    /// Unit price at the time the product was added.
    pub price: Price,
}

impl CartLine {
    /// Quantity × snapshot unit price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A shopping cart keyed by product id.
///
/// ## Examples
///
/// ```
/// use corner_shop_core::{Cart, Price, ProductId, ProductSnapshot, Slug};
///
/// let book = ProductSnapshot {
///     product_id: ProductId::new(1),
///     name: "Django Book".to_string(),
///     slug: Slug::parse("django-book").unwrap(),
///     price: Price::from_cents(2500),
/// };
///
/// let mut cart = Cart::new();
/// cart.add(book.clone(), 1).unwrap();
/// cart.add(book, 2).unwrap();
///
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart.item_count(), 3);
/// assert_eq!(cart.total(), Price::from_cents(7500));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of a product and return the line's new quantity.
    ///
    /// An existing line is incremented and keeps its original price
    /// snapshot; otherwise a new line is created from `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is not a positive
    /// `u32`, or [`CartError::QuantityOverflow`] if the line quantity would
    /// overflow.
    pub fn add(&mut self, product: ProductSnapshot, quantity: i64) -> Result<u32, CartError> {
        let quantity = positive_quantity(quantity)?;

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.product_id)
        {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(CartError::QuantityOverflow(product.product_id))?;
            return Ok(line.quantity);
        }

        self.lines.push(CartLine {
            product_id: product.product_id,
            name: product.name,
            slug: product.slug,
            quantity,
            price: product.price,
        });
        Ok(quantity)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// A quantity of zero or less removes the line. Products not in the
    /// cart are left alone. Returns the updated line, if one remains.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` exceeds `u32::MAX`.
    pub fn update(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Option<&CartLine>, CartError> {
        if quantity <= 0 {
            self.remove(product_id);
            return Ok(None);
        }

        let quantity = positive_quantity(quantity)?;
        let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) else {
            return Ok(None);
        };
        line.quantity = quantity;
        Ok(Some(&*line))
    }

    /// Remove a product from the cart. Absent products are a no-op.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartLine> {
        self.position(product_id).map(|idx| self.lines.remove(idx))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of quantity × snapshot price over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }
}

fn positive_quantity(quantity: i64) -> Result<u32, CartError> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or(CartError::InvalidQuantity(quantity))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, cents: i64) -> ProductSnapshot {
        ProductSnapshot {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            slug: Slug::parse(&format!("product-{id}")).unwrap(),
            price: Price::from_cents(cents),
        }
    }

    #[test]
    fn test_add_creates_line_with_snapshot() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(product(1, 1999), 2).unwrap(), 2);

        let line = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.price, Price::from_cents(1999));
        assert_eq!(line.name, "Product 1");
    }

    #[test]
    fn test_add_same_product_twice_increments() {
        let mut cart = Cart::new();
        cart.add(product(1, 1000), 1).unwrap();
        assert_eq!(cart.add(product(1, 1000), 3).unwrap(), 4);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 4);
    }

    #[test]
    fn test_add_keeps_original_price_snapshot() {
        let mut cart = Cart::new();
        cart.add(product(1, 1000), 1).unwrap();
        cart.add(product(1, 5000), 1).unwrap();

        let line = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(line.price, Price::from_cents(1000));
        assert_eq!(cart.total(), Price::from_cents(2000));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(product(1, 100), 0).unwrap_err(),
            CartError::InvalidQuantity(0)
        );
        assert_eq!(
            cart.add(product(1, 100), -2).unwrap_err(),
            CartError::InvalidQuantity(-2)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_overflow() {
        let mut cart = Cart::new();
        cart.add(product(1, 100), i64::from(u32::MAX)).unwrap();
        assert_eq!(
            cart.add(product(1, 100), 1).unwrap_err(),
            CartError::QuantityOverflow(ProductId::new(1))
        );
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_update_sets_quantity() {
        let mut cart = Cart::new();
        cart.add(product(1, 100), 5).unwrap();

        let line = cart.update(ProductId::new(1), 2).unwrap().unwrap();
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_update_to_zero_or_less_removes() {
        let mut cart = Cart::new();
        cart.add(product(1, 100), 5).unwrap();
        cart.add(product(2, 100), 5).unwrap();

        assert!(cart.update(ProductId::new(1), 0).unwrap().is_none());
        assert!(cart.update(ProductId::new(2), -3).unwrap().is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_absent_product_is_noop() {
        let mut cart = Cart::new();
        assert!(cart.update(ProductId::new(9), 3).unwrap().is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_rejects_huge_quantity() {
        let mut cart = Cart::new();
        cart.add(product(1, 100), 1).unwrap();
        let huge = i64::from(u32::MAX) + 1;
        assert_eq!(
            cart.update(ProductId::new(1), huge).unwrap_err(),
            CartError::InvalidQuantity(huge)
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(product(1, 100), 1).unwrap();

        assert!(cart.remove(ProductId::new(1)).is_some());
        assert!(cart.remove(ProductId::new(1)).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let mut cart = Cart::new();
        cart.add(product(1, 1999), 2).unwrap();
        cart.add(product(2, 550), 3).unwrap();
        cart.add(product(3, 1), 1).unwrap();

        // 2 × 19.99 + 3 × 5.50 + 1 × 0.01
        assert_eq!(cart.total(), Price::from_cents(5649));
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_empty_cart_total() {
        let cart = Cart::new();
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(product(3, 100), 1).unwrap();
        cart.add(product(1, 100), 1).unwrap();
        cart.add(product(2, 100), 1).unwrap();
        cart.add(product(3, 100), 1).unwrap();

        let order: Vec<i32> = cart.lines().iter().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(order, [3, 1, 2]);
    }

    #[test]
    fn test_serde_roundtrip_preserves_lines() {
        let mut cart = Cart::new();
        cart.add(product(1, 1250), 2).unwrap();

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value["lines"][0]["price"], "12.50");
        let restored: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(restored, cart);
    }
}
