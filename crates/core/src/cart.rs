//! The cart ledger.
//!
//! Every `add` appends a new entry, so adding the same product twice yields
//! two entries rather than a quantity of two. `remove` drops every entry for
//! an id at once.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// Products selected for checkout during a browsing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLedger {
    entries: Vec<Product>,
}

impl CartLedger {
    /// Create an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry for `product`, even if it is already in the cart.
    pub fn add(&mut self, product: Product) {
        self.entries.push(product);
    }

    /// Remove every entry whose id equals `id`.
    ///
    /// Returns the number of entries removed; zero when the id is absent.
    pub fn remove(&mut self, id: &ProductId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|p| p.id != *id);
        before - self.entries.len()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of prices over all entries, computed on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(|p| p.price).sum()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Product] {
        &self.entries
    }

    /// Number of entries (the header badge count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries for `id`.
    #[must_use]
    pub fn count_of(&self, id: &ProductId) -> usize {
        self.entries.iter().filter(|p| p.id == *id).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(cents).unwrap(),
            category: "furniture".to_owned(),
            image: String::new(),
            colors: None,
            sizes: None,
            model: None,
            mannequin: None,
        }
    }

    #[test]
    fn test_total_of_two_adds() {
        let mut cart = CartLedger::new();
        cart.add(product("1", 2499));
        cart.add(product("3", 19999));
        assert_eq!(cart.total(), Price::from_cents(22498).unwrap());
    }

    #[test]
    fn test_duplicate_adds_are_separate_entries() {
        let mut cart = CartLedger::new();
        cart.add(product("1", 2499));
        cart.add(product("1", 2499));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.count_of(&ProductId::new("1")), 2);
        assert_eq!(cart.total(), Price::from_cents(4998).unwrap());
    }

    #[test]
    fn test_remove_drops_all_matching_entries() {
        let mut cart = CartLedger::new();
        cart.add(product("1", 2499));
        cart.add(product("2", 59999));
        cart.add(product("1", 2499));

        assert_eq!(cart.remove(&ProductId::new("1")), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.entries()[0].id.as_str(), "2");
        assert_eq!(cart.total(), Price::from_cents(59999).unwrap());
    }

    #[test]
    fn test_remove_on_empty_is_noop() {
        let mut cart = CartLedger::new();
        assert_eq!(cart.remove(&ProductId::new("42")), 0);
        assert_eq!(cart, CartLedger::new());
    }

    #[test]
    fn test_remove_unknown_id_keeps_entries() {
        let mut cart = CartLedger::new();
        cart.add(product("5", 14999));
        assert_eq!(cart.remove(&ProductId::new("6")), 0);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_clear_resets_total() {
        let mut cart = CartLedger::new();
        cart.add(product("1", 2499));
        cart.add(product("2", 59999));
        cart.remove(&ProductId::new("1"));
        cart.add(product("7", 34999));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_serializes_as_product_list() {
        let mut cart = CartLedger::new();
        cart.add(product("1", 2499));
        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.is_array());

        let back: CartLedger = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}
