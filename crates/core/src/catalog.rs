//! The product catalog and its filter/sort engine.
//!
//! A [`Catalog`] is loaded once and never mutated. Browsing produces a fresh
//! ordered list of borrowed products from a [`CategoryFilter`] and a
//! [`SortKey`]:
//!
//! ```
//! use vitrine_core::{Catalog, CategoryFilter, SortKey};
//!
//! let catalog = Catalog::from_json(r#"[
//!     {"id": "1", "name": "Lamp", "description": "", "price": "249.99",
//!      "category": "furniture", "image": ""},
//!     {"id": "2", "name": "Watch", "description": "", "price": "199.99",
//!      "category": "electronics", "image": ""}
//! ]"#).unwrap();
//!
//! let shown = catalog.browse(&CategoryFilter::All, SortKey::PriceLowToHigh);
//! assert_eq!(shown[0].name, "Watch");
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::ProductId;

/// Errors that can occur when loading a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// Two products share an identifier.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// The catalog source is not a valid product list.
    #[error("invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Category selection for browsing.
///
/// `All` is the sentinel shown first in the filter bar; any other value is an
/// exact, case-sensitive category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Every product.
    #[default]
    All,
    /// Only products whose category equals this label.
    Category(String),
}

impl CategoryFilter {
    /// Query-string value of the sentinel.
    pub const ALL: &'static str = "all";

    /// Whether `product` passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => product.category == *category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == Self::ALL {
            Self::All
        } else {
            Self::Category(value)
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => CategoryFilter::ALL.to_owned(),
            CategoryFilter::Category(category) => category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Category(category) => f.write_str(category),
        }
    }
}

/// Display order for browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Featured,
    /// Cheapest first.
    #[serde(rename = "price-low")]
    PriceLowToHigh,
    /// Most expensive first.
    #[serde(rename = "price-high")]
    PriceHighToLow,
    /// Alphabetical by name.
    Name,
}

/// Error returned when a sort key string is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl SortKey {
    /// All sort keys in filter-bar order.
    pub const ALL: [Self; 4] = [
        Self::Featured,
        Self::PriceLowToHigh,
        Self::PriceHighToLow,
        Self::Name,
    ];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLowToHigh => "price-low",
            Self::PriceHighToLow => "price-high",
            Self::Name => "name",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
            Self::Name => "Name A-Z",
        }
    }

    /// Compare two products under this key. `Featured` treats all products
    /// as equal so a stable sort keeps catalog order.
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Featured => Ordering::Equal,
            Self::PriceLowToHigh => a.price.cmp(&b.price),
            Self::PriceHighToLow => b.price.cmp(&a.price),
            Self::Name => compare_names(&a.name, &b.name),
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSortKey(s.to_owned()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name ordering: case-insensitive first, then by code point so that names
/// differing only in case still have a deterministic order.
fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// The immutable, ordered set of purchasable products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// Prices are validated while parsing, so a negative price is a parse error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and
    /// `CatalogError::DuplicateId` for repeated ids.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Products to display for a filter and sort key.
    ///
    /// The result borrows from the catalog and is always a subset or
    /// reordering of it. Sorting is stable: products that compare equal keep
    /// their catalog order.
    #[must_use]
    pub fn browse(&self, filter: &CategoryFilter, sort: SortKey) -> Vec<&Product> {
        let mut shown: Vec<&Product> = self.products.iter().filter(|p| filter.matches(p)).collect();
        shown.sort_by(|a, b| sort.compare(a, b));
        shown
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Price;

    fn product(id: &str, name: &str, cents: i64, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: String::new(),
            price: Price::from_cents(cents).unwrap(),
            category: category.to_owned(),
            image: String::new(),
            colors: None,
            sizes: None,
            model: None,
            mannequin: None,
        }
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            product("1", "Cutie Patootie cup", 2499, "furniture"),
            product("2", "Ergonomic Office Chair", 59999, "furniture"),
            product("3", "Smart Fitness Watch", 19999, "electronics"),
            product("4", "accent lamp", 2499, "furniture"),
            product("5", "Denim Jacket", 8999, "clothes"),
        ])
        .unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Catalog::new(vec![
            product("1", "A", 100, "x"),
            product("1", "B", 200, "y"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_str() == "1"));
    }

    #[test]
    fn test_from_json_rejects_negative_price() {
        let json = r#"[{"id": "1", "name": "A", "description": "", "price": "-1.00",
                        "category": "x", "image": ""}]"#;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_categories_first_appearance_order() {
        assert_eq!(sample().categories(), vec!["furniture", "electronics", "clothes"]);
    }

    #[test]
    fn test_filter_keeps_only_matching_category() {
        let catalog = sample();
        for category in catalog.categories() {
            let filter = CategoryFilter::from(category);
            let shown = catalog.browse(&filter, SortKey::Featured);
            assert!(!shown.is_empty());
            assert!(shown.iter().all(|p| p.category == category));
        }
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let catalog = sample();
        let shown = catalog.browse(&CategoryFilter::from("Furniture"), SortKey::Featured);
        assert!(shown.is_empty());
    }

    #[test]
    fn test_unknown_category_yields_empty() {
        let catalog = sample();
        let shown = catalog.browse(&CategoryFilter::from("garden"), SortKey::Name);
        assert!(shown.is_empty());
    }

    #[test]
    fn test_featured_preserves_catalog_order() {
        let catalog = sample();
        let shown = catalog.browse(&CategoryFilter::All, SortKey::Featured);
        assert_eq!(ids(&shown), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_price_ascending_is_stable() {
        let catalog = sample();
        let shown = catalog.browse(&CategoryFilter::All, SortKey::PriceLowToHigh);
        // 1 and 4 tie at 24.99 and keep catalog order.
        assert_eq!(ids(&shown), vec!["1", "4", "5", "3", "2"]);
    }

    #[test]
    fn test_price_descending_is_stable() {
        let catalog = sample();
        let shown = catalog.browse(&CategoryFilter::All, SortKey::PriceHighToLow);
        assert_eq!(ids(&shown), vec!["2", "3", "5", "1", "4"]);
    }

    #[test]
    fn test_price_sort_is_monotonic_and_idempotent() {
        let catalog = sample();
        let once = catalog.browse(&CategoryFilter::All, SortKey::PriceLowToHigh);
        assert!(once.windows(2).all(|w| w[0].price <= w[1].price));

        let mut twice = once.clone();
        twice.sort_by(|a, b| SortKey::PriceLowToHigh.compare(a, b));
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let catalog = sample();
        let shown = catalog.browse(&CategoryFilter::from("furniture"), SortKey::Name);
        let names: Vec<&str> = shown.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["accent lamp", "Cutie Patootie cup", "Ergonomic Office Chair"]
        );
    }

    #[test]
    fn test_browse_does_not_mutate_catalog() {
        let catalog = sample();
        let _ = catalog.browse(&CategoryFilter::All, SortKey::PriceHighToLow);
        let order: Vec<&str> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_get() {
        let catalog = sample();
        assert_eq!(catalog.get(&ProductId::new("3")).unwrap().name, "Smart Fitness Watch");
        assert!(catalog.get(&ProductId::new("99")).is_none());
    }

    #[test]
    fn test_sort_key_round_trips_query_values() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!("cheapest".parse::<SortKey>().is_err());
        assert_eq!(
            serde_json::to_string(&SortKey::PriceLowToHigh).unwrap(),
            "\"price-low\""
        );
    }

    #[test]
    fn test_category_filter_from_query_value() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("clothes"),
            CategoryFilter::Category("clothes".to_owned())
        );
        assert_eq!(CategoryFilter::All.to_string(), "all");
    }
}
