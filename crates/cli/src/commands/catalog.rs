//! Browse the catalog from the terminal.

use std::fmt::Write as _;

use vitrine_core::{Catalog, CategoryFilter, SortKey};
use vitrine_storefront::catalog;

use super::{CliError, load_config};

/// Print the browse result for `category` and `sort`, then the filter bar.
///
/// # Errors
///
/// Returns `CliError` if the sort key is unknown or the catalog cannot be
/// loaded.
pub async fn browse(category: &str, sort: &str) -> Result<(), CliError> {
    let sort = sort
        .parse::<SortKey>()
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let config = load_config()?;
    let catalog = catalog::load(config.catalog_path.as_deref()).await?;

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&catalog, &CategoryFilter::from(category), sort));
    }
    Ok(())
}

/// Render the listing as text.
fn render(catalog: &Catalog, filter: &CategoryFilter, sort: SortKey) -> String {
    let products = catalog.browse(filter, sort);
    let mut out = String::new();

    let _ = writeln!(out, "{} product(s) in '{filter}' sorted by {}", products.len(), sort.label());
    for product in products {
        let _ = writeln!(
            out,
            "  {:>4}  {:<32} {:>10}  {}",
            product.id,
            product.name,
            product.price.to_string(),
            product.category
        );
    }

    let categories: Vec<&str> = std::iter::once(CategoryFilter::ALL)
        .chain(catalog.categories())
        .collect();
    let _ = writeln!(out, "Categories: {}", categories.join(", "));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_filtered_listing() {
        let catalog = catalog::embedded().unwrap();
        let out = render(&catalog, &CategoryFilter::from("clothes"), SortKey::Name);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "3 product(s) in 'clothes' sorted by Name A-Z");
        assert!(lines[1].contains("Classic Denim Jacket"));
        assert!(lines[1].contains("$89.99"));
        assert!(lines[2].contains("Premium Cotton T-Shirt"));
        assert!(lines[3].contains("Stylish Sneakers"));
        assert_eq!(lines[4], "Categories: all, furniture, electronics, clothes");
    }

    #[test]
    fn test_render_empty_category() {
        let catalog = catalog::embedded().unwrap();
        let out = render(&catalog, &CategoryFilter::from("toys"), SortKey::Featured);
        assert!(out.starts_with("0 product(s) in 'toys' sorted by Featured\n"));
    }
}
