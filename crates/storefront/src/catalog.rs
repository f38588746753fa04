//! Catalog source.
//!
//! The demo catalog is compiled into the binary. A JSON file with the same
//! shape can replace it through `VITRINE_CATALOG_PATH`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use vitrine_core::{Catalog, CatalogError};

/// The demo product list.
pub const EMBEDDED_CATALOG: &str = include_str!("../data/products.json");

/// Errors raised while loading the catalog at startup.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

/// Parse the embedded demo catalog.
///
/// # Errors
///
/// Returns `CatalogError` if the embedded data is malformed.
pub fn embedded() -> Result<Catalog, CatalogError> {
    Catalog::from_json(EMBEDDED_CATALOG)
}

/// Load the catalog from `path`, or the embedded one when `path` is `None`.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file cannot be read or parsed.
pub async fn load(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = path else {
        return Ok(embedded()?);
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let catalog = Catalog::from_json(&json)?;
    tracing::info!(path = %path.display(), products = catalog.len(), "catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitrine_core::{CategoryFilter, ProductId, SortKey};

    use super::*;

    #[test]
    fn test_embedded_catalog() {
        let catalog = embedded().unwrap();
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.categories(), ["furniture", "electronics", "clothes"]);

        let tshirt = catalog.get(&ProductId::new("10")).unwrap();
        assert!(tshirt.has_model());
        assert!(tshirt.mannequin.is_some());
    }

    #[test]
    fn test_embedded_catalog_browse() {
        let catalog = embedded().unwrap();

        let clothes = catalog.browse(&CategoryFilter::from("clothes"), SortKey::PriceLowToHigh);
        let names: Vec<_> = clothes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["Premium Cotton T-Shirt", "Stylish Sneakers", "Classic Denim Jacket"]
        );

        let priciest = catalog.browse(&CategoryFilter::All, SortKey::PriceHighToLow);
        assert_eq!(priciest[0].name, "Ergonomic Office Chair");
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[{"id": "a", "name": "Stool", "description": "", "price": "10.00",
                 "category": "furniture", "image": "/stool.jpg"}]"#,
        )
        .unwrap();

        let catalog = load(Some(&path)).await.unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load(Some(Path::new("/nonexistent/products.json"))).await;
        assert!(matches!(result, Err(CatalogLoadError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_defaults_to_embedded() {
        assert_eq!(load(None).await.unwrap().len(), 11);
    }
}
