//! The product record.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A purchasable product.
///
/// Products are immutable once the catalog is loaded. Optional attributes are
/// omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier, unique within the catalog.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Category label (e.g. `furniture`, `electronics`, `clothes`).
    pub category: String,
    /// Image URL or path.
    pub image: String,
    /// Available color labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    /// Available size labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    /// 3D model file for the object viewer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Mannequin model used by the clothing styler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mannequin: Option<String>,
}

impl Product {
    /// Whether the product can be previewed in 3D.
    #[must_use]
    pub const fn has_model(&self) -> bool {
        self.model.is_some()
    }
}
