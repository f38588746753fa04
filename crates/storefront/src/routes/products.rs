//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use vitrine_core::{CategoryFilter, Product, ProductId, SortKey};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Browse query parameters.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// A browse result.
#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub category: CategoryFilter,
    pub sort: SortKey,
    pub count: usize,
    pub products: Vec<Product>,
}

/// One entry of the sort dropdown.
#[derive(Debug, Serialize)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Filter bar contents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    /// `all` followed by every category in catalog order.
    pub categories: Vec<String>,
    pub sort_options: Vec<SortOption>,
}

/// Browse the catalog.
///
/// Missing parameters mean `all` and `featured`.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<BrowseResponse>> {
    let filter = query
        .category
        .filter(|c| !c.is_empty())
        .map_or(CategoryFilter::All, CategoryFilter::from);

    let sort = match query.sort.as_deref() {
        None | Some("") => SortKey::default(),
        Some(raw) => raw
            .parse::<SortKey>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
    };

    let products: Vec<Product> = state
        .catalog()
        .browse(&filter, sort)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(BrowseResponse {
        count: products.len(),
        category: filter,
        sort,
        products,
    }))
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    state
        .catalog()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// List categories and sort options for the filter bar.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let categories = std::iter::once(CategoryFilter::ALL)
        .chain(state.catalog().categories())
        .map(str::to_owned)
        .collect();

    Json(CategoriesResponse {
        categories,
        sort_options: SortKey::ALL
            .into_iter()
            .map(|key| SortOption {
                value: key.as_str(),
                label: key.label(),
            })
            .collect(),
    })
}
