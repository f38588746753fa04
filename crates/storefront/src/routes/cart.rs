//! Cart route handlers.
//!
//! The cart ledger is stored in the session under `cart`, so every client
//! has its own cart whether or not it is signed in.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use vitrine_core::{CartLedger, Price, Product, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::services::storage::StorageError;
use crate::state::AppState;

/// Cart contents as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<Product>,
    pub count: usize,
    pub total: Price,
    /// `total` formatted for display, e.g. `$54.98`.
    pub total_display: String,
}

impl From<&CartLedger> for CartView {
    fn from(cart: &CartLedger) -> Self {
        let total = cart.total();
        Self {
            items: cart.entries().to_vec(),
            count: cart.len(),
            total,
            total_display: total.to_string(),
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    #[serde(alias = "productId")]
    pub product_id: ProductId,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_cart(session: &Session) -> Result<CartLedger> {
    Ok(session
        .get::<CartLedger>(session_keys::CART)
        .await
        .map_err(StorageError::from)?
        .unwrap_or_default())
}

async fn save_cart(session: &Session, cart: &CartLedger) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(StorageError::from)?;
    Ok(())
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a catalog product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCart>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .get(&body.product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let mut cart = load_cart(&session).await?;
    cart.add(product);
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", &[("product_id", body.product_id.as_str())]);
    tracing::debug!(product_id = %body.product_id, count = cart.len(), "added to cart");

    Ok(Json(CartView::from(&cart)))
}

/// Remove every entry for a product. Unknown ids are ignored.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    let removed = cart.remove(&ProductId::new(product_id));
    if removed > 0 {
        save_cart(&session, &cart).await?;
    }

    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}
