//! Session-related types.
//!
//! Types stored in, or derived from, session storage.

use serde::Serialize;

use super::user::User;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the signed-in user snapshot.
    pub const USER: &str = "user";

    /// Key for the cart ledger.
    pub const CART: &str = "cart";
}

/// Public view of the session state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}
