//! Domain models for storefront.
//!
//! - [`user`] - Accounts as seen by the session and as stored in the row-store
//! - [`session`] - Keys and views for session-scoped data

pub mod session;
pub mod user;

pub use session::{SessionView, keys as session_keys};
pub use user::{NewUser, User, UserRecord, UserUpdate};
