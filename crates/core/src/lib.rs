//! Vitrine Core - Catalog, cart and shared domain types.
//!
//! This crate provides the storefront domain used by every Vitrine component:
//! - `storefront` - HTTP API, session state and authentication
//! - `cli` - Command-line tools for migrations, seeding and catalog browsing
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. The catalog is immutable once loaded; the cart is
//! a plain value owned by whoever drives it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and emails
//! - [`product`] - The product record
//! - [`catalog`] - The catalog and its filter/sort engine
//! - [`cart`] - The cart ledger

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod product;
pub mod types;

pub use cart::CartLedger;
pub use catalog::{Catalog, CatalogError, CategoryFilter, SortKey};
pub use product::Product;
pub use types::*;
