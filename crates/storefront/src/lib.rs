//! Vitrine Storefront library.
//!
//! Catalog browsing, the per-session cart, authentication and account
//! settings behind a JSON API. The binary in `main.rs` wires these together;
//! the CLI reuses the row-store and seeding code.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
