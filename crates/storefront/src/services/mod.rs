//! Business logic services.
//!
//! - [`auth`] - Credential checks, signup and account updates against the row-store
//! - [`session`] - The per-client session state machine
//! - [`storage`] - Durable key/value storage for the session snapshot
//! - [`account`] - Account settings form handling
//! - [`validation`] - Field rules shared by the forms

pub mod account;
pub mod auth;
pub mod session;
pub mod storage;
pub mod validation;
