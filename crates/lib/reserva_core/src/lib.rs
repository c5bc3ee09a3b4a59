//! # reserva_core
//!
//! Client library for the Reserva sports-facility booking backend.
//!
//! The backend owns all business rules. This crate covers the client side:
//! token persistence, session claims, the REST calls, per-screen form
//! validation and the decision of which screens are reachable.

pub mod auth;
pub mod client;
pub mod config;
pub mod forms;
pub mod messages;
pub mod models;
pub mod shell;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
