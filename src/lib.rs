//! Casdoor-protected REST resource server.
//!
//! Verifies Casdoor bearer tokens, resolves the caller into an
//! [`Identity`](services::auth::Identity) and serves typed MongoDB entities
//! through generic CRUD controllers with row-level ownership.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
