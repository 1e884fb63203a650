//! Storefront catalog API server library.
//!
//! Exposes the core building blocks (config, state, error handling,
//! extractors, routes) so integration tests and the binary entrypoint can
//! both access them.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
