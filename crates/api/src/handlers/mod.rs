//! Request handlers for the catalog API.
//!
//! Each submodule provides async handler functions for a single entity type.
//! Handlers normalize raw input, delegate to the corresponding repository in
//! `storefront_db` and map errors via [`AppError`](crate::error::AppError).

pub mod categories;
pub mod products;
