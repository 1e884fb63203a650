//! Catalog domain primitives.
//!
//! This crate has zero internal dependencies so the query engine, the tree
//! builder and the slug helpers can be reused by the store, the HTTP layer
//! and any future tooling.

pub mod error;
pub mod query;
pub mod slug;
pub mod tree;
pub mod types;
