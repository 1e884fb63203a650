//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` entity struct as stored by the catalog store
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches

pub mod bulk;
pub mod category;
pub mod product;
pub mod stats;

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use with `#[serde(default, deserialize_with = "...")]`: a missing key
/// stays `None`, `null` becomes `Some(None)`, and a value becomes
/// `Some(Some(v))`.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
