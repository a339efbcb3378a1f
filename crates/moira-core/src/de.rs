//! Serde helpers for payloads produced by older API versions.

use serde::{Deserialize, Deserializer};

/// Deserializes `null` as `T::default()`.
///
/// Combine with `#[serde(default)]` so that a missing field is also defaulted.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Distinguishes an explicit `null` from an absent field in patch payloads.
///
/// Absent → `None` (via `#[serde(default)]`), `null` → `Some(None)`,
/// value → `Some(Some(v))`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
