//! Serde helper for the sparse `updatedFrom` map.
//!
//! A key that is absent means "unchanged"; a key that is present holds the
//! previous value, which may itself be `null`. Fields use
//! `Option<Option<T>>` with `#[serde(default, deserialize_with = "prior::deserialize")]`
//! so the two cases stay distinct:
//!
//! - absent key  → `None`
//! - `null`      → `Some(None)`
//! - a value     → `Some(Some(value))`

use serde::{Deserialize, Deserializer};

/// Deserialize a present key into `Some(..)`, keeping an explicit `null`.
pub fn deserialize<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

/// Whether a previous value was recorded and differs from `current`.
///
/// `prior` is the field as read from `updatedFrom`. An absent key never
/// counts as a change, even if it would compare unequal.
#[must_use]
pub fn changed<T: PartialEq + ?Sized>(prior: Option<Option<&T>>, current: Option<&T>) -> bool {
    match prior {
        None => false,
        Some(previous) => previous != current,
    }
}
