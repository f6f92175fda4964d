//! In-memory provider.

use std::collections::BTreeMap;
use std::collections::btree_map;

use super::{Provider, ProviderError};

/// Provider backed by an owned, ordered map.
///
/// Used for `.env` contents, test fixtures and point-in-time snapshots of
/// other providers. Because the map is ordered, [`environ`](Provider::environ)
/// is sorted by key.
///
/// # Example
///
/// ```rust,ignore
/// use pshenv::{MapProvider, Provider};
///
/// let map: MapProvider = [("PORT", "8080")].into_iter().collect();
/// assert_eq!(map.get_env("PORT"), "8080");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapProvider(BTreeMap<String, String>);

impl MapProvider {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows a value without cloning it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Borrows the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// Consumes the provider, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl Provider for MapProvider {
    fn name(&self) -> &'static str {
        "map"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        tracing::trace!(key, "MapProvider::lookup");
        self.0.get(key).cloned()
    }

    fn environ(&self) -> Vec<String> {
        tracing::trace!("MapProvider::environ");
        self.0.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn set_env(&mut self, key: &str, value: &str) -> Result<(), ProviderError> {
        tracing::trace!(key, value, "MapProvider::set_env");
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn unset_env(&mut self, key: &str) -> Result<(), ProviderError> {
        tracing::trace!(key, "MapProvider::unset_env");
        self.0.remove(key);
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for MapProvider
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for MapProvider {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<std::collections::HashMap<String, String>> for MapProvider {
    fn from(map: std::collections::HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MapProvider {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MapProvider {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
