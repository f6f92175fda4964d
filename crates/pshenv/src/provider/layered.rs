//! Ordered composition of providers.
//!
//! Layers are stored highest priority first. The resolution rules:
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `lookup` | First layer holding the key wins |
//! | `environ` | Every distinct key once, value from the highest layer defining it |
//! | `set_env` | First layer only; fails with [`ProviderError::NoLayers`] when empty |
//! | `unset_env` | Every layer; all failures are reported together |
//!
//! Only the configured layers are consulted. An empty stack resolves
//! nothing, it never falls back to the process environment.

use std::collections::BTreeMap;
use std::fmt;

use super::{Provider, ProviderError};

/// A stack of providers resolved in priority order.
///
/// # Example
///
/// ```rust,ignore
/// use pshenv::{LayeredProvider, MapProvider, OsProvider, Provider};
///
/// let overrides: MapProvider = [("PORT", "9000")].into_iter().collect();
/// let layers = LayeredProvider::new(vec![Box::new(overrides), Box::new(OsProvider)]);
/// assert_eq!(layers.get_env("PORT"), "9000");
/// ```
#[derive(Default)]
pub struct LayeredProvider {
    layers: Vec<Box<dyn Provider>>,
}

impl LayeredProvider {
    /// Creates a stack from layers ordered highest priority first.
    #[must_use]
    pub fn new(layers: Vec<Box<dyn Provider>>) -> Self {
        Self { layers }
    }

    /// Prepends a new highest-priority layer.
    pub fn push(&mut self, provider: Box<dyn Provider>) {
        tracing::trace!(provider = provider.name(), "LayeredProvider::push");
        self.layers.insert(0, provider);
    }

    /// Removes and returns the highest-priority layer, or `None` when empty.
    pub fn pop(&mut self) -> Option<Box<dyn Provider>> {
        tracing::trace!("LayeredProvider::pop");
        if self.layers.is_empty() {
            None
        } else {
            Some(self.layers.remove(0))
        }
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` when there are no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Borrows the layers, highest priority first.
    #[must_use]
    pub fn layers(&self) -> &[Box<dyn Provider>] {
        &self.layers
    }

    /// Runs `f` on each layer in priority order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error `f` produced.
    pub fn for_each<E, F>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&mut dyn Provider) -> Result<(), E>,
    {
        for layer in &mut self.layers {
            f(layer.as_mut())?;
        }
        Ok(())
    }

    /// Runs `f` on each layer in priority order until one succeeds.
    ///
    /// Returns `Ok` with that layer's value. If every layer fails, all the
    /// errors are returned in layer order (empty for an empty stack).
    ///
    /// # Errors
    ///
    /// Returns every error when no layer succeeded.
    pub fn first<T, E, F>(&mut self, mut f: F) -> Result<T, Vec<E>>
    where
        F: FnMut(&mut dyn Provider) -> Result<T, E>,
    {
        let mut errors = Vec::new();
        for layer in &mut self.layers {
            match f(layer.as_mut()) {
                Ok(value) => return Ok(value),
                Err(err) => errors.push(err),
            }
        }
        Err(errors)
    }
}

impl fmt::Debug for LayeredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.layers.iter().map(|layer| layer.name()))
            .finish()
    }
}

impl From<Vec<Box<dyn Provider>>> for LayeredProvider {
    fn from(layers: Vec<Box<dyn Provider>>) -> Self {
        Self::new(layers)
    }
}

impl Provider for LayeredProvider {
    fn name(&self) -> &'static str {
        "layered"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        tracing::trace!(key, "LayeredProvider::lookup");
        self.layers.iter().find_map(|layer| layer.lookup(key))
    }

    fn environ(&self) -> Vec<String> {
        tracing::trace!("LayeredProvider::environ");
        self.entries()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }

    fn entries(&self) -> Vec<(String, String)> {
        // Lowest priority first, so higher layers overwrite.
        let mut merged = BTreeMap::new();
        for layer in self.layers.iter().rev() {
            merged.extend(layer.entries());
        }
        merged.into_iter().collect()
    }

    fn set_env(&mut self, key: &str, value: &str) -> Result<(), ProviderError> {
        tracing::trace!(key, value, "LayeredProvider::set_env");
        let first = self.layers.first_mut().ok_or(ProviderError::NoLayers)?;
        first.set_env(key, value)
    }

    fn unset_env(&mut self, key: &str) -> Result<(), ProviderError> {
        tracing::trace!(key, "LayeredProvider::unset_env");
        let errors: Vec<ProviderError> = self
            .layers
            .iter_mut()
            .filter_map(|layer| layer.unset_env(key).err())
            .collect();
        ProviderError::multiple(errors).map_or(Ok(()), Err)
    }
}
