//! Provider abstraction over named string variables.
//!
//! A [`Provider`] is the capability set every backing store offers: read a
//! key, snapshot everything, and mutate. The platform accessors only ever
//! talk to this trait, so the same code runs against the real process
//! environment, a parsed `.env` file, or a stack of both.
//!
//! # Built-in Providers
//!
//! | Provider | Backing store | Mutation |
//! |----------|---------------|----------|
//! | [`OsProvider`] | The process environment | Process-wide, unsynchronized |
//! | [`MapProvider`] | An owned `BTreeMap` | Local to the value |
//! | [`LayeredProvider`] | An ordered stack of providers | `set_env`: first layer; `unset_env`: every layer |
//!
//! # Custom Providers
//!
//! ```rust,ignore
//! use pshenv::provider::{Provider, ProviderError};
//!
//! struct Frozen(Vec<(String, String)>);
//!
//! impl Provider for Frozen {
//!     fn name(&self) -> &str { "frozen" }
//!
//!     fn lookup(&self, key: &str) -> Option<String> {
//!         self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
//!     }
//!
//!     fn environ(&self) -> Vec<String> {
//!         self.0.iter().map(|(k, v)| format!("{k}={v}")).collect()
//!     }
//!
//!     fn set_env(&mut self, key: &str, _: &str) -> Result<(), ProviderError> {
//!         Err(ProviderError::invalid_key(self.name(), key, "read-only"))
//!     }
//!
//!     fn unset_env(&mut self, key: &str) -> Result<(), ProviderError> {
//!         Err(ProviderError::invalid_key(self.name(), key, "read-only"))
//!     }
//! }
//! ```

#[cfg(feature = "dotenv")]
mod dotenv;
mod layered;
mod map;
mod os;

pub use layered::LayeredProvider;
pub use map::MapProvider;
pub use os::OsProvider;

use miette::Diagnostic;
use thiserror::Error as ThisError;

// ============================================================================
// Provider Errors
// ============================================================================

/// Errors that can occur during provider operations.
#[derive(Debug, ThisError, Diagnostic)]
pub enum ProviderError {
    /// The key cannot be stored by this provider.
    #[error("invalid key {key:?} for provider '{provider}': {reason}")]
    #[diagnostic(code(pshenv::provider::invalid_key))]
    InvalidKey {
        /// The provider name.
        provider: String,
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The value cannot be stored by this provider.
    #[error("invalid value for {key:?} in provider '{provider}': {reason}")]
    #[diagnostic(code(pshenv::provider::invalid_value))]
    InvalidValue {
        /// The provider name.
        provider: String,
        /// The key being written.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A write was attempted on a layered provider with no layers.
    #[error("layered provider has no layers")]
    #[diagnostic(
        code(pshenv::provider::no_layers),
        help("push at least one provider before writing")
    )]
    NoLayers,

    /// Parsing `.env` content failed.
    #[cfg(feature = "dotenv")]
    #[error("failed to parse dotenv input")]
    #[diagnostic(code(pshenv::provider::dotenv))]
    Dotenv(#[source] dotenvy::Error),

    /// More than one layer failed.
    #[error("{} providers failed", .errors.len())]
    #[diagnostic(code(pshenv::provider::multiple))]
    Multiple {
        /// Every underlying failure, in layer order.
        #[related]
        errors: Vec<ProviderError>,
    },
}

impl ProviderError {
    /// Creates an [`ProviderError::InvalidKey`] error.
    pub fn invalid_key(
        provider: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidKey {
            provider: provider.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`ProviderError::InvalidValue`] error.
    pub fn invalid_value(
        provider: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            provider: provider.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Collapses a list of failures: `None` when empty, the error itself
    /// when single, [`ProviderError::Multiple`] otherwise.
    #[must_use]
    pub fn multiple(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple { errors }),
        }
    }
}

// ============================================================================
// Provider Traits
// ============================================================================

/// Read, snapshot and mutate access to a set of named string variables.
///
/// Object safe; stacks hold `Box<dyn Provider>`.
pub trait Provider: Send + Sync {
    /// Returns the provider's name for log fields and errors.
    fn name(&self) -> &str;

    /// Looks a key up. `None` means absent; an empty string is a value.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Returns every entry as `KEY=VALUE`.
    fn environ(&self) -> Vec<String>;

    /// Stores a value.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider rejects the key or value.
    fn set_env(&mut self, key: &str, value: &str) -> Result<(), ProviderError>;

    /// Removes a key. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider rejects the key.
    fn unset_env(&mut self, key: &str) -> Result<(), ProviderError>;

    /// Looks a key up, returning an empty string when absent.
    fn get_env(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }

    /// Returns every entry as a key/value pair.
    ///
    /// The default re-parses [`Provider::environ`], which cannot represent
    /// keys containing `=`; providers that store such keys override it.
    fn entries(&self) -> Vec<(String, String)> {
        parse_environ(self.environ()).into_iter().collect()
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }

    fn environ(&self) -> Vec<String> {
        (**self).environ()
    }

    fn set_env(&mut self, key: &str, value: &str) -> Result<(), ProviderError> {
        (**self).set_env(key, value)
    }

    fn unset_env(&mut self, key: &str) -> Result<(), ProviderError> {
        (**self).unset_env(key)
    }

    fn get_env(&self, key: &str) -> String {
        (**self).get_env(key)
    }

    fn entries(&self) -> Vec<(String, String)> {
        (**self).entries()
    }
}

/// A provider that also knows the prefix platform variables are namespaced
/// under (`PLATFORM_` by default on the platform).
pub trait PlatformProvider: Provider {
    /// The prefix prepended to prefixed variable names.
    fn prefix(&self) -> &str;
}

// ============================================================================
// Snapshots
// ============================================================================

/// Parses `KEY=VALUE` lines into a map. Later duplicates win.
///
/// Each line is split at its first `=`; lines without one are skipped.
/// Values are taken verbatim, so this is safe for arbitrary process
/// environment contents (unlike `.env` parsing, which interprets quotes).
pub fn parse_environ<I, S>(lines: I) -> MapProvider
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref();
            let parsed = line.split_once('=');
            if parsed.is_none() {
                tracing::debug!(line, "skipping environ entry without '='");
            }
            parsed.map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect()
}

/// Snapshots any provider into an independent [`MapProvider`].
pub fn clone_provider<P: Provider + ?Sized>(provider: &P) -> MapProvider {
    tracing::trace!(provider = provider.name(), "clone_provider");
    provider.entries().into_iter().collect()
}
