//! Process environment provider.

use std::env;
use std::ffi::OsString;

use super::{Provider, ProviderError};

/// Provider backed by the process environment.
///
/// Reads go straight to [`std::env`]. Writes change the environment of the
/// whole process and are not synchronized; callers that mutate from several
/// threads must serialize those calls themselves.
///
/// Entries that are not valid UTF-8 are invisible: [`lookup`](Provider::lookup)
/// reports them absent and [`environ`](Provider::environ) skips them.
///
/// # Example
///
/// ```rust,ignore
/// use pshenv::{OsProvider, Provider};
///
/// let os = OsProvider;
/// let home = os.get_env("HOME");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OsProvider;

impl OsProvider {
    /// Creates a process environment provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Rejects keys `set_var`/`remove_var` would panic on.
    fn validate_key(key: &str) -> Result<(), ProviderError> {
        let reason = if key.is_empty() {
            "key is empty"
        } else if key.contains('=') {
            "key contains '='"
        } else if key.contains('\0') {
            "key contains a NUL byte"
        } else {
            return Ok(());
        };
        Err(ProviderError::invalid_key("os", key, reason))
    }

    fn validate_value(key: &str, value: &str) -> Result<(), ProviderError> {
        if value.contains('\0') {
            return Err(ProviderError::invalid_value(
                "os",
                key,
                "value contains a NUL byte",
            ));
        }
        Ok(())
    }
}

impl Provider for OsProvider {
    fn name(&self) -> &'static str {
        "os"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        tracing::trace!(key, "OsProvider::lookup");
        match env::var(key) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                tracing::debug!(key, "environment variable is not valid UTF-8");
                None
            }
        }
    }

    fn environ(&self) -> Vec<String> {
        tracing::trace!("OsProvider::environ");
        self.entries()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }

    fn entries(&self) -> Vec<(String, String)> {
        env::vars_os()
            .filter_map(|(key, value): (OsString, OsString)| {
                match (key.into_string(), value.into_string()) {
                    (Ok(key), Ok(value)) => Some((key, value)),
                    (key, _) => {
                        tracing::debug!(key = ?key, "skipping non UTF-8 environment entry");
                        None
                    }
                }
            })
            .collect()
    }

    fn set_env(&mut self, key: &str, value: &str) -> Result<(), ProviderError> {
        tracing::trace!(key, value, "OsProvider::set_env");
        Self::validate_key(key)?;
        Self::validate_value(key, value)?;

        // SAFETY: the key and value were checked above, so set_var cannot
        // panic. Concurrent access from other threads is the caller's
        // responsibility, as documented on the type.
        unsafe {
            env::set_var(key, value);
        }
        Ok(())
    }

    fn unset_env(&mut self, key: &str) -> Result<(), ProviderError> {
        tracing::trace!(key, "OsProvider::unset_env");
        Self::validate_key(key)?;

        // SAFETY: see set_env.
        unsafe {
            env::remove_var(key);
        }
        Ok(())
    }
}
