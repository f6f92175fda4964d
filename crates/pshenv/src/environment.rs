//! The environment facade.
//!
//! An [`Environment`] owns one provider and the variable prefix. It is itself
//! a [`Provider`] and a [`PlatformProvider`], so every free accessor in
//! [`vars`](crate::vars) accepts it, and it carries the same accessors as
//! methods.

use std::fmt;
use std::io;
use std::net::{SocketAddr, TcpListener};
#[cfg(unix)]
use std::os::unix::net::UnixListener;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::Error;
use crate::provider::{OsProvider, PlatformProvider, Provider, ProviderError};

/// The address every TCP listener binds to.
const LISTEN_HOST: &str = "127.0.0.1";

/// A provider bound to a variable prefix.
pub struct Environment {
    provider: Box<dyn Provider>,
    prefix: String,
}

impl Environment {
    /// Creates an environment over the process environment.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_provider(prefix, OsProvider::new())
    }

    /// Creates an environment over `provider`.
    pub fn with_provider<P: Provider + 'static>(prefix: impl Into<String>, provider: P) -> Self {
        Self::from_boxed(prefix, Box::new(provider))
    }

    /// Creates an environment over an already boxed provider.
    pub fn from_boxed(prefix: impl Into<String>, provider: Box<dyn Provider>) -> Self {
        Self {
            provider,
            prefix: prefix.into(),
        }
    }

    /// Replaces the provider, returning the previous one.
    pub fn set_provider(&mut self, provider: Box<dyn Provider>) -> Box<dyn Provider> {
        std::mem::replace(&mut self.provider, provider)
    }

    /// Returns the provider.
    #[must_use]
    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    /// Returns the provider mutably.
    pub fn provider_mut(&mut self) -> &mut dyn Provider {
        self.provider.as_mut()
    }

    /// Returns the prefix, e.g. `PLATFORM_`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Reads one entry of the decoded project variables.
    #[must_use]
    pub fn variable(&self, key: &str) -> Option<Value> {
        self.lookup_variables()?.remove(key)
    }

    /// Binds the listener the platform expects the application to serve on.
    ///
    /// `SOCKET` wins over `PORT`. A socket path binds a Unix domain socket; a
    /// port binds TCP on `127.0.0.1`.
    ///
    /// # Errors
    ///
    /// - [`Error::NoListener`] when neither variable is set
    /// - [`Error::InvalidPort`] when `PORT` is not a port number
    /// - [`Error::UnsupportedSocket`] when `SOCKET` is set on a non-Unix target
    /// - [`Error::Bind`] when the OS refuses the address
    pub fn listener(&self) -> Result<Listener, Error> {
        if let Some(path) = self.lookup_socket() {
            tracing::debug!(socket = %path, "binding unix listener");
            return bind_unix(path);
        }

        if let Some(port) = self.lookup_port() {
            let number: u16 = port.trim().parse().map_err(|source| Error::InvalidPort {
                value: port.clone(),
                source,
            })?;
            let address = format!("{LISTEN_HOST}:{number}");
            tracing::debug!(%address, "binding tcp listener");
            return TcpListener::bind(&address)
                .map(Listener::Tcp)
                .map_err(|source| Error::Bind {
                    address: format!("tcp://{address}"),
                    source,
                });
        }

        Err(Error::NoListener)
    }
}

#[cfg(unix)]
fn bind_unix(path: String) -> Result<Listener, Error> {
    UnixListener::bind(&path)
        .map(Listener::Unix)
        .map_err(|source| Error::Bind {
            address: format!("unix:{path}"),
            source,
        })
}

#[cfg(not(unix))]
fn bind_unix(path: String) -> Result<Listener, Error> {
    Err(Error::UnsupportedSocket { path })
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("prefix", &self.prefix)
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl Default for Environment {
    /// The process environment with the `PLATFORM_` prefix.
    fn default() -> Self {
        Self::new("PLATFORM_")
    }
}

impl Provider for Environment {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.provider.lookup(key)
    }

    fn environ(&self) -> Vec<String> {
        self.provider.environ()
    }

    fn set_env(&mut self, key: &str, value: &str) -> Result<(), ProviderError> {
        self.provider.set_env(key, value)
    }

    fn unset_env(&mut self, key: &str) -> Result<(), ProviderError> {
        self.provider.unset_env(key)
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.provider.entries()
    }
}

impl PlatformProvider for Environment {
    fn prefix(&self) -> &str {
        &self.prefix
    }
}

// ============================================================================
// Listeners
// ============================================================================

/// A bound listener socket.
#[derive(Debug)]
pub enum Listener {
    /// TCP on the loopback interface.
    Tcp(TcpListener),
    /// A Unix domain socket.
    #[cfg(unix)]
    Unix(UnixListener),
}

impl Listener {
    /// Returns the bound address.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the socket cannot report its address.
    pub fn local_addr(&self) -> io::Result<ListenAddr> {
        match self {
            Self::Tcp(listener) => listener.local_addr().map(ListenAddr::Tcp),
            #[cfg(unix)]
            Self::Unix(listener) => {
                let addr = listener.local_addr()?;
                Ok(ListenAddr::Unix(
                    addr.as_pathname().map(PathBuf::from).unwrap_or_default(),
                ))
            }
        }
    }
}

/// The address a [`Listener`] is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddr {
    /// A TCP socket address.
    Tcp(SocketAddr),
    /// A Unix socket path; empty for unnamed sockets.
    Unix(PathBuf),
}

impl fmt::Display for ListenAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(addr) => write!(f, "tcp://{addr}"),
            Self::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}
