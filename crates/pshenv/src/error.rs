//! Crate-level error type.
//!
//! Lower layers keep their own error enums ([`CodecError`],
//! [`ProviderError`], [`DecodeError`](crate::DecodeError)); [`Error`] is what
//! the [`Environment`](crate::Environment) facade and the relationship
//! helpers return, wrapping the lower layers transparently.
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`Error::NoListener`] | Neither `SOCKET` nor `PORT` is set |
//! | [`Error::InvalidPort`] | `PORT` is not a valid port number |
//! | [`Error::Bind`] | The OS refused to bind the listener |
//! | [`Error::Relationship`] | A relationship is missing or unusable |
//! | [`Error::Provider`] | A provider mutation failed |
//! | [`Error::Codec`] | A scalar value failed to encode or decode |

use std::io;
use std::num::ParseIntError;

use miette::Diagnostic;
use thiserror::Error as ThisError;

use crate::codec::CodecError;
use crate::provider::ProviderError;

/// Errors surfaced by the environment facade.
#[derive(Debug, ThisError, Diagnostic)]
pub enum Error {
    /// Neither listener variable resolved.
    #[error("found neither SOCKET nor PORT")]
    #[diagnostic(
        code(pshenv::no_listener),
        help("set SOCKET to a unix socket path or PORT to a TCP port")
    )]
    NoListener,

    /// `PORT` was set but is not a port number.
    #[error("invalid PORT {value:?}")]
    #[diagnostic(code(pshenv::invalid_port), help("PORT must be an integer in 0..=65535"))]
    InvalidPort {
        /// The raw variable value.
        value: String,
        /// The integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// Binding the listener socket failed.
    #[error("unable to bind {address}")]
    #[diagnostic(code(pshenv::bind))]
    Bind {
        /// The address (`tcp://host:port` or `unix:path`) that was attempted.
        address: String,
        /// The OS error.
        #[source]
        source: io::Error,
    },

    /// Unix domain sockets are not available on this platform.
    #[error("unix sockets are not supported on this platform (SOCKET={path:?})")]
    #[diagnostic(code(pshenv::unsupported_socket), help("unset SOCKET and use PORT instead"))]
    UnsupportedSocket {
        /// The requested socket path.
        path: String,
    },

    /// A named relationship is missing or has no usable entry.
    #[error("relationship '{name}': {reason}")]
    #[diagnostic(code(pshenv::relationship))]
    Relationship {
        /// Relationship name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A provider operation failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Provider(#[from] ProviderError),

    /// A scalar value failed to encode or decode.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Codec(#[from] CodecError),
}

impl Error {
    /// Creates a relationship error.
    pub fn relationship(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Relationship {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_listener_message() {
        assert_eq!(Error::NoListener.to_string(), "found neither SOCKET nor PORT");
    }

    #[test]
    fn test_relationship_message() {
        let err = Error::relationship("database", "missing relationship");
        assert_eq!(err.to_string(), "relationship 'database': missing relationship");
    }

    #[test]
    fn test_codec_is_transparent() {
        let err = Error::from(CodecError::InvalidPem);
        assert_eq!(err.to_string(), "invalid PEM data");
    }
}
