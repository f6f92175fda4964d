//! Text codecs for the scalar values embedded in platform payloads.
//!
//! Every scalar implements [`TextCodec`], a symmetric encode/decode pair over
//! UTF-8 text. `Display`, `FromStr` and the serde impls are all built on top
//! of it, so a value written into JSON always reads back identically.
//!
//! | Type | Text form |
//! |------|-----------|
//! | [`Duration`] | Elapsed time, `"3m0s"`, `"1.5s"`, `"300ms"` |
//! | [`TlsVersion`] | `"TLSv1.0"` … `"TLSv1.4"` |
//! | [`Certificate`] | A single `CERTIFICATE` PEM block, optionally percent-encoded |
//! | [`ClientCertificateAuthority`] | A single `CERTIFICATE` PEM block |
//! | generated enums | The wire name declared on each variant |

mod certificate;
mod duration;
mod enums;
pub mod pem;
mod tls_version;

pub use certificate::{Certificate, ClientCertificateAuthority};
pub use duration::Duration;
pub use enums::{
    AccessLevel, AccessType, ApplicationMount, ServiceSize, SocketFamily, SocketProtocol,
};
pub use tls_version::TlsVersion;

use std::string::FromUtf8Error;

use miette::Diagnostic;
use openssl::error::ErrorStack;
use thiserror::Error as ThisError;

/// A value with a canonical text encoding.
pub trait TextCodec: Sized {
    /// Encodes the value.
    ///
    /// # Errors
    ///
    /// Returns an error when the value has no encoding (for example an
    /// enumeration index outside its named set).
    fn marshal_text(&self) -> Result<String, CodecError>;

    /// Decodes a value from text.
    ///
    /// # Errors
    ///
    /// Returns an error when `text` is not a valid encoding.
    fn unmarshal_text(text: &str) -> Result<Self, CodecError>;
}

/// Errors produced while encoding or decoding scalar values.
#[derive(Debug, ThisError, Diagnostic)]
pub enum CodecError {
    /// Reverse lookup of an enumeration name failed.
    #[error("unknown {type_name} name {name:?}")]
    #[diagnostic(code(pshenv::codec::unknown_name))]
    UnknownName {
        /// The enumeration type.
        type_name: &'static str,
        /// The name that did not match.
        name: String,
    },

    /// An enumeration value outside its named set cannot be encoded.
    ///
    /// The message is exactly the value's `Display` fallback.
    #[error("{message}")]
    #[diagnostic(code(pshenv::codec::unknown_value))]
    UnknownValue {
        /// The fallback rendering of the value.
        message: String,
    },

    /// No PEM block was found in the input.
    #[error("invalid PEM data")]
    #[diagnostic(
        code(pshenv::codec::invalid_pem),
        help("expected a -----BEGIN CERTIFICATE----- block")
    )]
    InvalidPem,

    /// Bytes remained after the first PEM block.
    #[error("excess data after decoding the PEM block ({len} bytes)")]
    #[diagnostic(
        code(pshenv::codec::trailing_data),
        help("exactly one PEM block is accepted")
    )]
    TrailingData {
        /// Number of trailing bytes.
        len: usize,
    },

    /// Percent-encoded input has a malformed escape or does not decode to
    /// UTF-8.
    #[error("error decoding path escaping")]
    #[diagnostic(
        code(pshenv::codec::percent_encoding),
        help("every '%' must be followed by two hex digits")
    )]
    PercentEncoding {
        /// The malformed escape, e.g. `%zz`, when that was the failure.
        escape: Option<String>,
        /// The UTF-8 failure, when the escapes were well formed.
        #[source]
        source: Option<FromUtf8Error>,
    },

    /// The PEM payload is not a DER encoded X.509 certificate.
    #[error("invalid certificate")]
    #[diagnostic(code(pshenv::codec::certificate))]
    Certificate(#[source] ErrorStack),

    /// Malformed duration text.
    #[error("time: {reason} {text:?}")]
    #[diagnostic(
        code(pshenv::codec::duration),
        help("durations look like \"300ms\", \"1.5h\" or \"2h45m\"")
    )]
    Duration {
        /// The input text.
        text: String,
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl CodecError {
    /// Creates an [`CodecError::UnknownName`] error.
    pub fn unknown_name(type_name: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownName {
            type_name,
            name: name.into(),
        }
    }

    /// Creates an [`CodecError::UnknownValue`] error.
    pub fn unknown_value(message: impl Into<String>) -> Self {
        Self::UnknownValue {
            message: message.into(),
        }
    }

    pub(crate) fn duration(text: &str, reason: &'static str) -> Self {
        Self::Duration {
            text: text.to_string(),
            reason,
        }
    }
}

/// Implements `Serialize`/`Deserialize` as strings through [`TextCodec`].
macro_rules! serde_via_text {
    ($ty:ty) => {
        impl ::serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                let text = $crate::codec::TextCodec::marshal_text(self)
                    .map_err(<S::Error as ::serde::ser::Error>::custom)?;
                serializer.serialize_str(&text)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let text = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::codec::TextCodec>::unmarshal_text(&text)
                    .map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    };
}

pub(crate) use serde_via_text;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_quotes_input() {
        let err = CodecError::unknown_name("TLSVersion", "SSLv3");
        assert_eq!(err.to_string(), "unknown TLSVersion name \"SSLv3\"");
    }

    #[test]
    fn test_unknown_value_is_verbatim() {
        let err = CodecError::unknown_value("unknown TLSVersion 0x0300");
        assert_eq!(err.to_string(), "unknown TLSVersion 0x0300");
    }
}
