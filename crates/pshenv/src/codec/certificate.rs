//! X.509 certificates carried as PEM text.
//!
//! [`Certificate`] is what the platform injects as `X_CLIENT_CERT`; the
//! front proxy percent-encodes it, so text containing `%20` is unescaped
//! before the PEM block is located. [`ClientCertificateAuthority`] comes
//! from route TLS settings and is always plain PEM.

use std::fmt;

use openssl::x509::{X509, X509Ref};

use super::{CodecError, TextCodec, pem, serde_via_text};

const LABEL: &str = "CERTIFICATE";

/// Decodes exactly one PEM block and parses its payload as DER.
fn parse_single_pem(text: &str) -> Result<(X509, Vec<u8>), CodecError> {
    let (block, rest) = pem::decode(text).ok_or(CodecError::InvalidPem)?;
    if !rest.is_empty() {
        return Err(CodecError::TrailingData { len: rest.len() });
    }
    let x509 = X509::from_der(&block.contents).map_err(CodecError::Certificate)?;
    Ok((x509, block.contents))
}

macro_rules! certificate_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            x509: X509,
            der: Vec<u8>,
        }

        impl $name {
            /// Parses a DER encoded certificate.
            ///
            /// # Errors
            ///
            /// Returns [`CodecError::Certificate`] when `der` is not a
            /// certificate.
            pub fn from_der(der: &[u8]) -> Result<Self, CodecError> {
                let x509 = X509::from_der(der).map_err(CodecError::Certificate)?;
                Ok(Self {
                    x509,
                    der: der.to_vec(),
                })
            }

            /// The parsed certificate.
            #[must_use]
            pub fn x509(&self) -> &X509Ref {
                &self.x509
            }

            /// The raw DER bytes exactly as received.
            #[must_use]
            pub fn der(&self) -> &[u8] {
                &self.der
            }

            /// Encodes as a `CERTIFICATE` PEM block.
            #[must_use]
            pub fn to_pem(&self) -> String {
                pem::encode(LABEL, &self.der)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.der == other.der
            }
        }

        impl Eq for $name {}

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("subject", self.x509.subject_name())
                    .field("der_len", &self.der.len())
                    .finish()
            }
        }

        impl From<X509> for $name {
            /// Re-encodes the certificate to DER; falls back to an empty
            /// buffer if OpenSSL cannot serialize it.
            fn from(x509: X509) -> Self {
                let der = x509.to_der().unwrap_or_default();
                Self { x509, der }
            }
        }

        serde_via_text!($name);
    };
}

certificate_type! {
    /// A client certificate forwarded by the platform's TLS terminator.
    Certificate
}

certificate_type! {
    /// A certificate authority accepted for client certificate
    /// authentication on a route.
    ClientCertificateAuthority
}

/// Rejects `%` not followed by two hex digits; the decoder would pass those
/// through unchanged.
fn check_escapes(text: &str) -> Result<(), CodecError> {
    let bytes = text.as_bytes();
    for (i, _) in text.match_indices('%') {
        let well_formed = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            let end = (i + 3).min(bytes.len());
            return Err(CodecError::PercentEncoding {
                escape: Some(String::from_utf8_lossy(&bytes[i..end]).into_owned()),
                source: None,
            });
        }
    }
    Ok(())
}

impl TextCodec for Certificate {
    fn marshal_text(&self) -> Result<String, CodecError> {
        tracing::trace!("Certificate::marshal_text");
        Ok(self.to_pem())
    }

    fn unmarshal_text(text: &str) -> Result<Self, CodecError> {
        tracing::trace!("Certificate::unmarshal_text");
        let decoded;
        let text = if text.contains("%20") {
            tracing::debug!(text, "detected percent encoding");
            check_escapes(text)?;
            decoded = urlencoding::decode(text).map_err(|source| CodecError::PercentEncoding {
                escape: None,
                source: Some(source),
            })?;
            decoded.as_ref()
        } else {
            text
        };

        let (x509, der) = parse_single_pem(text)?;
        Ok(Self { x509, der })
    }
}

impl TextCodec for ClientCertificateAuthority {
    fn marshal_text(&self) -> Result<String, CodecError> {
        tracing::trace!("ClientCertificateAuthority::marshal_text");
        Ok(self.to_pem())
    }

    fn unmarshal_text(text: &str) -> Result<Self, CodecError> {
        tracing::trace!("ClientCertificateAuthority::unmarshal_text");
        let (x509, der) = parse_single_pem(text)?;
        Ok(Self { x509, der })
    }
}

impl From<ClientCertificateAuthority> for Certificate {
    fn from(value: ClientCertificateAuthority) -> Self {
        Self {
            x509: value.x509,
            der: value.der,
        }
    }
}
