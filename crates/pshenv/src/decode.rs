//! Decoding of base64-then-JSON platform variables.
//!
//! The platform encodes structured variables as standard, padded base64 of a
//! UTF-8 JSON document. The generated accessors use [`lookup_decoded`], which
//! logs failures and reports them as absent; [`decode_value`] returns the
//! failure for callers that need to tell "malformed" apart from "missing".

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use miette::Diagnostic;
use serde::de::DeserializeOwned;
use thiserror::Error as ThisError;

use crate::provider::Provider;

/// Errors produced while decoding a structured variable.
#[derive(Debug, ThisError, Diagnostic)]
pub enum DecodeError {
    /// The raw value is not valid base64.
    #[error("value is not valid base64")]
    #[diagnostic(
        code(pshenv::decode::base64),
        help("structured variables use the standard alphabet with padding")
    )]
    Base64(#[source] base64::DecodeError),

    /// The decoded bytes are not a JSON document of the expected shape.
    #[error("invalid JSON at '{path}'")]
    #[diagnostic(code(pshenv::decode::json))]
    Json {
        /// Path to the failing field (`.` for the root).
        path: String,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Decodes a raw base64-then-JSON value.
///
/// # Errors
///
/// Returns [`DecodeError::Base64`] or [`DecodeError::Json`]; JSON errors
/// carry the path of the field that failed.
pub fn decode_value<T: DeserializeOwned>(raw: &str) -> Result<T, DecodeError> {
    let bytes = STANDARD.decode(raw.trim()).map_err(DecodeError::Base64)?;

    let mut de = serde_json::Deserializer::from_slice(&bytes);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|err| DecodeError::Json {
        path: err.path().to_string(),
        source: err.into_inner(),
    })?;
    de.end().map_err(|source| DecodeError::Json {
        path: ".".to_string(),
        source,
    })?;

    Ok(value)
}

/// Looks up the raw value of `key`.
pub fn lookup_raw<P: Provider + ?Sized>(provider: &P, key: &str) -> Option<String> {
    tracing::trace!(key, provider = provider.name(), "lookup_raw");
    provider.lookup(key)
}

/// Looks up and decodes `key`.
///
/// Absent keys and undecodable values both yield `None`; the latter is
/// logged at `warn` level with the key and the failure.
pub fn lookup_decoded<T, P>(provider: &P, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    P: Provider + ?Sized,
{
    let raw = lookup_raw(provider, key)?;
    match decode_value(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "unable to decode value");
            None
        }
    }
}

/// Encodes a value the way the platform does: JSON, then standard base64.
///
/// # Errors
///
/// Returns the serialization error when `value` cannot be written as JSON.
pub fn encode_value<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    Ok(STANDARD.encode(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapProvider;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        port: u16,
    }

    #[test]
    fn test_decode_value() {
        let raw = encode_value(&json!({"name": "app", "port": 80})).unwrap();
        let sample: Sample = decode_value(&raw).unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "app".into(),
                port: 80
            }
        );
    }

    #[test]
    fn test_bad_base64() {
        let err = decode_value::<Sample>("not base64!").unwrap_err();
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn test_json_error_has_path() {
        let raw = encode_value(&json!({"name": "app", "port": "eighty"})).unwrap();
        let err = decode_value::<Sample>(&raw).unwrap_err();
        match err {
            DecodeError::Json { path, .. } => assert_eq!(path, "port"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_trailing_json_is_rejected() {
        let raw = STANDARD.encode(br#"{"name":"a","port":1} {}"#);
        assert!(decode_value::<Sample>(&raw).is_err());
    }

    #[test]
    fn test_lookup_decoded_is_silent() {
        let good = encode_value(&json!({"name": "app", "port": 80})).unwrap();
        let map: MapProvider = [("GOOD", good.as_str()), ("BAD", "%%%")].into_iter().collect();

        assert!(lookup_decoded::<Sample, _>(&map, "GOOD").is_some());
        assert!(lookup_decoded::<Sample, _>(&map, "BAD").is_none());
        assert!(lookup_decoded::<Sample, _>(&map, "MISSING").is_none());
    }
}
