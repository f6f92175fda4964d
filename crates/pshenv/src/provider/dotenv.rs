//! `.env` interchange for [`MapProvider`].
//!
//! Parsing is dotenvy's grammar (quotes, escapes, `export` prefixes and
//! `${VAR}` substitution). Nothing here touches the process environment:
//! a parsed file becomes an ordinary map layer.
//!
//! | Function | Missing file |
//! |----------|--------------|
//! | [`MapProvider::from_path`] | Error |
//! | [`MapProvider::from_path_optional`] | Empty map |
//! | [`LayeredProvider::with_dotenv`] | Process environment only |

use std::io::Read;
use std::path::Path;

use super::{LayeredProvider, MapProvider, OsProvider, ProviderError};

impl MapProvider {
    /// Parses `.env` content from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Dotenv`] on malformed lines or I/O errors.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProviderError> {
        tracing::trace!("MapProvider::from_reader");
        dotenvy::from_read_iter(reader)
            .collect::<Result<Self, _>>()
            .map_err(ProviderError::Dotenv)
    }

    /// Parses `.env` content from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Dotenv`] on malformed lines.
    pub fn from_dotenv_str(content: &str) -> Result<Self, ProviderError> {
        Self::from_reader(content.as_bytes())
    }

    /// Parses a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Dotenv`] when the file cannot be read or
    /// contains malformed lines.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading dotenv file");
        dotenvy::from_path_iter(path)
            .map_err(ProviderError::Dotenv)?
            .collect::<Result<Self, _>>()
            .map_err(ProviderError::Dotenv)
    }

    /// Parses a `.env` file, returning an empty map when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Dotenv`] when the file exists but cannot be
    /// read or parsed.
    pub fn from_path_optional(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        match Self::from_path(&path) {
            Err(ProviderError::Dotenv(err)) if err.not_found() => {
                tracing::debug!(
                    path = %path.as_ref().display(),
                    "dotenv file not found, using an empty layer"
                );
                Ok(Self::new())
            }
            other => other,
        }
    }

    /// Renders the map as `.env` text, one sorted `KEY=VALUE` line each.
    ///
    /// Integers are written bare; everything else is double quoted with
    /// backslashes, quotes, `$` and newlines escaped, so the output parses
    /// back to the same map.
    #[must_use]
    pub fn to_dotenv(&self) -> String {
        let mut out = String::new();
        for (key, value) in self {
            if !value.is_empty() && value.parse::<i64>().is_ok() {
                out.push_str(&format!("{key}={value}\n"));
            } else {
                out.push_str(&format!("{key}=\"{}\"\n", escape(value)));
            }
        }
        out
    }
}

impl LayeredProvider {
    /// Stacks a `.env` file over the process environment.
    ///
    /// The file layer takes priority, so a value written there overrides the
    /// inherited one. A missing file leaves the process environment alone.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Dotenv`] when the file exists but cannot be
    /// read or parsed.
    pub fn with_dotenv(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let dotenv = MapProvider::from_path_optional(path)?;
        Ok(Self::new(vec![Box::new(dotenv), Box::new(OsProvider::new())]))
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Provider;

    #[test]
    fn test_parse_basic() {
        let map = MapProvider::from_dotenv_str(
            "# comment\nPORT=8080\nexport NAME='app'\nQUOTED=\"two words\"\n",
        )
        .unwrap();
        assert_eq!(map.get("PORT"), Some("8080"));
        assert_eq!(map.get("NAME"), Some("app"));
        assert_eq!(map.get("QUOTED"), Some("two words"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_parse_error() {
        let err = MapProvider::from_dotenv_str("NOT A VALID LINE\n").unwrap_err();
        assert!(matches!(err, ProviderError::Dotenv(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        assert!(MapProvider::from_path(&path).is_err());
        let map = MapProvider::from_path_optional(&path).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PLATFORM_BRANCH=main\n").unwrap();

        let map = MapProvider::from_path_optional(&path).unwrap();
        assert_eq!(map.get_env("PLATFORM_BRANCH"), "main");
    }

    #[test]
    fn test_to_dotenv_parses_back() {
        let map: MapProvider = [
            ("PORT", "8080"),
            ("MESSAGE", "say \"hi\"\nthen $LEAVE \\o/"),
            ("EMPTY", ""),
        ]
        .into_iter()
        .collect();

        let text = map.to_dotenv();
        assert!(text.starts_with("EMPTY=\"\"\n"));
        assert!(text.contains("PORT=8080\n"));

        let parsed = MapProvider::from_dotenv_str(&text).unwrap();
        assert_eq!(parsed, map);
    }
}
