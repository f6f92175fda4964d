//! The platform variable table as plain data.
//!
//! [`VARIABLES`] lists every variable the accessors in [`vars`](crate::vars)
//! know about: its name, whether it is namespaced under the platform prefix,
//! its aliases and, for structured variables, the type it decodes to. The
//! accessors are generated from the same table, so the two never drift.
//!
//! Key derivation:
//!
//! | Name | Prefixed | Key with prefix `PLATFORM_` |
//! |------|----------|-----------------------------|
//! | `TreeID` | yes | `PLATFORM_TREE_ID` |
//! | `SMTPHost` | yes | `PLATFORM_SMTP_HOST` |
//! | `Port` | no | `PORT` |
//! | `XClientDN` | no | `X_CLIENT_DN` |

use serde::Serialize;
use serde_json::Value;

use crate::decode::lookup_decoded;
use crate::provider::Provider;
use crate::types::{Application, Relationships, Routes, Variables};

pub use crate::vars::VARIABLES;

/// Structured type a variable decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecodedType {
    /// [`Application`]
    Application,
    /// [`Relationships`]
    Relationships,
    /// [`Routes`]
    Routes,
    /// [`Variables`]
    Variables,
}

impl DecodedType {
    /// Looks `key` up, decodes it into this type and re-renders it as JSON.
    ///
    /// Going through the typed structure normalizes the document and
    /// applies the same validation the typed accessors do.
    pub fn lookup_json<P: Provider + ?Sized>(self, provider: &P, key: &str) -> Option<Value> {
        let rendered = match self {
            Self::Application => serde_json::to_value(lookup_decoded::<Application, _>(provider, key)?),
            Self::Relationships => {
                serde_json::to_value(lookup_decoded::<Relationships, _>(provider, key)?)
            }
            Self::Routes => serde_json::to_value(lookup_decoded::<Routes, _>(provider, key)?),
            Self::Variables => serde_json::to_value(lookup_decoded::<Variables, _>(provider, key)?),
        };
        match rendered {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "unable to render decoded value");
                None
            }
        }
    }
}

/// One entry of the variable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableSpec {
    /// Canonical name, e.g. `TreeID`.
    pub name: &'static str,
    /// `SCREAMING_SNAKE_CASE` form of the name, e.g. `TREE_ID`.
    pub key: &'static str,
    /// When set, the key is used without the platform prefix.
    pub no_prefix: bool,
    /// Alternative names with identical behavior.
    pub aliases: &'static [&'static str],
    /// Structured type for base64-then-JSON variables; `None` for raw strings.
    pub decoded: Option<DecodedType>,
}

impl VariableSpec {
    /// Returns the environment key under `prefix`.
    #[must_use]
    pub fn env_key(&self, prefix: &str) -> String {
        if self.no_prefix {
            self.key.to_string()
        } else {
            format!("{prefix}{}", self.key)
        }
    }

    /// Returns `true` when `name` is the canonical name or an alias,
    /// ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Looks the variable up and renders it as JSON: a string for raw
    /// variables, the decoded document for structured ones.
    pub fn lookup_json<P: Provider + ?Sized>(&self, provider: &P, prefix: &str) -> Option<Value> {
        let key = self.env_key(prefix);
        match self.decoded {
            Some(decoded) => decoded.lookup_json(provider, &key),
            None => provider.lookup(&key).map(Value::String),
        }
    }
}

/// Finds a variable by canonical name or alias, ignoring ASCII case.
#[must_use]
pub fn find(name: &str) -> Option<&'static VariableSpec> {
    VARIABLES.iter().find(|spec| spec.matches(name))
}

/// Converts a `PascalCase` name to `SCREAMING_SNAKE_CASE`, keeping acronym
/// runs together (`SMTPHost` becomes `SMTP_HOST`).
#[must_use]
pub fn screaming_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapProvider;

    #[test]
    fn test_screaming_snake_case() {
        let cases = [
            ("Application", "APPLICATION"),
            ("ApplicationName", "APPLICATION_NAME"),
            ("SMTPHost", "SMTP_HOST"),
            ("TreeID", "TREE_ID"),
            ("XClientDN", "X_CLIENT_DN"),
            ("XClientIP", "X_CLIENT_IP"),
            ("Port", "PORT"),
        ];
        for (name, expected) in cases {
            assert_eq!(screaming_snake_case(name), expected);
        }
    }

    #[test]
    fn test_table_keys_match_names() {
        for spec in VARIABLES {
            assert_eq!(screaming_snake_case(spec.name), spec.key, "{}", spec.name);
        }
    }

    #[test]
    fn test_names_and_aliases_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for spec in VARIABLES {
            for name in std::iter::once(&spec.name).chain(spec.aliases) {
                assert!(seen.insert(name.to_ascii_lowercase()), "duplicate {name}");
            }
        }
    }

    #[test]
    fn test_env_key() {
        let tree = find("TreeID").unwrap();
        assert_eq!(tree.env_key("PLATFORM_"), "PLATFORM_TREE_ID");

        let port = find("port").unwrap();
        assert!(port.no_prefix);
        assert_eq!(port.env_key("PLATFORM_"), "PORT");
    }

    #[test]
    fn test_find_alias() {
        assert_eq!(find("AppName").unwrap().name, "ApplicationName");
        assert_eq!(find("vars").unwrap().decoded, Some(DecodedType::Variables));
        assert!(find("Nope").is_none());
    }

    #[test]
    fn test_lookup_json() {
        let map: MapProvider = [
            ("PLATFORM_BRANCH", "main"),
            ("PLATFORM_VARIABLES", "eyJhIjoxfQ=="),
        ]
        .into_iter()
        .collect();

        let branch = find("Branch").unwrap().lookup_json(&map, "PLATFORM_");
        assert_eq!(branch, Some(Value::String("main".into())));

        let vars = find("Variables").unwrap().lookup_json(&map, "PLATFORM_");
        assert_eq!(vars, Some(serde_json::json!({"a": 1})));

        assert!(find("Routes").unwrap().lookup_json(&map, "PLATFORM_").is_none());
    }
}
