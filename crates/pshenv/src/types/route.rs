//! The routing table (`PLATFORM_ROUTES`).

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use super::{StringMap, nullable};
use crate::codec::{ClientCertificateAuthority, Duration, TlsVersion};

/// Routes keyed by their parsed URL.
///
/// The JSON form is an object keyed by URL strings. Keys are parsed with
/// [`Url::parse`], which normalizes them (`https://example.com` gains a
/// trailing `/`); a key that is not an absolute URL fails decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Routes(pub BTreeMap<Url, Route>);

impl Routes {
    /// Returns the route marked primary, if any.
    #[must_use]
    pub fn primary(&self) -> Option<(&Url, &Route)> {
        self.0.iter().find(|(_, route)| route.primary)
    }

    /// Returns the routes whose `original_url` matches, e.g.
    /// `https://{default}/`.
    pub fn by_original_url<'a>(
        &'a self,
        original: &'a str,
    ) -> impl Iterator<Item = (&'a Url, &'a Route)> + 'a {
        self.0
            .iter()
            .filter(move |(_, route)| route.original_url == original)
    }
}

impl Deref for Routes {
    type Target = BTreeMap<Url, Route>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Routes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Serialize for Routes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        tracing::trace!("Routes::serialize");
        serializer.collect_map(self.0.iter().map(|(url, route)| (url.as_str(), route)))
    }
}

impl<'de> Deserialize<'de> for Routes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        tracing::trace!("Routes::deserialize");
        let raw = BTreeMap::<String, Route>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, route)| {
                Url::parse(&key)
                    .map(|url| (url, route))
                    .map_err(|err| D::Error::custom(format!("invalid route URL {key:?}: {err}")))
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

/// A single route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    /// Whether this is the primary route.
    pub primary: bool,
    /// Optional route identifier from the routes configuration.
    pub id: Option<String>,
    /// The route key as written in the configuration.
    #[serde(deserialize_with = "nullable")]
    pub original_url: String,
    /// Free-form attributes.
    pub attributes: StringMap,
    /// `upstream` or `redirect`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Partial redirects.
    pub redirects: Redirects,
    /// TLS settings.
    pub tls: TlsSettings,
    /// HTTP access control.
    pub http_access: HttpAccess,
    /// Whether `X-Robots-Tag: noindex` is added.
    #[serde(deserialize_with = "nullable")]
    pub restrict_robots: bool,

    /// Cache settings (upstream routes).
    pub cache: Cache,
    /// Server side includes (upstream routes).
    pub ssi: Ssi,
    /// `app:http` style target (upstream routes).
    #[serde(deserialize_with = "nullable")]
    pub upstream: String,

    /// Redirect target (redirect routes).
    #[serde(deserialize_with = "nullable")]
    pub to: String,
}

/// Partial redirects within a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Redirects {
    /// Default cache lifetime of redirects.
    pub expires: Duration,
    /// Redirects keyed by path or pattern.
    pub paths: BTreeMap<String, RedirectPath>,
}

/// A single partial redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectPath {
    /// Whether the key is a regular expression.
    pub regexp: bool,
    /// Target URL or path.
    pub to: String,
    /// Whether the key matches as a prefix.
    pub prefix: bool,
    /// Whether the unmatched suffix is appended to the target.
    pub append_suffix: bool,
    /// HTTP status code.
    pub code: u16,
    /// Cache lifetime.
    pub expires: Duration,
}

/// TLS settings of a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    /// HSTS header settings.
    pub strict_transport_security: TlsSts,
    /// Minimum accepted protocol version.
    pub min_version: Option<TlsVersion>,
    /// Client certificate policy (`request` or `require`).
    #[serde(deserialize_with = "nullable")]
    pub client_authentication: String,
    /// Authorities accepted for client certificates.
    #[serde(deserialize_with = "nullable")]
    pub client_certificate_authorities: Vec<ClientCertificateAuthority>,
}

/// HSTS settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSts {
    /// Whether the header is sent.
    #[serde(deserialize_with = "nullable")]
    pub enabled: bool,
    /// `includeSubDomains`.
    #[serde(deserialize_with = "nullable")]
    pub include_subdomains: bool,
    /// `preload`.
    #[serde(deserialize_with = "nullable")]
    pub preload: bool,
}

/// HTTP access control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpAccess {
    /// Allow/deny address rules.
    pub addresses: Vec<String>,
    /// Basic auth users to passwords.
    pub basic_auth: StringMap,
}

/// Cache settings of an upstream route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cache {
    /// Whether caching is on.
    pub enabled: bool,
    /// Default TTL in seconds.
    pub default_ttl: i64,
    /// Cookies that vary the cache key.
    pub cookies: Vec<String>,
    /// Headers that vary the cache key.
    pub headers: Vec<String>,
}

/// Server side includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ssi {
    /// Whether SSI is on.
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "https://www.example.com/": {
                "primary": true,
                "id": null,
                "original_url": "https://www.{default}/",
                "type": "upstream",
                "upstream": "app:http",
                "cache": {"enabled": true, "default_ttl": 0, "cookies": ["*"], "headers": ["Accept"]},
                "redirects": {"expires": "-1s", "paths": {}},
                "tls": {
                    "client_authentication": null,
                    "min_version": "TLSv1.2",
                    "client_certificate_authorities": [],
                    "strict_transport_security": {"preload": null, "include_subdomains": null, "enabled": null}
                },
                "restrict_robots": true
            },
            "https://example.com": {
                "original_url": "https://{default}/",
                "type": "redirect",
                "to": "https://www.example.com/",
                "upstream": null
            }
        })
    }

    #[test]
    fn test_decode_routes() {
        let routes: Routes = serde_json::from_value(sample()).unwrap();
        assert_eq!(routes.len(), 2);

        let (url, primary) = routes.primary().unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/");
        assert_eq!(primary.upstream, "app:http");
        assert_eq!(primary.tls.min_version, Some(TlsVersion::V1_2));
        assert!(!primary.tls.strict_transport_security.enabled);
        assert_eq!(primary.redirects.expires, Duration::from_secs(-1));

        let redirect = routes.by_original_url("https://{default}/").next().unwrap().1;
        assert_eq!(redirect.kind, "redirect");
        assert_eq!(redirect.upstream, "");
    }

    #[test]
    fn test_keys_are_normalized() {
        let routes: Routes = serde_json::from_value(sample()).unwrap();
        let json = serde_json::to_value(&routes).unwrap();
        assert!(json.get("https://example.com/").is_some());
    }

    #[test]
    fn test_relative_key_fails() {
        let result = serde_json::from_value::<Routes>(json!({"/relative": {}}));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("invalid route URL"));
    }
}
