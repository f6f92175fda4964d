//! Structured documents decoded from platform variables.
//!
//! | Variable | Type |
//! |----------|------|
//! | `APPLICATION` | [`Application`] |
//! | `RELATIONSHIPS` | [`Relationships`] |
//! | `ROUTES` | [`Routes`] |
//! | `VARIABLES` | [`Variables`] |
//!
//! Every record defaults missing fields, and fields the platform is known to
//! send as `null` read `null` as the default value.

mod application;
mod relationship;
mod route;

pub use application::{
    Access, Application, Commands, Cron, Hooks, Mount, Passthru, Preflight, Upstream, Web,
    WebLocation, WebRule, Worker,
};
pub use relationship::{Relationship, Relationships};
pub use route::{
    Cache, HttpAccess, RedirectPath, Redirects, Route, Routes, Ssi, TlsSettings, TlsSts,
};

use serde::{Deserialize, Deserializer};

/// A free-form JSON object.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Project and environment variables (`PLATFORM_VARIABLES`).
pub type Variables = JsonObject;

/// Map of string to string, used for headers, attributes and similar.
pub type StringMap = std::collections::BTreeMap<String, String>;

/// Deserializes `null` as `T::default()`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
