//! Typed accessors for every platform variable.
//!
//! Each entry of the table below expands to:
//!
//! - `lookup_<name>(provider) -> Option<T>`: `None` when the key is absent
//!   or, for structured variables, when the value fails to decode (logged).
//! - `get_<name>(provider) -> T`: the same, with `T::default()` for `None`.
//! - the same pair for each alias, delegating to the canonical accessors.
//! - an [`Environment`] method for each of the above.
//! - an entry in [`VARIABLES`].
//!
//! Raw variables have `T = String`; structured ones decode base64-then-JSON
//! into the declared type.

use crate::environment::Environment;
use crate::provider::PlatformProvider;
use crate::schema::{DecodedType, VariableSpec};
use crate::types::{Application, Relationships, Routes, Variables};

/// Computes the key of a variable for a provider's prefix.
fn variable_key<P: PlatformProvider + ?Sized>(provider: &P, prefixed: bool, key: &str) -> String {
    if prefixed {
        format!("{}{key}", provider.prefix())
    } else {
        key.to_string()
    }
}

macro_rules! decoded_type {
    (raw $ty:ident) => {
        None
    };
    (decoded $ty:ident) => {
        Some(DecodedType::$ty)
    };
}

macro_rules! lookup_value {
    (raw, $provider:expr, $key:expr) => {
        $crate::decode::lookup_raw($provider, $key)
    };
    (decoded, $provider:expr, $key:expr) => {
        $crate::decode::lookup_decoded($provider, $key)
    };
}

macro_rules! platform_variables {
    (
        $(
            $name:literal as $key:literal => $kind:ident $ty:ident {
                prefixed: $prefixed:literal,
                lookup: $lookup:ident,
                get: $get:ident,
                aliases: [$($alias:literal => ($alias_lookup:ident, $alias_get:ident)),* $(,)?] $(,)?
            }
        ),* $(,)?
    ) => {
        /// Every platform variable, in table order.
        pub const VARIABLES: &[VariableSpec] = &[
            $(
                VariableSpec {
                    name: $name,
                    key: $key,
                    no_prefix: !$prefixed,
                    aliases: &[$($alias),*],
                    decoded: decoded_type!($kind $ty),
                },
            )*
        ];

        $(
            #[doc = concat!("Looks up `", $name, "` (key `", $key, "`).")]
            pub fn $lookup<P: PlatformProvider + ?Sized>(provider: &P) -> Option<$ty> {
                let key = variable_key(provider, $prefixed, $key);
                lookup_value!($kind, provider, &key)
            }

            #[doc = concat!("Returns `", $name, "`, or the default value when it is unavailable.")]
            pub fn $get<P: PlatformProvider + ?Sized>(provider: &P) -> $ty {
                $lookup(provider).unwrap_or_default()
            }

            $(
                #[doc = concat!("Alias of [`", stringify!($lookup), "`].")]
                pub fn $alias_lookup<P: PlatformProvider + ?Sized>(provider: &P) -> Option<$ty> {
                    $lookup(provider)
                }

                #[doc = concat!("Alias of [`", stringify!($get), "`].")]
                pub fn $alias_get<P: PlatformProvider + ?Sized>(provider: &P) -> $ty {
                    $get(provider)
                }
            )*
        )*

        /// Typed accessors bound to this environment's provider and prefix.
        impl Environment {
            $(
                #[doc = concat!("Looks up `", $name, "`. See [`vars::", stringify!($lookup), "`](crate::vars::", stringify!($lookup), ").")]
                #[must_use]
                pub fn $lookup(&self) -> Option<$ty> {
                    $lookup(self)
                }

                #[doc = concat!("Returns `", $name, "` or its default value.")]
                #[must_use]
                pub fn $get(&self) -> $ty {
                    $get(self)
                }

                $(
                    #[doc = concat!("Alias of [`Environment::", stringify!($lookup), "`].")]
                    #[must_use]
                    pub fn $alias_lookup(&self) -> Option<$ty> {
                        $lookup(self)
                    }

                    #[doc = concat!("Alias of [`Environment::", stringify!($get), "`].")]
                    #[must_use]
                    pub fn $alias_get(&self) -> $ty {
                        $get(self)
                    }
                )*
            )*
        }
    };
}

platform_variables! {
    "Application" as "APPLICATION" => decoded Application {
        prefixed: true,
        lookup: lookup_application,
        get: get_application,
        aliases: [],
    },
    "ApplicationName" as "APPLICATION_NAME" => raw String {
        prefixed: true,
        lookup: lookup_application_name,
        get: get_application_name,
        aliases: ["AppName" => (lookup_app_name, get_app_name)],
    },
    "AppCommand" as "APP_COMMAND" => raw String {
        prefixed: true,
        lookup: lookup_app_command,
        get: get_app_command,
        aliases: ["ApplicationCommand" => (lookup_application_command, get_application_command)],
    },
    "AppDir" as "APP_DIR" => raw String {
        prefixed: true,
        lookup: lookup_app_dir,
        get: get_app_dir,
        aliases: [],
    },
    "Branch" as "BRANCH" => raw String {
        prefixed: true,
        lookup: lookup_branch,
        get: get_branch,
        aliases: [],
    },
    "Dir" as "DIR" => raw String {
        prefixed: true,
        lookup: lookup_dir,
        get: get_dir,
        aliases: [],
    },
    "DocumentRoot" as "DOCUMENT_ROOT" => raw String {
        prefixed: true,
        lookup: lookup_document_root,
        get: get_document_root,
        aliases: [],
    },
    "Environment" as "ENVIRONMENT" => raw String {
        prefixed: true,
        lookup: lookup_environment,
        get: get_environment,
        aliases: [],
    },
    "Port" as "PORT" => raw String {
        prefixed: false,
        lookup: lookup_port,
        get: get_port,
        aliases: [],
    },
    "Project" as "PROJECT" => raw String {
        prefixed: true,
        lookup: lookup_project,
        get: get_project,
        aliases: [],
    },
    "ProjectEntropy" as "PROJECT_ENTROPY" => raw String {
        prefixed: true,
        lookup: lookup_project_entropy,
        get: get_project_entropy,
        aliases: [],
    },
    "Relationships" as "RELATIONSHIPS" => decoded Relationships {
        prefixed: true,
        lookup: lookup_relationships,
        get: get_relationships,
        aliases: [],
    },
    "Routes" as "ROUTES" => decoded Routes {
        prefixed: true,
        lookup: lookup_routes,
        get: get_routes,
        aliases: [],
    },
    "SMTPHost" as "SMTP_HOST" => raw String {
        prefixed: true,
        lookup: lookup_smtp_host,
        get: get_smtp_host,
        aliases: [],
    },
    "Socket" as "SOCKET" => raw String {
        prefixed: false,
        lookup: lookup_socket,
        get: get_socket,
        aliases: [],
    },
    "TreeID" as "TREE_ID" => raw String {
        prefixed: true,
        lookup: lookup_tree_id,
        get: get_tree_id,
        aliases: [],
    },
    "Variables" as "VARIABLES" => decoded Variables {
        prefixed: true,
        lookup: lookup_variables,
        get: get_variables,
        aliases: ["Vars" => (lookup_vars, get_vars)],
    },
    "XClientCert" as "X_CLIENT_CERT" => raw String {
        prefixed: false,
        lookup: lookup_x_client_cert,
        get: get_x_client_cert,
        aliases: [],
    },
    "XClientDN" as "X_CLIENT_DN" => raw String {
        prefixed: false,
        lookup: lookup_x_client_dn,
        get: get_x_client_dn,
        aliases: [],
    },
    "XClientIP" as "X_CLIENT_IP" => raw String {
        prefixed: false,
        lookup: lookup_x_client_ip,
        get: get_x_client_ip,
        aliases: [],
    },
    "XClientVerify" as "X_CLIENT_VERIFY" => raw String {
        prefixed: false,
        lookup: lookup_x_client_verify,
        get: get_x_client_verify,
        aliases: [],
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::encode_value;
    use crate::{LayeredProvider, MapProvider, Provider};
    use serde_json::json;

    fn env(entries: &[(&str, &str)]) -> Environment {
        let map: MapProvider = entries.iter().copied().collect();
        Environment::with_provider("PLATFORM_", map)
    }

    #[test]
    fn test_prefixed_and_bare_keys() {
        let env = env(&[
            ("PLATFORM_TREE_ID", "abc123"),
            ("PORT", "8888"),
            ("PLATFORM_PORT", "wrong"),
            ("X_CLIENT_IP", "10.0.0.1"),
        ]);
        assert_eq!(lookup_tree_id(&env).as_deref(), Some("abc123"));
        assert_eq!(env.get_port(), "8888");
        assert_eq!(env.get_x_client_ip(), "10.0.0.1");
        assert_eq!(env.lookup_branch(), None);
        assert_eq!(env.get_branch(), "");
    }

    #[test]
    fn test_aliases_match_canonical() {
        let env = env(&[
            ("PLATFORM_APPLICATION_NAME", "app"),
            ("PLATFORM_APP_COMMAND", "run"),
        ]);
        assert_eq!(env.lookup_app_name(), env.lookup_application_name());
        assert_eq!(get_app_name(&env), "app");
        assert_eq!(env.get_application_command(), "run");
    }

    #[test]
    fn test_decoded_variables() {
        let vars = encode_value(&json!({"feature": true, "level": 3})).unwrap();
        let env = env(&[("PLATFORM_VARIABLES", vars.as_str())]);

        let decoded = env.lookup_variables().unwrap();
        assert_eq!(decoded.get("feature"), Some(&json!(true)));
        assert_eq!(env.get_vars(), decoded);
    }

    #[test]
    fn test_malformed_decoded_is_absent() {
        let env = env(&[
            ("PLATFORM_VARIABLES", "not-base64"),
            ("PLATFORM_ROUTES", "W10="),
        ]);
        assert!(env.lookup_variables().is_none());
        assert!(env.get_variables().is_empty());
        // `[]` is valid JSON but not a route map.
        assert!(env.lookup_routes().is_none());
    }

    #[test]
    fn test_free_functions_take_any_platform_provider() {
        let layered = LayeredProvider::new(vec![Box::new(
            [("CUSTOM_BRANCH", "feature")].into_iter().collect::<MapProvider>(),
        )]);
        let env = Environment::with_provider("CUSTOM_", layered);
        assert_eq!(get_branch(&env), "feature");
        assert_eq!(env.get_env("CUSTOM_BRANCH"), "feature");
    }
}
