//! # pshenv
//!
//! Typed, layered access to the environment a PaaS runtime injects into an
//! application container.
//!
//! The platform describes the running application through a handful of
//! environment variables. Most are plain strings (`PLATFORM_BRANCH`,
//! `PLATFORM_TREE_ID`, `PORT`), but a few carry base64-encoded JSON documents:
//! the application manifest, the service relationships, the routing table and
//! the project variables. `pshenv` resolves those variables through a
//! [`Provider`] stack and decodes them into typed structures.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pshenv::{Environment, LayeredProvider, MapProvider, OsProvider};
//!
//! let dotenv = MapProvider::from_path_optional(".env")?;
//! let layers = LayeredProvider::new(vec![Box::new(dotenv), Box::new(OsProvider)]);
//! let env = Environment::with_provider("PLATFORM_", layers);
//!
//! if let Some(rels) = env.lookup_relationships() {
//!     let url = rels.postgresql_url("database")?;
//!     println!("connecting to {url}");
//! }
//!
//! let listener = env.listener()?;
//! ```
//!
//! ## Providers
//!
//! | Provider | Backing store |
//! |----------|---------------|
//! | [`OsProvider`] | The process environment (mutation is process-wide) |
//! | [`MapProvider`] | An owned in-memory map (`.env` contents, snapshots) |
//! | [`LayeredProvider`] | An ordered stack of providers, first match wins |
//!
//! ## Variables
//!
//! Every platform variable gets a `lookup_*` accessor returning `Option<T>`
//! and a `get_*` accessor returning the zero value when absent, both as free
//! functions in [`vars`] (generic over any [`PlatformProvider`]) and as
//! methods on [`Environment`]. The declarative table behind them is exposed
//! as plain data in [`schema::VARIABLES`].
//!
//! Decoded variables are base64-then-JSON. A value that fails to decode is
//! logged at `warn` level and reported as absent; use
//! [`decode::decode_value`] when the failure itself matters.
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `dotenv` | Parse `.env` files into a [`MapProvider`] | **Yes** |
//! | `cli` | Build the `pshenv` inspection binary | No |

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// Lets the code generated by `EnvEnum` refer to `::pshenv` from inside this crate.
extern crate self as pshenv;

pub use pshenv_macro::EnvEnum;

// ============================================================================
// Re-exported Dependencies
// ============================================================================
// The derive macro generates code that references these via ::pshenv::serde.

/// Re-export serde for macro-generated code.
pub use serde;

/// Re-export `serde_json`; decoded variables and relationship queries carry
/// free-form JSON values.
pub use serde_json;

/// Re-export miette for error reporting.
pub use miette;

/// Re-export dotenvy when the dotenv feature is enabled.
#[cfg(feature = "dotenv")]
pub use dotenvy;

// ============================================================================
// Core Modules
// ============================================================================

mod error;
pub use error::Error;

/// A Result type that displays errors with miette's fancy formatting.
pub type Result<T> = miette::Result<T>;

pub mod codec;
pub use codec::{
    AccessLevel, AccessType, ApplicationMount, Certificate, ClientCertificateAuthority,
    CodecError, Duration, ServiceSize, SocketFamily, SocketProtocol, TextCodec, TlsVersion,
};

pub mod provider;
pub use provider::{
    LayeredProvider, MapProvider, OsProvider, PlatformProvider, Provider, ProviderError,
};

pub mod decode;
pub use decode::DecodeError;

pub mod types;
pub use types::{Application, JsonObject, Relationship, Relationships, Route, Routes, Variables};

pub mod schema;
pub mod vars;

mod environment;
pub use environment::{Environment, ListenAddr, Listener};
