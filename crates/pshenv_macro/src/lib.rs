//! # pshenv_macro
//!
//! Procedural macro implementation for the `pshenv` crate.
//!
//! This crate provides `#[derive(EnvEnum)]`, which stamps out the text codec
//! shared by every closed enumeration the platform sends inside its decoded
//! variables (`AccessLevel`, `ServiceSize`, `SocketFamily`, ...).
//!
//! **Note:** Users should depend on the `pshenv` crate, not this one directly.
//! The `pshenv` crate re-exports this macro along with the runtime types the
//! generated code refers to.
//!
//! # Module Structure
//!
//! - `parse` - Attribute parsing for `#[env_enum(...)]`
//! - `expand` - Code generation

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod expand;
mod parse;

/// Derive macro for closed, index-backed enumerations with a text encoding.
///
/// The enum must consist of unit variants, each carrying its wire name, plus
/// exactly one single-field tuple variant marked `unknown` that holds any
/// index outside the named set.
///
/// # Variant Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `rename = "wire"` | Text encoding of the variant (required on unit variants) |
/// | `unknown` | Marks the catch-all tuple variant |
///
/// # Container Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `name = "Display"` | Type name used in error messages (defaults to the ident) |
///
/// # Example
///
/// ```ignore
/// use pshenv::EnvEnum;
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnvEnum)]
/// pub enum AccessLevel {
///     #[env_enum(rename = "viewer")]
///     Viewer,
///     #[env_enum(rename = "admin")]
///     Admin,
///     #[env_enum(unknown)]
///     Unknown(u8),
/// }
///
/// assert_eq!(AccessLevel::from_name("admin")?, AccessLevel::Admin);
/// assert_eq!(AccessLevel::Unknown(9).to_string(), "unknown AccessLevel value 09");
/// ```
///
/// # Generated Items
///
/// - `COUNT`, `NAMES`, `from_index()`, `index()`, `as_str()`, `from_name()`
/// - `Display` (never fails), `FromStr`
/// - `pshenv::TextCodec` (marshalling an unknown value fails with the
///   `Display` text)
///
/// The unknown variant is meant for indices at or past `COUNT`. A hand-built
/// `Unknown(i)` with a smaller index is still treated as unknown: it neither
/// displays nor encodes as the named value at `i`. `from_index` is the
/// canonical constructor.
/// - serde `Serialize` and `Deserialize` as strings
#[proc_macro_derive(EnvEnum, attributes(env_enum))]
pub fn derive_env_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand::Expander::expand(&input).unwrap_or_else(|err| err.to_compile_error().into())
}
