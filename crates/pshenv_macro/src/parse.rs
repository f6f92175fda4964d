//! Attribute parsing for `#[env_enum(...)]`.
//!
//! Uses syn's `ParseNestedMeta` so unknown options and duplicates get precise
//! error spans.
//!
//! # Supported Syntax
//!
//! ```ignore
//! #[env_enum(name = "TLSVersion")]   // container: name used in messages
//! enum Example {
//!     #[env_enum(rename = "wire")]   // unit variant with its text encoding
//!     Named,
//!     #[env_enum(unknown)]           // catch-all tuple variant
//!     Unknown(u8),
//! }
//! ```

use syn::meta::ParseNestedMeta;
use syn::{
    Attribute, Data, DeriveInput, Error as SynError, Fields, Ident, LitStr, Result as SynResult,
    Type,
};

/// Parsed container-level configuration.
pub struct EnumConfig {
    /// Name rendered in error and fallback messages.
    pub display_name: String,

    /// Named variants in declaration order; position is the index.
    pub named: Vec<NamedVariant>,

    /// The catch-all variant.
    pub unknown: UnknownVariant,
}

/// A unit variant with its wire name.
pub struct NamedVariant {
    pub ident: Ident,
    pub rename: LitStr,
}

/// The tuple variant that carries out-of-range indices.
pub struct UnknownVariant {
    pub ident: Ident,
    pub index_type: Type,
}

/// Options a single `#[env_enum(...)]` attribute on a variant may carry.
#[derive(Default)]
struct VariantAttr {
    rename: Option<LitStr>,
    unknown: bool,
}

impl VariantAttr {
    fn parse_meta(&mut self, meta: &ParseNestedMeta<'_>) -> SynResult<()> {
        if meta.path.is_ident("rename") {
            if self.rename.is_some() {
                return Err(meta.error("duplicate `rename` option"));
            }
            self.rename = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("unknown") {
            if self.unknown {
                return Err(meta.error("duplicate `unknown` option"));
            }
            self.unknown = true;
            Ok(())
        } else {
            Err(meta.error("expected `rename = \"...\"` or `unknown`"))
        }
    }

    fn from_attrs(attrs: &[Attribute]) -> SynResult<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("env_enum")) {
            attr.parse_nested_meta(|meta| parsed.parse_meta(&meta))?;
        }
        Ok(parsed)
    }
}

impl EnumConfig {
    /// Validates the enum shape and collects its variants.
    pub fn parse(input: &DeriveInput) -> SynResult<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(SynError::new_spanned(
                input,
                "EnvEnum can only be derived for enums",
            ));
        };

        let display_name = Self::container_name(input)?;

        let mut named = Vec::new();
        let mut unknown: Option<UnknownVariant> = None;

        for variant in &data.variants {
            let attr = VariantAttr::from_attrs(&variant.attrs)?;

            if attr.unknown {
                if attr.rename.is_some() {
                    return Err(SynError::new_spanned(
                        variant,
                        "the `unknown` variant cannot be renamed",
                    ));
                }
                if unknown.is_some() {
                    return Err(SynError::new_spanned(
                        variant,
                        "only one variant may be marked `unknown`",
                    ));
                }
                let Fields::Unnamed(fields) = &variant.fields else {
                    return Err(SynError::new_spanned(
                        variant,
                        "the `unknown` variant must be a tuple variant holding the index",
                    ));
                };
                let mut iter = fields.unnamed.iter();
                let (Some(field), None) = (iter.next(), iter.next()) else {
                    return Err(SynError::new_spanned(
                        variant,
                        "the `unknown` variant must hold exactly one field",
                    ));
                };
                unknown = Some(UnknownVariant {
                    ident: variant.ident.clone(),
                    index_type: field.ty.clone(),
                });
                continue;
            }

            if !matches!(variant.fields, Fields::Unit) {
                return Err(SynError::new_spanned(
                    variant,
                    "named EnvEnum variants must be unit variants",
                ));
            }

            let Some(rename) = attr.rename else {
                return Err(SynError::new_spanned(
                    variant,
                    "missing #[env_enum(rename = \"...\")]",
                ));
            };

            if named.iter().any(|v: &NamedVariant| v.rename.value() == rename.value()) {
                return Err(SynError::new_spanned(rename, "duplicate wire name"));
            }

            named.push(NamedVariant {
                ident: variant.ident.clone(),
                rename,
            });
        }

        let Some(unknown) = unknown else {
            return Err(SynError::new_spanned(
                input,
                "EnvEnum requires a variant marked #[env_enum(unknown)]",
            ));
        };

        Ok(Self {
            display_name,
            named,
            unknown,
        })
    }

    fn container_name(input: &DeriveInput) -> SynResult<String> {
        let mut name: Option<LitStr> = None;
        for attr in input.attrs.iter().filter(|a| a.path().is_ident("env_enum")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    if name.is_some() {
                        return Err(meta.error("duplicate `name` option"));
                    }
                    name = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `name = \"...\"`"))
                }
            })?;
        }

        Ok(name.map_or_else(|| input.ident.to_string(), |lit| lit.value()))
    }
}
