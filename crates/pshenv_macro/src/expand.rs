//! Code generation for the `EnvEnum` derive macro.
//!
//! Every enumeration gets the same template: a name table indexed by
//! position, a reverse lookup, a fallback rendering for out-of-range indices
//! and the codec/serde glue built on those three.

use proc_macro::TokenStream;
use proc_macro2::{Literal, TokenStream as QuoteStream};
use quote::quote;
use syn::{DeriveInput, Ident, Result as SynResult};

use crate::parse::EnumConfig;

/// Namespace for the expansion functions.
pub struct Expander;

impl Expander {
    /// Main entry point for expanding the derive macro.
    ///
    /// # Errors
    ///
    /// Returns a `syn::Error` when the input is not an enum of the expected
    /// shape (see [`EnumConfig::parse`]).
    pub fn expand(input: &DeriveInput) -> SynResult<TokenStream> {
        let config = EnumConfig::parse(input)?;
        let ident = &input.ident;

        let inherent = Self::generate_inherent_impl(ident, &config);
        let fmt_impls = Self::generate_fmt_impls(ident, &config);
        let codec_impl = Self::generate_codec_impl(ident);
        let serde_impls = Self::generate_serde_impls(ident);

        let combined = quote! {
            #inherent
            #fmt_impls
            #codec_impl
            #serde_impls
        };

        Ok(combined.into())
    }

    /// `COUNT`, `NAMES`, index conversions and the name lookups.
    fn generate_inherent_impl(ident: &Ident, config: &EnumConfig) -> QuoteStream {
        let count = config.named.len();
        let display_name = &config.display_name;
        let unknown = &config.unknown.ident;
        let index_type = &config.unknown.index_type;

        let variants: Vec<&Ident> = config.named.iter().map(|v| &v.ident).collect();
        let names: Vec<_> = config.named.iter().map(|v| &v.rename).collect();
        let indices: Vec<Literal> = (0..count).map(Literal::usize_unsuffixed).collect();

        quote! {
            impl #ident {
                /// Number of named values.
                pub const COUNT: usize = #count;

                /// Text encodings, indexed by value.
                pub const NAMES: [&'static str; #count] = [#(#names),*];

                /// Converts a raw index, mapping anything past the named set
                /// to the unknown variant.
                #[must_use]
                pub const fn from_index(index: #index_type) -> Self {
                    match index {
                        #(#indices => Self::#variants,)*
                        other => Self::#unknown(other),
                    }
                }

                /// Returns the raw index of this value.
                #[must_use]
                pub const fn index(&self) -> #index_type {
                    match *self {
                        #(Self::#variants => #indices,)*
                        Self::#unknown(index) => index,
                    }
                }

                /// Returns the text encoding, or `None` for the unknown
                /// variant.
                ///
                /// The unknown variant never encodes, even when its index
                /// collides with a named value; use [`Self::from_index`] to
                /// build canonical values from raw indices.
                #[must_use]
                pub const fn as_str(&self) -> ::core::option::Option<&'static str> {
                    match *self {
                        #(Self::#variants => ::core::option::Option::Some(#names),)*
                        Self::#unknown(_) => ::core::option::Option::None,
                    }
                }

                /// Looks a value up by its text encoding.
                ///
                /// # Errors
                ///
                /// Returns [`::pshenv::CodecError::UnknownName`] when `name`
                /// is not one of [`Self::NAMES`].
                pub fn from_name(name: &str) -> ::core::result::Result<Self, ::pshenv::CodecError> {
                    match name {
                        #(#names => ::core::result::Result::Ok(Self::#variants),)*
                        _ => ::core::result::Result::Err(
                            ::pshenv::CodecError::unknown_name(#display_name, name),
                        ),
                    }
                }
            }

            impl ::core::default::Default for #ident {
                fn default() -> Self {
                    Self::from_index(0)
                }
            }
        }
    }

    /// `Display` with the fallback form and `FromStr` via the reverse lookup.
    fn generate_fmt_impls(ident: &Ident, config: &EnumConfig) -> QuoteStream {
        let fallback = format!("unknown {} value {{:02x}}", config.display_name);

        quote! {
            impl ::core::fmt::Display for #ident {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    match self.as_str() {
                        ::core::option::Option::Some(name) => f.write_str(name),
                        ::core::option::Option::None => ::core::write!(f, #fallback, self.index()),
                    }
                }
            }

            impl ::core::str::FromStr for #ident {
                type Err = ::pshenv::CodecError;

                fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                    Self::from_name(s)
                }
            }
        }
    }

    fn generate_codec_impl(ident: &Ident) -> QuoteStream {
        quote! {
            impl ::pshenv::TextCodec for #ident {
                fn marshal_text(&self) -> ::core::result::Result<::std::string::String, ::pshenv::CodecError> {
                    match self.as_str() {
                        ::core::option::Option::Some(name) => {
                            ::core::result::Result::Ok(::std::string::String::from(name))
                        }
                        ::core::option::Option::None => ::core::result::Result::Err(
                            ::pshenv::CodecError::unknown_value(self.to_string()),
                        ),
                    }
                }

                fn unmarshal_text(text: &str) -> ::core::result::Result<Self, ::pshenv::CodecError> {
                    Self::from_name(text)
                }
            }
        }
    }

    fn generate_serde_impls(ident: &Ident) -> QuoteStream {
        quote! {
            impl ::pshenv::serde::Serialize for #ident {
                fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
                where
                    S: ::pshenv::serde::Serializer,
                {
                    let text = ::pshenv::TextCodec::marshal_text(self)
                        .map_err(<S::Error as ::pshenv::serde::ser::Error>::custom)?;
                    serializer.serialize_str(&text)
                }
            }

            impl<'de> ::pshenv::serde::Deserialize<'de> for #ident {
                fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
                where
                    D: ::pshenv::serde::Deserializer<'de>,
                {
                    let text = <::std::string::String as ::pshenv::serde::Deserialize>::deserialize(
                        deserializer,
                    )?;
                    Self::from_name(&text)
                        .map_err(<D::Error as ::pshenv::serde::de::Error>::custom)
                }
            }
        }
    }
}
