// Proc macros operate on named structs where field.ident is always Some
#![allow(clippy::unwrap_used)]

//! # sproc-derive
//!
//! Procedural macros for stored-procedure row mapping and parameter
//! binding.
//!
//! ## Available Macros
//!
//! - `#[derive(RowTarget)]` - Receive result columns by exact name match
//! - `#[derive(ToParams)]` - Convert a struct to input parameters
//!
//! ## Example
//!
//! ```rust,ignore
//! use sproc_derive::{RowTarget, ToParams};
//!
//! #[derive(Default, RowTarget)]
//! struct User {
//!     id: i32,
//!     #[sproc(rename = "UserName")]
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! #[derive(ToParams)]
//! struct NewUser {
//!     name: String,
//!     email: String,
//! }
//! ```
//!
//! `RowTarget` generates a per-type setter table: a `match` over column
//! names, each arm assigning through `FromSql`. Name matching stays exact
//! and case-sensitive; a column with no arm is a mapping error at run time,
//! and there is no per-row name discovery cost.

#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, parse_macro_input};

/// Field configuration extracted from attributes.
#[derive(Default)]
struct FieldConfig {
    /// Renamed column/parameter name.
    rename: Option<String>,
    /// Skip this field.
    skip: bool,
}

/// Struct-level configuration extracted from attributes.
#[derive(Default)]
struct StructConfig {
    /// Rename all fields using a casing convention.
    rename_all: Option<String>,
}

/// Parse sproc attributes from a list of attributes.
fn parse_field_config(attrs: &[Attribute]) -> FieldConfig {
    let mut config = FieldConfig::default();

    for attr in attrs {
        if !attr.path().is_ident("sproc") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: Expr = meta.value()?.parse()?;
                if let Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }) = value
                {
                    config.rename = Some(lit.value());
                }
            } else if meta.path.is_ident("skip") {
                config.skip = true;
            }
            Ok(())
        });
    }

    config
}

/// Parse struct-level sproc attributes.
fn parse_struct_config(attrs: &[Attribute]) -> StructConfig {
    let mut config = StructConfig::default();

    for attr in attrs {
        if !attr.path().is_ident("sproc") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: Expr = meta.value()?.parse()?;
                if let Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }) = value
                {
                    config.rename_all = Some(lit.value());
                }
            }
            Ok(())
        });
    }

    config
}

/// Convert a field name to a column name based on rename_all setting.
fn apply_rename_all(name: &str, rename_all: Option<&str>) -> String {
    match rename_all {
        Some("snake_case") => to_snake_case(name),
        Some("camelCase") => to_camel_case(name),
        Some("PascalCase") => to_pascal_case(name),
        Some("SCREAMING_SNAKE_CASE") => to_screaming_snake_case(name),
        _ => name.to_string(),
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;
    for (i, c) in s.chars().enumerate() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else if i == 0 {
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// Derive macro for implementing the `RowTarget` trait.
///
/// Generates a `set_field` match with one arm per non-skipped field,
/// assigning through `FromSql`. The target must also implement `Default`
/// (derive it or write it by hand; a hand-written `Default` with sentinel
/// values makes list-mode NULL skipping observable).
///
/// ## Attributes
///
/// ### Field Attributes
///
/// - `#[sproc(rename = "column_name")]` - Match a differently named column
/// - `#[sproc(skip)]` - No setter arm; a column with this field's name is a
///   mapping error
///
/// ### Struct Attributes
///
/// - `#[sproc(rename_all = "PascalCase")]` - Apply a naming convention to
///   all fields (`snake_case`, `camelCase`, `PascalCase`,
///   `SCREAMING_SNAKE_CASE`)
///
/// ## Example
///
/// ```rust,ignore
/// #[derive(Default, RowTarget)]
/// #[sproc(rename_all = "PascalCase")]
/// struct User {
///     id: i32,                      // matches column "Id"
///     #[sproc(rename = "UserName")]
///     name: String,
///     email: Option<String>,        // matches column "Email", NULL-safe
/// }
/// ```
#[proc_macro_derive(RowTarget, attributes(sproc))]
pub fn derive_row_target(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match impl_row_target(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn impl_row_target(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let struct_config = parse_struct_config(&input.attrs);
    let fields = named_fields(input, "RowTarget")?;

    let mut arms = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().unwrap();
        let config = parse_field_config(&field.attrs);

        if config.skip {
            continue;
        }

        let column_name = config.rename.unwrap_or_else(|| {
            apply_rename_all(&field_name.to_string(), struct_config.rename_all.as_deref())
        });

        arms.push(quote! {
            #column_name => {
                self.#field_name = sproc_client::FromSql::from_sql(value)?;
            }
        });
    }

    Ok(quote! {
        impl #impl_generics sproc_client::RowTarget for #name #ty_generics #where_clause {
            fn set_field(
                &mut self,
                column: &str,
                value: &sproc_client::SqlValue,
            ) -> ::std::result::Result<(), sproc_client::FieldError> {
                match column {
                    #(#arms)*
                    _ => return ::std::result::Result::Err(
                        sproc_client::FieldError::NoMatchingField,
                    ),
                }
                ::std::result::Result::Ok(())
            }
        }
    })
}

/// Derive macro for implementing the `ToParams` trait.
///
/// Generates `to_params` producing one input parameter per non-skipped
/// field, converted through `ToSql`.
///
/// ## Attributes
///
/// - `#[sproc(rename = "param_name")]` - Use a different parameter name
/// - `#[sproc(skip)]` - Don't include this field as a parameter
/// - `#[sproc(rename_all = "...")]` - Struct-level naming convention
#[proc_macro_derive(ToParams, attributes(sproc))]
pub fn derive_to_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match impl_to_params(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn impl_to_params(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let struct_config = parse_struct_config(&input.attrs);
    let fields = named_fields(input, "ToParams")?;

    let mut entries = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().unwrap();
        let config = parse_field_config(&field.attrs);

        if config.skip {
            continue;
        }

        let param_name = config.rename.unwrap_or_else(|| {
            apply_rename_all(&field_name.to_string(), struct_config.rename_all.as_deref())
        });

        entries.push(quote! {
            sproc_client::Parameter::input(#param_name, &self.#field_name)?
        });
    }

    let count = entries.len();

    Ok(quote! {
        impl #impl_generics sproc_client::ToParams for #name #ty_generics #where_clause {
            fn to_params(
                &self,
            ) -> ::std::result::Result<
                ::std::vec::Vec<sproc_client::Parameter>,
                sproc_client::TypeError,
            > {
                ::std::result::Result::Ok(::std::vec![#(#entries),*])
            }

            fn param_count(&self) -> ::std::option::Option<usize> {
                ::std::option::Option::Some(#count)
            }
        }
    })
}

/// Extract the named fields of a struct, or a spanned error.
fn named_fields<'a>(
    input: &'a DeriveInput,
    trait_name: &str,
) -> syn::Result<&'a syn::punctuated::Punctuated<syn::Field, syn::token::Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{trait_name} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{trait_name} can only be derived for structs"),
        )),
    }
}
