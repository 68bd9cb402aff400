//! Procedural macros for `flagbind`.
//!
//! `#[derive(Flags)]` implements `flagbind::Bindable` for a struct with named
//! fields. Every public field is described in declaration order together
//! with the tag text assembled from its `#[flag(...)]` attribute and the
//! first paragraph of its doc comment, which serves as usage text when the
//! attribute sets none. Private fields and fields marked `skip` are left out.
//!
//! Attribute values are checked while the macro expands, so a misspelt key
//! or a shorthand that is not a single character fails the build rather
//! than the later call to `flagbind::bind`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `flagbind::Bindable`.
///
/// Field keys: `name`, `short`, `default`, `usage`, `overrides`, `prefix`,
/// `skip` and `hidden`. The struct-level key `crate = "path"` points the
/// generated code at a renamed dependency.
#[proc_macro_derive(Flags, attributes(flag))]
pub fn derive_flags(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
