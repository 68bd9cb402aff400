//! Expansion of `#[derive(Flags)]`.

mod generate;
mod parse;

use proc_macro2::TokenStream;
use syn::DeriveInput;

/// Parse `input` and produce the `Bindable` impl.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let parsed = parse::parse_input(input)?;
    Ok(generate::bindable_impl(
        input,
        &parsed.fields,
        &parsed.attrs.crate_root(),
    ))
}
