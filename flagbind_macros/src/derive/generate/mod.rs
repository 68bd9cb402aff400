//! Token generation for the `Bindable` impl.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;
use syn::ext::IdentExt;

use super::parse::{FieldAttrs, FlagField};

/// Builds `impl Bindable for <input>` describing `fields` in order.
pub(crate) fn bindable_impl(
    input: &DeriveInput,
    fields: &[FlagField],
    krate: &TokenStream,
) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let entries = fields.iter().map(|field| field_tokens(field, krate));
    quote! {
        impl #impl_generics #krate::Bindable for #ident #ty_generics #where_clause {
            fn reflect(&mut self) -> #krate::Reflect<'_> {
                #krate::Reflect::Struct(::std::vec![#(#entries),*])
            }
        }
    }
}

fn field_tokens(field: &FlagField, krate: &TokenStream) -> TokenStream {
    let member = &field.ident;
    let name = member.unraw().to_string();
    let tag = tag_text(&field.attrs);
    let tag_call = (!tag.is_empty()).then(|| quote! { .tag(#tag) });
    let doc_call = field.doc.as_ref().map(|doc| quote! { .doc(#doc) });
    quote! {
        #krate::Field::new(#name, &mut self.#member) #tag_call #doc_call
    }
}

/// Renders attribute values as tag text understood by `flagbind`'s tag
/// parser. Every value is emitted as a quoted string.
pub(crate) fn tag_text(attrs: &FieldAttrs) -> String {
    let short = attrs.short.map(String::from);
    let keyed = [
        ("name", attrs.name.as_deref()),
        ("short", short.as_deref()),
        ("default", attrs.default.as_deref()),
        ("usage", attrs.usage.as_deref()),
        ("overrides", attrs.overrides.as_deref()),
        ("prefix", attrs.prefix.as_deref()),
    ];
    let mut entries: Vec<String> = keyed
        .into_iter()
        .filter_map(|(key, value)| value.map(|text| format!("{key} = \"{}\"", escape(text))))
        .collect();
    if attrs.hidden {
        entries.push(String::from("hidden"));
    }
    entries.join(", ")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
