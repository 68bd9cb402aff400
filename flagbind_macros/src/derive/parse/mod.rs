//! Parsing of `#[flag(...)]` attributes and doc comments.

mod literals;

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, Meta, Visibility};

use literals::{default_text, lit_char, lit_str, marker};

/// Struct-level attribute values.
#[derive(Default)]
pub(crate) struct StructAttrs {
    pub crate_path: Option<syn::Path>,
}

impl StructAttrs {
    /// Path the generated impl names `flagbind` items through.
    pub(crate) fn crate_root(&self) -> TokenStream {
        self.crate_path.as_ref().map_or_else(
            || quote::quote!(::flagbind),
            ToTokens::to_token_stream,
        )
    }
}

/// Field-level attribute values.
#[derive(Default, Debug, PartialEq, Eq)]
pub(crate) struct FieldAttrs {
    pub name: Option<String>,
    pub short: Option<char>,
    pub default: Option<String>,
    pub usage: Option<String>,
    pub overrides: Option<String>,
    pub prefix: Option<String>,
    pub skip: bool,
    pub hidden: bool,
}

/// A field the generated impl describes.
pub(crate) struct FlagField {
    pub ident: syn::Ident,
    pub attrs: FieldAttrs,
    pub doc: Option<String>,
}

/// Everything the generator needs from the input struct.
pub(crate) struct ParsedInput {
    pub attrs: StructAttrs,
    pub fields: Vec<FlagField>,
}

/// Iterate all `#[flag(...)]` attributes once and apply a callback.
fn parse_flag_attrs<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("flag")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn duplicate(meta: &ParseNestedMeta, key: &str) -> syn::Error {
    meta.error(format!("duplicate `{key}` key"))
}

fn set_once<T>(
    slot: &mut Option<T>,
    meta: &ParseNestedMeta,
    key: &str,
    value: T,
) -> syn::Result<()> {
    if slot.is_some() {
        return Err(duplicate(meta, key));
    }
    *slot = Some(value);
    Ok(())
}

/// Extracts `#[flag(...)]` metadata applied to the struct itself.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_flag_attrs(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            let path: syn::Path =
                syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
            return set_once(&mut out.crate_path, meta, "crate", path);
        }
        Err(meta.error("unknown struct-level `flag` key; expected `crate`"))
    })?;
    Ok(out)
}

/// Parses the `#[flag(...)]` attributes of one field.
///
/// Unknown keys are rejected so a typo fails the build.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_flag_attrs(attrs, |meta| {
        let key = meta
            .path
            .get_ident()
            .map(ToString::to_string)
            .unwrap_or_default();
        match key.as_str() {
            "name" => {
                let s = lit_str(meta, "name")?;
                if s.value().is_empty() {
                    return Err(syn::Error::new(s.span(), "`name` must not be empty"));
                }
                set_once(&mut out.name, meta, "name", s.value())
            }
            "short" => {
                let c = lit_char(meta, "short")?;
                if !c.is_ascii_alphanumeric() {
                    return Err(meta.error("`short` must be an ASCII letter or digit"));
                }
                set_once(&mut out.short, meta, "short", c)
            }
            "default" => {
                let text = default_text(meta)?;
                set_once(&mut out.default, meta, "default", text)
            }
            "usage" => {
                let s = lit_str(meta, "usage")?;
                set_once(&mut out.usage, meta, "usage", s.value())
            }
            "overrides" => {
                let s = lit_str(meta, "overrides")?;
                set_once(&mut out.overrides, meta, "overrides", s.value())
            }
            "prefix" => {
                let s = lit_str(meta, "prefix")?;
                set_once(&mut out.prefix, meta, "prefix", s.value())
            }
            "skip" => {
                out.skip = marker(meta, "skip")?;
                Ok(())
            }
            "hidden" => {
                out.hidden = marker(meta, "hidden")?;
                Ok(())
            }
            _ => Err(meta.error(
                "unknown `flag` key; expected one of `name`, `short`, `default`, `usage`, \
                 `overrides`, `prefix`, `skip`, `hidden`",
            )),
        }
    })?;
    Ok(out)
}

/// First paragraph of the doc comment, lines joined by single spaces.
pub(crate) fn doc_summary(attrs: &[Attribute]) -> Option<String> {
    let mut words: Vec<String> = Vec::new();
    let texts = attrs.iter().filter_map(|attr| match &attr.meta {
        Meta::NameValue(nv) if nv.path.is_ident("doc") => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Some(s.value()),
            _ => None,
        },
        _ => None,
    });
    'paragraph: for text in texts {
        for line in text.split('\n').map(str::trim) {
            if line.is_empty() {
                if words.is_empty() {
                    continue;
                }
                break 'paragraph;
            }
            words.push(line.to_owned());
        }
    }
    (!words.is_empty()).then(|| words.join(" "))
}

/// Gathers the struct attributes and the fields to describe.
///
/// Every field's attribute is validated, including fields that are then
/// left out for being private or marked `skip`.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Flags requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Flags can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::new();
    for field in named {
        let field_attrs = parse_field_attrs(&field.attrs)?;
        if matches!(field.vis, Visibility::Inherited) || field_attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        fields.push(FlagField {
            ident,
            attrs: field_attrs,
            doc: doc_summary(&field.attrs),
        });
    }
    Ok(ParsedInput { attrs, fields })
}

#[cfg(test)]
mod tests;
