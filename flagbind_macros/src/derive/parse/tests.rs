//! Tests for `#[flag(...)]` attribute and doc comment parsing.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

use super::{FieldAttrs, parse_input, parse_struct_attrs};

fn single_field_attrs(input: &DeriveInput) -> Result<FieldAttrs> {
    let mut parsed = parse_input(input).map_err(|err| anyhow!("{err}"))?;
    ensure!(parsed.fields.len() == 1, "expected one field");
    parsed
        .fields
        .pop()
        .map(|field| field.attrs)
        .ok_or_else(|| anyhow!("no field"))
}

fn parse_error(input: &DeriveInput) -> Result<String> {
    match parse_input(input) {
        Ok(_) => Err(anyhow!("input should be rejected")),
        Err(err) => Ok(err.to_string()),
    }
}

#[test]
fn parses_every_field_key() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Demo {
            #[flag(name = "log", short = 'l', default = "info", usage = "level")]
            #[flag(overrides = "verbosity", prefix = "p", hidden)]
            pub level: String,
        }
    };
    let attrs = single_field_attrs(&input)?;
    let expected = FieldAttrs {
        name: Some("log".into()),
        short: Some('l'),
        default: Some("info".into()),
        usage: Some("level".into()),
        overrides: Some("verbosity".into()),
        prefix: Some("p".into()),
        skip: false,
        hidden: true,
    };
    ensure!(attrs == expected, "parsed {attrs:?}");
    Ok(())
}

#[rstest]
#[case::string(quote::quote!("a,b"), "a,b")]
#[case::int(quote::quote!(8080), "8080")]
#[case::suffixed(quote::quote!(8080u16), "8080")]
#[case::negative(quote::quote!(-3), "-3")]
#[case::float(quote::quote!(-1.5), "-1.5")]
#[case::boolean(quote::quote!(true), "true")]
#[case::character(quote::quote!('x'), "x")]
fn renders_default_literals(
    #[case] literal: proc_macro2::TokenStream,
    #[case] expected: &str,
) -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Demo {
            #[flag(default = #literal)]
            pub value: String,
        }
    };
    let attrs = single_field_attrs(&input)?;
    ensure!(
        attrs.default.as_deref() == Some(expected),
        "default was {:?}",
        attrs.default
    );
    Ok(())
}

#[test]
fn leaves_out_private_and_skipped_fields() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Demo {
            pub first: u8,
            hidden_state: u8,
            #[flag(skip)]
            pub cache: Vec<u8>,
            pub(crate) last: u8,
        }
    };
    let parsed = parse_input(&input).map_err(|err| anyhow!("{err}"))?;
    let names: Vec<String> = parsed
        .fields
        .iter()
        .map(|field| field.ident.to_string())
        .collect();
    ensure!(names == ["first", "last"], "fields were {names:?}");
    Ok(())
}

#[test]
fn collects_first_doc_paragraph() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Demo {
            /// Number of worker
            /// threads to start.
            ///
            /// Extra detail that is not usage text.
            pub workers: u8,
        }
    };
    let parsed = parse_input(&input).map_err(|err| anyhow!("{err}"))?;
    let doc = parsed.fields.first().and_then(|field| field.doc.clone());
    ensure!(
        doc.as_deref() == Some("Number of worker threads to start."),
        "doc was {doc:?}"
    );
    Ok(())
}

#[test]
fn reads_crate_override() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[flag(crate = "renamed::flagbind")]
        struct Demo {
            pub value: u8,
        }
    };
    let parsed = parse_input(&input).map_err(|err| anyhow!("{err}"))?;
    let path = parsed
        .attrs
        .crate_path
        .ok_or_else(|| anyhow!("crate path missing"))?;
    ensure!(
        quote::quote!(#path).to_string() == "renamed :: flagbind",
        "unexpected path"
    );
    Ok(())
}

#[rstest]
#[case::absent(parse_quote!(#[derive(Flags)]), ":: flagbind")]
#[case::plain(parse_quote!(#[flag(crate = "cli_flags")]), "cli_flags")]
#[case::reexported(parse_quote!(#[flag(crate = "app::deps::flagbind")]), "app :: deps :: flagbind")]
#[case::leading_colons(parse_quote!(#[flag(crate = "::vendored")]), ":: vendored")]
fn crate_root_follows_struct_attribute(
    #[case] attr: syn::Attribute,
    #[case] expected: &str,
) -> Result<()> {
    let attrs = parse_struct_attrs(&[attr]).map_err(|err| anyhow!("{err}"))?;
    let root = attrs.crate_root().to_string();
    ensure!(root == expected, "crate root was {root}");
    Ok(())
}

#[rstest]
#[case::bad_crate_path(
    parse_quote! { #[flag(crate = "not a path")] struct Demo { pub a: u8 } },
    "unexpected token"
)]
#[case::duplicate_crate(
    parse_quote! { #[flag(crate = "a", crate = "b")] struct Demo { pub a: u8 } },
    "duplicate `crate` key"
)]
#[case::unknown_key(
    parse_quote! { struct Demo { #[flag(colour = "red")] pub a: u8 } },
    "unknown `flag` key"
)]
#[case::long_short(
    parse_quote! { struct Demo { #[flag(short = '-')] pub a: u8 } },
    "`short` must be an ASCII letter or digit"
)]
#[case::short_string(
    parse_quote! { struct Demo { #[flag(short = "v")] pub a: u8 } },
    "`short` must be a character literal"
)]
#[case::empty_name(
    parse_quote! { struct Demo { #[flag(name = "")] pub a: u8 } },
    "`name` must not be empty"
)]
#[case::duplicate(
    parse_quote! { struct Demo { #[flag(usage = "a", usage = "b")] pub a: u8 } },
    "duplicate `usage` key"
)]
#[case::expression_default(
    parse_quote! { struct Demo { #[flag(default = 1 + 1)] pub a: u8 } },
    "`default` must be a string, number, boolean or character literal"
)]
#[case::private_field_still_checked(
    parse_quote! { struct Demo { #[flag(bogus)] a: u8 } },
    "unknown `flag` key"
)]
#[case::tuple_struct(parse_quote! { struct Demo(pub u8); }, "named fields")]
#[case::enumeration(parse_quote! { enum Demo { A } }, "only be derived for structs")]
#[case::struct_key(
    parse_quote! { #[flag(prefix = "x")] struct Demo { pub a: u8 } },
    "expected `crate`"
)]
fn rejects_invalid_input(#[case] input: DeriveInput, #[case] expected: &str) -> Result<()> {
    let message = parse_error(&input)?;
    ensure!(message.contains(expected), "message was {message:?}");
    Ok(())
}
