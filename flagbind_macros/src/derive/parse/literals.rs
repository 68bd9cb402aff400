//! Literal parsing helpers for `#[flag(...)]` attributes.

use syn::meta::ParseNestedMeta;
use syn::{Expr, ExprLit, ExprUnary, Lit, LitStr, UnOp};

/// Parses the literal after `key =` using `extractor`, naming `expected` in
/// the error when the literal has the wrong kind.
fn parse_lit<T, F>(
    meta: &ParseNestedMeta,
    key: &str,
    expected: &str,
    extractor: F,
) -> syn::Result<T>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let literal = meta.value()?.parse::<Lit>()?;
    let span = literal.span();
    extractor(literal)
        .ok_or_else(|| syn::Error::new(span, format!("`{key}` must be a {expected}")))
}

/// Parses a string literal.
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    parse_lit(meta, key, "string literal", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

/// Parses a character literal.
pub(crate) fn lit_char(meta: &ParseNestedMeta, key: &str) -> syn::Result<char> {
    parse_lit(meta, key, "character literal", |lit| match lit {
        Lit::Char(c) => Some(c.value()),
        _ => None,
    })
}

/// Parses a marker key given either bare (`skip`) or as `skip = true`.
pub(crate) fn marker(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        parse_lit(meta, key, "boolean literal", |lit| match lit {
            Lit::Bool(b) => Some(b.value),
            _ => None,
        })
    } else {
        Ok(true)
    }
}

/// Parses a default value and renders it the way it would be typed on the
/// command line.
///
/// Strings are taken verbatim. Numbers keep their digits but lose any type
/// suffix, so `8080u16` becomes `8080` and `-1.5` stays `-1.5`.
pub(crate) fn default_text(meta: &ParseNestedMeta) -> syn::Result<String> {
    let expr = meta.value()?.parse::<Expr>()?;
    expr_text(&expr).ok_or_else(|| {
        syn::Error::new_spanned(
            &expr,
            "`default` must be a string, number, boolean or character literal",
        )
    })
}

fn expr_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => lit_text(lit),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: operand,
            ..
        }) => match &**operand {
            Expr::Lit(ExprLit {
                lit: Lit::Int(int), ..
            }) => Some(format!("-{}", int.base10_digits())),
            Expr::Lit(ExprLit {
                lit: Lit::Float(float),
                ..
            }) => Some(format!("-{}", float.base10_digits())),
            _ => None,
        },
        Expr::Group(group) => expr_text(&group.expr),
        _ => None,
    }
}

fn lit_text(lit: &Lit) -> Option<String> {
    match lit {
        Lit::Str(s) => Some(s.value()),
        Lit::Int(int) => Some(int.base10_digits().to_owned()),
        Lit::Float(float) => Some(float.base10_digits().to_owned()),
        Lit::Bool(b) => Some(b.value.to_string()),
        Lit::Char(c) => Some(c.value().to_string()),
        _ => None,
    }
}
