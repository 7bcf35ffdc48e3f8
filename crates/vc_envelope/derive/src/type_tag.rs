use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{DeriveInput, Expr, ExprLit, GenericParam, Lit, LitStr, Meta};

use crate::TYPE_TAG_ATTRIBUTE_NAME;
use crate::manifest::envelope_path;

/// Find the single `#[type_tag = "..."]` attribute.
fn parse_tag(ast: &DeriveInput) -> syn::Result<LitStr> {
    let mut found: Option<LitStr> = None;

    for attr in &ast.attrs {
        if !attr.path().is_ident(TYPE_TAG_ATTRIBUTE_NAME) {
            continue;
        }

        let Meta::NameValue(name_value) = &attr.meta else {
            return Err(syn::Error::new(
                attr.span(),
                "expected `#[type_tag = \"...\"]`",
            ));
        };

        let Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) = &name_value.value
        else {
            return Err(syn::Error::new(
                name_value.value.span(),
                "the type tag must be a string literal",
            ));
        };

        if lit.value().is_empty() {
            return Err(syn::Error::new(lit.span(), "the type tag cannot be empty"));
        }

        if found.replace(lit.clone()).is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "duplicate `type_tag` attribute",
            ));
        }
    }

    found.ok_or_else(|| {
        syn::Error::new(
            ast.ident.span(),
            "missing `#[type_tag = \"...\"]` attribute",
        )
    })
}

/// Generate implementation codes for `TypeTag`
pub(crate) fn impl_type_tag(ast: &DeriveInput) -> syn::Result<TokenStream> {
    if let Some(param) = ast
        .generics
        .params
        .iter()
        .find(|param| !matches!(param, GenericParam::Lifetime(_)))
    {
        return Err(syn::Error::new(
            param.span(),
            "`TypeTag` cannot be derived for types with generic type or const parameters",
        ));
    }

    let tag = parse_tag(ast)?;
    let ident = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let vc_envelope = envelope_path();

    Ok(quote! {
        impl #impl_generics #vc_envelope::tag::TypeTag for #ident #ty_generics #where_clause {
            #[inline]
            fn type_tag() -> &'static str {
                #tag
            }
        }
    })
}
