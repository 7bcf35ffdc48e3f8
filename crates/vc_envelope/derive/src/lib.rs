//! See following macros:
//!
//! - [`TypeTag`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static TYPE_TAG_ATTRIBUTE_NAME: &str = "type_tag";

// -----------------------------------------------------------------------------
// Modules

mod manifest;
mod type_tag;

// -----------------------------------------------------------------------------
// Macros

/// # Stable Type Tag Derivation
///
/// `#[derive(TypeTag)]` implements `vc_envelope::tag::TypeTag`.
///
/// The tag must be given explicitly, it is the identifier written into the
/// `typeName` field of an envelope and must stay stable across renames:
///
/// ```rust, ignore
/// #[derive(TypeTag)]
/// #[type_tag = "geometry::Point"]
/// struct Point { x: i32, y: i32 }
/// ```
///
/// Types with generic type or const parameters are rejected, since all
/// instantiations would share one tag. Lifetime parameters are allowed.
///
/// The generated impl names `vc_envelope` directly, or `vc_any::envelope`
/// when the calling crate only depends on the `vc_any` facade.
///
/// This attribute can only be applied at the type level.
#[proc_macro_derive(TypeTag, attributes(type_tag))]
pub fn derive_type_tag(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    type_tag::impl_type_tag(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
