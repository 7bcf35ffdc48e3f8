use std::env;
use std::path::PathBuf;

use toml_edit::{Document, Item, Table};

const ENVELOPE_CRATE: &str = "vc_envelope";
const FACADE_CRATE: &str = "vc_any";
const FACADE_MODULE: &str = "envelope";

/// Locate the path of `vc_envelope` as seen from the caller's Cargo.toml.
///
/// # Resolution rules
///
/// 1. `vc_envelope` listed in `dependencies`: `::vc_envelope`.
/// 2. `vc_any` listed in `dependencies`: `::vc_any::envelope`.
/// 3. Repeat step 1-2 in `dev-dependencies`.
/// 4. Otherwise, and when the manifest cannot be read, `::vc_envelope`.
///
/// `vc_envelope` itself resolves through step 4, its crate root declares
/// `extern crate self as vc_envelope;`.
pub(crate) fn envelope_path() -> syn::Path {
    read_manifest()
        .and_then(|manifest| resolve(&manifest))
        .unwrap_or_else(|| absolute(&[ENVELOPE_CRATE]))
}

fn read_manifest() -> Option<Document<Box<str>>> {
    let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
    path.push("Cargo.toml");

    let manifest = std::fs::read_to_string(path).ok()?.into_boxed_str();
    Document::parse(manifest).ok()
}

fn resolve(manifest: &Table) -> Option<syn::Path> {
    ["dependencies", "dev-dependencies"]
        .into_iter()
        .filter_map(|key| match manifest.get(key) {
            Some(Item::Table(deps)) => Some(deps),
            _ => None,
        })
        .find_map(find_in_deps)
}

fn find_in_deps(deps: &Table) -> Option<syn::Path> {
    if deps.contains_key(ENVELOPE_CRATE) {
        Some(absolute(&[ENVELOPE_CRATE]))
    } else if deps.contains_key(FACADE_CRATE) {
        Some(absolute(&[FACADE_CRATE, FACADE_MODULE]))
    } else {
        None
    }
}

fn absolute(segments: &[&str]) -> syn::Path {
    let segments = segments
        .iter()
        .map(|name| syn::PathSegment::from(syn::Ident::new(name, proc_macro2::Span::call_site())));

    syn::Path {
        leading_colon: Some(Default::default()),
        segments: segments.collect(),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use syn::parse_quote;
    use toml_edit::Document;

    use super::resolve;

    fn resolve_str(manifest: &str) -> Option<syn::Path> {
        resolve(&Document::parse(manifest).unwrap())
    }

    #[test]
    fn direct_dependency_wins() {
        let manifest = r#"
            [dependencies]
            vc_any = "0.0.1"
            vc_envelope = "0.0.1"
        "#;
        assert_eq!(resolve_str(manifest), Some(parse_quote!(::vc_envelope)));
    }

    #[test]
    fn facade_dependency() {
        let manifest = r#"
            [dependencies]
            serde = "1"

            [dev-dependencies]
            vc_any = { path = "../vc_any" }
        "#;
        assert_eq!(resolve_str(manifest), Some(parse_quote!(::vc_any::envelope)));
    }

    #[test]
    fn no_dependency() {
        let manifest = r#"
            [package]
            name = "vc_envelope"
        "#;
        assert_eq!(resolve_str(manifest), None);
    }
}
