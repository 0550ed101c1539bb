//! Module-scoped style rewriting.
//!
//! Class selectors are renamed to a document-local form and the discovered
//! mapping is returned so post-processing can expose it to the script.

use crate::selector::rewrite_selectors;
use crate::types::ModuleBindings;

/// Rename every class selector in `css` to `_<tag>_<local>` and collect
/// the local-to-generated mapping. Repeated references to a class resolve
/// to the same generated name.
pub fn rewrite_modules(css: &str, tag: &str) -> (String, ModuleBindings) {
    let mut bindings = ModuleBindings::new();
    let code = rewrite_selectors(css, &mut |selector| {
        rename_classes(selector, tag, &mut bindings)
    });
    (code, bindings)
}

fn rename_classes(selector: &str, tag: &str, bindings: &mut ModuleBindings) -> String {
    let mut out = String::with_capacity(selector.len() + 16);
    let mut rest = selector;

    while let Some(dot) = rest.find('.') {
        let (before, after_dot) = rest.split_at(dot);
        out.push_str(before);
        let after = &after_dot[1..];
        let end = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(after.len());

        let starts_like_class = end > 0
            && after
                .as_bytes()
                .first()
                .is_some_and(|b| !b.is_ascii_digit() && *b != b'-');
        if !starts_like_class {
            out.push('.');
            rest = after;
            continue;
        }

        let local = &after[..end];
        let hashed = bindings
            .entry(local.to_string())
            .or_insert_with(|| format!("_{tag}_{local}"))
            .clone();
        out.push('.');
        out.push_str(&hashed);
        rest = &after[end..];
    }
    out.push_str(rest);
    out
}
