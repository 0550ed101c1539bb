//! Component-scoped style rewriting.
//!
//! Every selector gets the document's scope attribute appended to its last
//! compound, so the rule only matches elements tagged with the attribute.

use crate::selector::rewrite_selectors;

/// Rewrite `css` so each selector carries `scope_attr` (already bracketed,
/// e.g. `[data-v-1a2b3c]`).
pub fn rewrite_scoped(css: &str, scope_attr: &str) -> String {
    rewrite_selectors(css, &mut |selector| scope_selector_list(selector, scope_attr))
}

/// Scope a comma-separated selector list.
pub fn scope_selector_list(list: &str, scope_attr: &str) -> String {
    list.split(',')
        .map(|selector| scope_selector(selector.trim(), scope_attr))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Scope a single selector by attaching the attribute to its last compound.
fn scope_selector(selector: &str, scope_attr: &str) -> String {
    if selector.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = selector.split_whitespace().collect();
    let mut result = String::with_capacity(selector.len() + scope_attr.len());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            result.push(' ');
        }
        if i == parts.len() - 1 && !is_combinator(part) {
            result.push_str(&attach_attr(part, scope_attr));
        } else {
            result.push_str(part);
        }
    }
    result
}

fn is_combinator(part: &str) -> bool {
    matches!(part, ">" | "+" | "~")
}

/// Insert the attribute before any pseudo suffix so `.btn:hover` becomes
/// `.btn[attr]:hover` rather than `.btn:hover[attr]`.
fn attach_attr(compound: &str, scope_attr: &str) -> String {
    let pseudo = compound.find("::").or_else(|| compound.find(':'));
    match pseudo {
        Some(0) => format!("{scope_attr}{compound}"),
        Some(pos) => {
            let (base, rest) = compound.split_at(pos);
            format!("{base}{scope_attr}{rest}")
        }
        None => format!("{compound}{scope_attr}"),
    }
}
