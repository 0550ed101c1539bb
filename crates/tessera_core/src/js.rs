//! JavaScript codegen helpers.
//!
//! The post-processing stage synthesizes small amounts of JavaScript; these
//! helpers keep generated identifiers and string literals well-formed.

/// Rewrite an arbitrary string into a valid JavaScript identifier fragment.
///
/// Every character outside `[A-Za-z0-9_$]` becomes `_`. A leading digit is
/// prefixed with `_` so the result can start an identifier.
pub fn sanitize_identifier(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 1);
    for (i, c) in input.chars().enumerate() {
        let valid = c.is_ascii_alphanumeric() || c == '_' || c == '$';
        if i == 0 && c.is_ascii_digit() {
            out.push('_');
        }
        out.push(if valid { c } else { '_' });
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// Whether `input` is usable as a JavaScript identifier without quoting.
pub fn is_valid_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Render a double-quoted JavaScript string literal.
pub fn quote_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push('"');
    for c in input.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
