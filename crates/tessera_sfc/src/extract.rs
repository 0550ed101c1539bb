//! Block extraction.
//!
//! Splits one raw document into the script region and its embedded style
//! regions. A style region starts at a line whose first token is a dialect
//! keyword at column zero, optionally followed by `scoped`, `module` or
//! `module:<name>` modifiers, and spans every following line that is blank
//! or indented.
//!
//! The matched span is replaced in the script text by an equal number of
//! bare newlines so line numbers in the remaining script are unchanged;
//! the script compiler's source map stays accurate without any offset
//! bookkeeping. Matching is regex-based over the whole document and does
//! not attempt to validate nesting or escapes inside style content.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{ScriptRegion, StyleDialect, StyleRegion, DEFAULT_MODULE_BINDING};

// Longest keywords first so `stylus` is not cut short at `styl`.
static BLOCK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(stylus|styl|scss|sass|less|css)((?:[ \t]+(?:scoped|module(?::[A-Za-z_$][A-Za-z0-9_$]*)?))*)[ \t]*\r?$",
    )
    .expect("style block header pattern is valid")
});

/// Split raw source text into `(ScriptRegion, ordered StyleRegions)`.
pub fn extract(source: &str) -> (ScriptRegion, Vec<StyleRegion>) {
    let mut regions = Vec::new();
    let mut script = String::with_capacity(source.len());
    let mut cursor = 0usize;

    for caps in BLOCK_HEADER.captures_iter(source) {
        let Some(header) = caps.get(0) else { continue };
        if header.start() < cursor {
            // Header-shaped line inside a span already consumed.
            continue;
        }
        let Some(dialect) = caps.get(1).and_then(|m| StyleDialect::from_keyword(m.as_str()))
        else {
            continue;
        };

        let body_start = match source[header.end()..].find('\n') {
            Some(offset) => header.end() + offset + 1,
            None => source.len(),
        };
        let body_end = scan_block_body(source, body_start);
        let body = &source[body_start..body_end];
        if body.trim().is_empty() {
            // A keyword line with no indented block is script text.
            continue;
        }

        let (scoped, module) = parse_modifiers(caps.get(2).map_or("", |m| m.as_str()));
        let line = source[..header.start()].bytes().filter(|&b| b == b'\n').count() + 1;

        script.push_str(&source[cursor..header.start()]);
        let newlines = source[header.start()..body_end]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        for _ in 0..newlines {
            script.push('\n');
        }

        regions.push(StyleRegion {
            dialect,
            content: deindent(body),
            scoped,
            module,
            line,
        });
        cursor = body_end;
    }
    script.push_str(&source[cursor..]);

    let mut text = script.trim_end().to_string();
    text.push('\n');
    (ScriptRegion { text }, regions)
}

/// End offset of a block body starting at `pos`: consumes every line that
/// is blank or indented, stops at the first line that is neither.
fn scan_block_body(source: &str, mut pos: usize) -> usize {
    while pos < source.len() {
        let line_end = source[pos..]
            .find('\n')
            .map_or(source.len(), |offset| pos + offset + 1);
        let line = &source[pos..line_end];
        let blank = line.trim().is_empty();
        let indented = line.starts_with(' ') || line.starts_with('\t');
        if !blank && !indented {
            break;
        }
        pos = line_end;
    }
    pos
}

fn parse_modifiers(raw: &str) -> (bool, Option<String>) {
    let mut scoped = false;
    let mut module = None;
    for token in raw.split_whitespace() {
        if token == "scoped" {
            scoped = true;
        } else if token == "module" {
            module = Some(DEFAULT_MODULE_BINDING.to_string());
        } else if let Some(name) = token.strip_prefix("module:") {
            module = Some(name.to_string());
        }
    }
    (scoped, module)
}

/// Strip the common leading whitespace of the non-blank lines.
fn deindent(body: &str) -> String {
    let indent = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(leading_whitespace)
        .min()
        .unwrap_or(0);

    let mut out = String::with_capacity(body.len());
    for line in body.lines() {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(&line[indent..]);
            out.push('\n');
        }
    }
    out
}

/// Number of leading space/tab bytes.
fn leading_whitespace(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ' || b == b'\t').count()
}
