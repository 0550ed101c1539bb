//! Selector-context CSS walker.
//!
//! Both scoped rewriting and module rewriting only touch selectors;
//! declarations, at-rule headers, strings and comments must pass through
//! untouched. This walker owns that distinction so the two rewrites stay
//! stateless functions over selector text.

/// Rewrite every selector in `css` with `transform`.
///
/// Selectors inside conditional group rules (`@media`, `@supports`,
/// `@container`, `@layer`) are rewritten; `@keyframes` and other at-rule
/// bodies are copied verbatim.
pub fn rewrite_selectors(css: &str, transform: &mut dyn FnMut(&str) -> String) -> String {
    let mut walker = Walker {
        css,
        pos: 0,
        out: String::with_capacity(css.len() * 2),
    };
    walker.walk(transform);
    walker.out
}

struct Walker<'a> {
    css: &'a str,
    pos: usize,
    out: String,
}

impl<'a> Walker<'a> {
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.css.as_bytes().get(pos).copied()
    }

    /// Process rules until an unmatched `}` or end of input.
    fn walk(&mut self, transform: &mut dyn FnMut(&str) -> String) {
        loop {
            self.copy_trivia();
            match self.byte_at(self.pos) {
                None | Some(b'}') => return,
                _ => {}
            }

            let head_start = self.pos;
            let terminator = self.scan_head();
            let head = self.css[head_start..self.pos].to_string();

            match terminator {
                None => {
                    self.out.push_str(&head);
                    return;
                }
                Some(b';') => {
                    // Prelude-only at-rule (`@import`, `@charset`).
                    self.out.push_str(&head);
                    self.out.push(';');
                    self.pos += 1;
                }
                Some(b'}') => {
                    // Stray content before a close brace; leave it alone.
                    self.out.push_str(&head);
                    return;
                }
                Some(_) => {
                    self.pos += 1; // consume '{'
                    let trimmed = head.trim();
                    if let Some(name) = at_rule_name(trimmed) {
                        self.out.push_str(&head);
                        self.out.push('{');
                        if matches!(name, "media" | "supports" | "container" | "layer") {
                            self.walk(transform);
                            if self.byte_at(self.pos) == Some(b'}') {
                                self.out.push('}');
                                self.pos += 1;
                            }
                        } else {
                            self.copy_balanced();
                        }
                    } else {
                        self.out.push_str(&transform(trimmed));
                        self.out.push_str(" {");
                        self.copy_balanced();
                    }
                }
            }
        }
    }

    /// Copy whitespace and comments verbatim.
    fn copy_trivia(&mut self) {
        let start = self.pos;
        loop {
            match self.byte_at(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.byte_at(self.pos + 1) == Some(b'*') => {
                    self.pos += 2;
                    self.skip_comment_tail();
                }
                _ => break,
            }
        }
        self.out.push_str(&self.css[start..self.pos]);
    }

    /// Advance to the next structural byte (`{`, `;`, `}`) outside strings
    /// and comments; returns it, or `None` at end of input.
    fn scan_head(&mut self) -> Option<u8> {
        loop {
            match self.byte_at(self.pos) {
                None => return None,
                Some(b @ (b'{' | b';' | b'}')) => return Some(b),
                Some(q @ (b'"' | b'\'')) => {
                    self.pos += 1;
                    self.skip_string_tail(q);
                }
                Some(b'/') if self.byte_at(self.pos + 1) == Some(b'*') => {
                    self.pos += 2;
                    self.skip_comment_tail();
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Copy a brace-balanced block verbatim, consuming the closing `}`.
    fn copy_balanced(&mut self) {
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(b) = self.byte_at(self.pos) {
            match b {
                q @ (b'"' | b'\'') => {
                    self.pos += 1;
                    self.skip_string_tail(q);
                }
                b'/' if self.byte_at(self.pos + 1) == Some(b'*') => {
                    self.pos += 2;
                    self.skip_comment_tail();
                }
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => self.pos += 1,
            }
        }
        self.out.push_str(&self.css[start..self.pos]);
    }

    /// Position is just past the opening quote; advance past the closing
    /// one, honoring backslash escapes.
    fn skip_string_tail(&mut self, quote: u8) {
        while let Some(b) = self.byte_at(self.pos) {
            self.pos += 1;
            if b == b'\\' {
                self.pos += 1;
            } else if b == quote {
                break;
            }
        }
    }

    /// Position is just past `/*`; advance past the closing `*/`.
    fn skip_comment_tail(&mut self) {
        while let Some(b) = self.byte_at(self.pos) {
            if b == b'*' && self.byte_at(self.pos + 1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }
}

/// Name of the at-rule a block head opens, if it is one.
fn at_rule_name(head: &str) -> Option<&str> {
    let rest = head.strip_prefix('@')?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(rest.len());
    Some(&rest[..end])
}
