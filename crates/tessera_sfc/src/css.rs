//! CSS validation and re-printing using LightningCSS.
//!
//! When the `native` feature is disabled (e.g. for wasm builds), a simple
//! passthrough implementation is used.

/// Parse and re-print a rewritten stylesheet. Returns the printed code and
/// any error messages; on error the input is returned unchanged alongside
/// the messages.
#[cfg(feature = "native")]
pub fn normalize(css: &str, filename: &str) -> (String, Vec<String>) {
    use lightningcss::printer::PrinterOptions;
    use lightningcss::stylesheet::{ParserOptions, StyleSheet};

    let parser_options = ParserOptions {
        filename: filename.to_string(),
        ..Default::default()
    };

    let stylesheet = match StyleSheet::parse(css, parser_options) {
        Ok(stylesheet) => stylesheet,
        Err(e) => {
            let mut message = String::from("CSS parse error: ");
            message.push_str(&e.to_string());
            return (css.to_string(), vec![message]);
        }
    };

    match stylesheet.to_css(PrinterOptions::default()) {
        Ok(result) => (result.code, vec![]),
        Err(e) => {
            use std::fmt::Write as _;
            let mut message = String::from("CSS print error: ");
            let _ = write!(&mut message, "{:?}", e);
            (css.to_string(), vec![message])
        }
    }
}

/// Passthrough used when LightningCSS is unavailable.
#[cfg(not(feature = "native"))]
pub fn normalize(css: &str, _filename: &str) -> (String, Vec<String>) {
    (css.to_string(), vec![])
}
