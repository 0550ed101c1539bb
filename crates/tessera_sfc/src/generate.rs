//! Generation stage.
//!
//! Pure reshaping of the extracted/transpiled regions into the flat ordered
//! artifact list. No style content is transformed here.

use crate::types::{ArtifactPart, CompiledScript, StyleRegion};

/// One `js` part first (when a script exists), then one `css` part per
/// style region in original order. The css parts' `module_bindings` stay
/// unset; the style compiler fills them during post-processing.
pub fn generate(compiled: Option<&CompiledScript>, regions: &[StyleRegion]) -> Vec<ArtifactPart> {
    let mut parts = Vec::with_capacity(usize::from(compiled.is_some()) + regions.len());

    if let Some(script) = compiled {
        parts.push(ArtifactPart::Js {
            content: script.code.clone(),
            source_map: script.map.clone(),
        });
    }

    for region in regions {
        parts.push(ArtifactPart::Css {
            content: region.content.trim().to_string(),
            module_bindings: None,
        });
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutputDialect, StyleDialect};

    fn region(dialect: StyleDialect, content: &str) -> StyleRegion {
        StyleRegion {
            dialect,
            content: content.to_string(),
            scoped: false,
            module: None,
            line: 1,
        }
    }

    #[test]
    fn test_generate_script_first_then_styles_in_order() {
        let compiled = CompiledScript {
            code: "var x = 1;\n".to_string(),
            dialect: OutputDialect::Js,
            map: None,
        };
        let regions = vec![
            region(StyleDialect::Scss, ".a { color: red; }\n"),
            region(StyleDialect::Less, ".b { color: blue; }\n"),
        ];

        let parts = generate(Some(&compiled), &regions);
        let kinds: Vec<&str> = parts.iter().map(ArtifactPart::kind).collect();
        assert_eq!(kinds, vec!["js", "css", "css"]);

        match &parts[1] {
            ArtifactPart::Css { content, .. } => assert_eq!(content, ".a { color: red; }"),
            other => panic!("expected css part, got {}", other.kind()),
        }
    }

    #[test]
    fn test_generate_without_script() {
        let regions = vec![region(StyleDialect::Css, ".a { color: red; }")];
        let parts = generate(None, &regions);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].kind(), "css");
    }

    #[test]
    fn test_generate_trims_style_content() {
        let regions = vec![region(StyleDialect::Css, "\n  .a { }\n\n")];
        let parts = generate(None, &regions);
        match &parts[0] {
            ArtifactPart::Css { content, .. } => assert_eq!(content, ".a { }"),
            other => panic!("expected css part, got {}", other.kind()),
        }
    }
}
