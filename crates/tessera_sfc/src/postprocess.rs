//! Post-processing stage.
//!
//! Consumes the generated artifact parts and synthesizes the supplemental
//! glue: export-binding resolution, the module-style hook, hot-reload
//! wiring. Style parts are rewritten for component or module scoping and
//! concatenated into one style artifact. Supplemental code is optionally
//! minified as a standalone unit and appended to the script artifact.

use serde_json::Value;
use tessera_core::{js, FxHashMap};
use tracing::debug;

use crate::error::PipelineError;
use crate::hmr;
use crate::services::{
    MinifyRequest, ModuleStyleOutput, ModuleStyleRequest, ScopedStyleOutput, ScopedStyleRequest,
    Services,
};
use crate::types::{
    ArtifactPart, ExportBinding, ModuleBindings, PipelineOutput, SourceDocument, StyleRegion,
};

/// Alias every piece of glue references.
pub const EXPORT_ALIAS: &str = "_sfc_main";

/// Name of the generated module-style hook.
const STYLE_HOOK: &str = "_sfc_injectStyles";

/// Resolve the export binding for `doc` against the compiled script text.
///
/// Without scope hoisting the alias reads the conventional commonjs
/// surface. With scope hoisting the choice is made by literal substring
/// search over the compiled text (not static analysis) and exactly one of
/// the three strategies fires.
pub fn resolve_export_binding(doc: &SourceDocument, compiled_code: &str) -> ExportBinding {
    if !doc.bundle.scope_hoist {
        return ExportBinding {
            alias: EXPORT_ALIAS.to_string(),
            prelude: vec![format!(
                "var {EXPORT_ALIAS} = exports.default || module.exports;"
            )],
            commonjs: false,
        };
    }

    let default_symbol = doc.id.export_default_symbol();
    if compiled_code.contains(&default_symbol) {
        return ExportBinding {
            alias: EXPORT_ALIAS.to_string(),
            prelude: vec![format!("var {EXPORT_ALIAS} = {default_symbol};")],
            commonjs: false,
        };
    }

    let exports_symbol = doc.id.exports_symbol();
    if compiled_code.contains(&exports_symbol) {
        return ExportBinding {
            alias: EXPORT_ALIAS.to_string(),
            prelude: vec![format!("var {EXPORT_ALIAS} = {exports_symbol};")],
            commonjs: false,
        };
    }

    ExportBinding {
        alias: EXPORT_ALIAS.to_string(),
        prelude: vec![
            format!("var {exports_symbol} = {{}};"),
            format!("var {EXPORT_ALIAS} = {exports_symbol};"),
        ],
        commonjs: true,
    }
}

/// Constructable exports carry their configuration on `.options`; unwrap
/// the alias before any glue uses it.
fn function_options_unwrap(alias: &str) -> String {
    format!("if (typeof {alias} === \"function\") {{\n  {alias} = {alias}.options;\n}}")
}

/// Build the module-style registration hook. Returns an empty string when
/// no region is module-scoped.
pub fn inject_module_styles(
    alias: &str,
    regions: &[StyleRegion],
    bindings_by_region: &FxHashMap<usize, ModuleBindings>,
) -> String {
    let mut assignments = Vec::new();
    for (index, region) in regions.iter().enumerate() {
        let Some(name) = region.module.as_deref() else {
            continue;
        };
        let mapping = bindings_by_region.get(&index).cloned().unwrap_or_default();
        let json = serde_json::to_string(&mapping).unwrap_or_else(|_| String::from("{}"));
        let target = if js::is_valid_identifier(name) {
            format!("this.{name}")
        } else {
            format!("this[{}]", js::quote_string(name))
        };
        assignments.push(format!("  {target} = {json};"));
    }

    if assignments.is_empty() {
        return String::new();
    }

    let mut code = String::with_capacity(128);
    code.push_str(&format!("function {STYLE_HOOK}() {{\n"));
    for assignment in &assignments {
        code.push_str(assignment);
        code.push('\n');
    }
    code.push_str("}\n");
    code.push_str(&format!(
        "{alias}.beforeCreate = {alias}.beforeCreate ? {alias}.beforeCreate.concat({STYLE_HOOK}) : [{STYLE_HOOK}];"
    ));
    code
}

/// Run the full post-processing stage and assemble the final output.
pub fn post_process(
    services: &Services,
    doc: &SourceDocument,
    parts: Vec<ArtifactPart>,
    regions: &[StyleRegion],
) -> Result<PipelineOutput, PipelineError> {
    let mut js_content: Option<String> = None;
    let mut source_map: Option<Value> = None;
    let mut css_contents: Vec<String> = Vec::new();

    for part in parts {
        match part {
            ArtifactPart::Js {
                content,
                source_map: map,
            } => {
                js_content = Some(content);
                source_map = map;
            }
            ArtifactPart::Css { content, .. } => css_contents.push(content),
            ArtifactPart::Map { .. } => {}
        }
    }
    debug_assert_eq!(css_contents.len(), regions.len());

    let (final_css, bindings_by_region) = compile_styles(services, doc, &css_contents, regions)?;

    let mut output_parts = Vec::new();
    let mut extra_dependencies = Vec::new();
    let mut commonjs_exports = false;

    if let Some(compiled) = js_content {
        let binding = resolve_export_binding(doc, &compiled);
        commonjs_exports = binding.commonjs;
        debug!(
            file = %doc.path,
            commonjs = binding.commonjs,
            "resolved export binding"
        );

        let mut glue: Vec<String> = binding.prelude.clone();
        glue.push(function_options_unwrap(&binding.alias));

        let hook = inject_module_styles(&binding.alias, regions, &bindings_by_region);
        if !hook.is_empty() {
            glue.push(hook);
        }

        if doc.bundle.hmr {
            let wiring = hmr::hmr_wiring(&binding.alias, doc.id.as_str(), !regions.is_empty());
            glue.push(wiring.code);
            extra_dependencies.extend(wiring.extra_dependencies);
        }

        let glue_text = glue.join("\n");
        let supplemental = if doc.bundle.minify && !doc.bundle.scope_hoist {
            minify_supplemental(services, &glue_text)?
        } else {
            format!("\n{glue_text}\n")
        };

        let mut content = compiled;
        content.push_str(&supplemental);
        output_parts.push(ArtifactPart::Js {
            content,
            source_map: source_map.clone(),
        });
        if let Some(map) = source_map {
            output_parts.push(ArtifactPart::Map { content: map });
        }
    }

    if !final_css.trim().is_empty() {
        output_parts.push(ArtifactPart::Css {
            content: final_css,
            module_bindings: None,
        });
    }

    Ok(PipelineOutput {
        parts: output_parts,
        commonjs_exports,
        extra_dependencies,
    })
}

/// Rewrite each style part per its region flags and concatenate the
/// results in original region order.
fn compile_styles(
    services: &Services,
    doc: &SourceDocument,
    css_contents: &[String],
    regions: &[StyleRegion],
) -> Result<(String, FxHashMap<usize, ModuleBindings>), PipelineError> {
    let scope_id = doc.scope_id();
    let styles = services.style_processor();
    let mut bindings_by_region: FxHashMap<usize, ModuleBindings> = FxHashMap::default();
    let mut final_css = String::new();

    for (index, region) in regions.iter().enumerate() {
        let Some(content) = css_contents.get(index) else {
            break;
        };
        let mut code = content.clone();

        if region.scoped {
            let ScopedStyleOutput { code: rewritten, errors } =
                styles.compile_scoped(&ScopedStyleRequest {
                    source: &code,
                    filename: &doc.path,
                    scope_id: &scope_id,
                    dialect: region.dialect,
                });
            if let Some(first) = errors.into_iter().next() {
                return Err(PipelineError::StyleCompile {
                    file: doc.path.clone(),
                    source: first,
                });
            }
            code = rewritten;
        }

        if region.module.is_some() {
            let ModuleStyleOutput {
                code: rewritten,
                bindings,
                errors,
            } = styles.compile_modules(&ModuleStyleRequest {
                source: &code,
                filename: &doc.path,
                dialect: region.dialect,
            });
            if let Some(first) = errors.into_iter().next() {
                return Err(PipelineError::StyleCompile {
                    file: doc.path.clone(),
                    source: first,
                });
            }
            bindings_by_region.insert(index, bindings);
            code = rewritten;
        }

        if !code.trim().is_empty() {
            if !final_css.is_empty() {
                final_css.push('\n');
            }
            final_css.push_str(code.trim_end());
        }
    }

    Ok((final_css, bindings_by_region))
}

/// Minify the supplemental block alone and wrap it so temporaries stay out
/// of the enclosing module scope.
fn minify_supplemental(services: &Services, glue: &str) -> Result<String, PipelineError> {
    let Some(minifier) = services.minifier() else {
        return Err(PipelineError::MinifierUnavailable);
    };
    let output = minifier.minify(&MinifyRequest {
        source: glue,
        toplevel: true,
    });
    if let Some(error) = output.error {
        return Err(PipelineError::Minify { source: error });
    }
    Ok(format!("\n(function () {{ {} }})();\n", output.code.trim()))
}
