//! End-to-end pipeline scenarios against fake external services.

use std::sync::Arc;

use tessera_sfc::{
    ArtifactPart, BundleOptions, CompiledScript, Minifier, MinifyOutput, MinifyRequest,
    OutputDialect, Pipeline, ScriptCompileRequest, ScriptCompiler, ScriptCompilerHandle,
    ServiceError, Services, SourceDocument, HOT_API_MODULE,
};

/// Echoes the script region back with a marker, emitting a source map on
/// request.
struct EchoCompiler;

impl ScriptCompiler for EchoCompiler {
    fn compile(&self, request: &ScriptCompileRequest<'_>) -> Result<CompiledScript, ServiceError> {
        let map = request.source_map.then(|| {
            serde_json::json!({
                "version": 3,
                "sources": [request.source_path],
                "mappings": "",
            })
        });
        Ok(CompiledScript {
            code: format!("// {}\n{}", request.filename, request.source),
            dialect: OutputDialect::Js,
            map,
        })
    }
}

/// Rejects everything, tagged with the offending file name.
struct RefusingCompiler;

impl ScriptCompiler for RefusingCompiler {
    fn compile(&self, request: &ScriptCompileRequest<'_>) -> Result<CompiledScript, ServiceError> {
        Err(ServiceError::new(format!(
            "unexpected token in {}",
            request.filename
        )))
    }
}

struct FlattenMinifier;

impl Minifier for FlattenMinifier {
    fn minify(&self, request: &MinifyRequest<'_>) -> MinifyOutput {
        let code = request
            .source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("");
        MinifyOutput { code, error: None }
    }
}

fn pipeline() -> Pipeline {
    Pipeline::new(Services::new(ScriptCompilerHandle::preloaded(Arc::new(
        EchoCompiler,
    ))))
}

fn js_content(parts: &[ArtifactPart]) -> &str {
    match &parts[0] {
        ArtifactPart::Js { content, .. } => content,
        other => panic!("expected js part first, got {}", other.kind()),
    }
}

fn css_content(parts: &[ArtifactPart]) -> &str {
    match parts.last() {
        Some(ArtifactPart::Css { content, .. }) => content,
        _ => panic!("expected a css part"),
    }
}

#[test]
fn script_only_document_yields_single_js_artifact() {
    let doc = SourceDocument::new("App.tsa", "count = 0\n", BundleOptions::default());
    let output = pipeline().compile(&doc).unwrap();

    assert_eq!(output.parts.len(), 1);
    let content = js_content(&output.parts);
    assert!(content.contains("count = 0"));
    assert!(content.contains("var _sfc_main = exports.default || module.exports;"));
    assert!(!output.commonjs_exports);
    assert!(output.extra_dependencies.is_empty());
}

#[test]
fn style_regions_are_recovered_in_document_order() {
    let source = "\
setup()
scss
  .first { color: red; }
less
  .second { color: blue; }
";
    let doc = SourceDocument::new("Mixed.tsa", source, BundleOptions::default());
    let output = pipeline().compile(&doc).unwrap();

    let kinds: Vec<&str> = output.parts.iter().map(ArtifactPart::kind).collect();
    assert_eq!(kinds, vec!["js", "css"]);

    let css = css_content(&output.parts);
    let first = css.find(".first").expect("first region present");
    let second = css.find(".second").expect("second region present");
    assert!(first < second);
}

#[test]
fn module_scoped_regions_share_one_hook() {
    let source = "\
widget = { name: \"widget\" }
css module
  .btn { color: red; }
css module:theme
  .bg { color: blue; }
";
    let doc = SourceDocument::new("Widget.tsa", source, BundleOptions::default());
    let output = pipeline().compile(&doc).unwrap();

    let content = js_content(&output.parts);
    let tag = tessera_core::hash::hash_prefix("Widget.tsa", 6);
    assert!(content.contains(&format!("this.$style = {{\"btn\":\"_{tag}_btn\"}};")));
    assert!(content.contains(&format!("this.theme = {{\"bg\":\"_{tag}_bg\"}};")));
    assert_eq!(content.matches("function _sfc_injectStyles()").count(), 1);
    assert!(content.contains("beforeCreate"));

    // The style artifact carries the renamed classes.
    let css = css_content(&output.parts);
    assert!(css.contains(&format!("_{tag}_btn")));
    assert!(css.contains(&format!("_{tag}_bg")));
}

#[test]
fn scoped_styles_use_a_deterministic_scope_id() {
    let source = "\
page = {}
css scoped
  .page { margin: 0; }
";
    let doc_a = SourceDocument::new("Page.tsa", source, BundleOptions::default());
    let doc_b = SourceDocument::new("Page.tsa", source, BundleOptions::default());
    let pipeline = pipeline();

    let css_a = pipeline
        .compile(&doc_a)
        .map(|o| css_content(&o.parts).to_string())
        .unwrap();
    let css_b = pipeline
        .compile(&doc_b)
        .map(|o| css_content(&o.parts).to_string())
        .unwrap();

    assert_eq!(css_a, css_b);
    assert!(css_a.contains(&doc_a.scope_id()));
}

#[test]
fn hmr_wiring_and_extra_dependency() {
    let source = "\
app = {}
css
  .app { color: red; }
";
    let doc = SourceDocument::new(
        "App.tsa",
        source,
        BundleOptions {
            hmr: true,
            ..Default::default()
        },
    );
    let output = pipeline().compile(&doc).unwrap();

    let content = js_content(&output.parts);
    assert!(content.contains("if (module.hot) {"));
    assert!(content.contains("createRecord"));
    assert!(content.contains("reloadStyles"));
    assert_eq!(output.extra_dependencies, vec![HOT_API_MODULE.to_string()]);
}

#[test]
fn hmr_without_styles_declares_no_extra_dependency() {
    let doc = SourceDocument::new(
        "Plain.tsa",
        "plain = {}\n",
        BundleOptions {
            hmr: true,
            ..Default::default()
        },
    );
    let output = pipeline().compile(&doc).unwrap();

    let content = js_content(&output.parts);
    assert!(content.contains("if (module.hot) {"));
    assert!(!content.contains("reloadStyles"));
    assert!(output.extra_dependencies.is_empty());
}

#[test]
fn source_map_artifact_sits_between_js_and_css() {
    let source = "\
x = 1
css
  .a { color: red; }
";
    let doc = SourceDocument::new(
        "Mapped.tsa",
        source,
        BundleOptions {
            source_maps: true,
            ..Default::default()
        },
    );
    let output = pipeline().compile(&doc).unwrap();

    let kinds: Vec<&str> = output.parts.iter().map(ArtifactPart::kind).collect();
    assert_eq!(kinds, vec!["js", "map", "css"]);
}

#[test]
fn scope_hoist_without_linker_symbols_raises_commonjs_flag() {
    let doc = SourceDocument::new(
        "Legacy.tsa",
        "legacy = {}\n",
        BundleOptions {
            scope_hoist: true,
            ..Default::default()
        },
    );
    let output = pipeline().compile(&doc).unwrap();

    assert!(output.commonjs_exports);
    let content = js_content(&output.parts);
    assert!(content.contains(&format!("var {} = {{}};", doc.id.exports_symbol())));
}

#[test]
fn minified_glue_is_wrapped_and_compiled_body_untouched() {
    let doc = SourceDocument::new(
        "Min.tsa",
        "answer = 42\n",
        BundleOptions {
            minify: true,
            ..Default::default()
        },
    );
    let services = Services::new(ScriptCompilerHandle::preloaded(Arc::new(EchoCompiler)))
        .with_minifier(Arc::new(FlattenMinifier));
    let output = Pipeline::new(services).compile(&doc).unwrap();

    let content = js_content(&output.parts);
    assert!(content.starts_with("// Min.tsa\nanswer = 42\n"));
    assert!(content.contains("(function () {"));
    assert!(content.contains("})();"));
}

#[test]
fn compiler_errors_abort_the_document() {
    let services = Services::new(ScriptCompilerHandle::preloaded(Arc::new(RefusingCompiler)));
    let doc = SourceDocument::new("Broken.tsa", "oops(\n", BundleOptions::default());

    let err = Pipeline::new(services).compile(&doc).unwrap_err();
    assert_eq!(err.file(), Some("Broken.tsa"));
    assert!(err.to_string().contains("unexpected token"));
}

#[test]
fn style_only_document_has_no_js_artifact() {
    let source = "\
css
  .lonely { color: red; }
";
    let doc = SourceDocument::new("Styles.tsa", source, BundleOptions::default());
    let output = pipeline().compile(&doc).unwrap();

    let kinds: Vec<&str> = output.parts.iter().map(ArtifactPart::kind).collect();
    assert_eq!(kinds, vec!["css"]);
}
