//! Pipeline type definitions.
//!
//! Everything here is created fresh per document compile and dropped once
//! the artifact list is handed back to the host; nothing is shared across
//! documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tessera_core::hash;

/// Binding name used when a module-scoped region does not name one.
pub const DEFAULT_MODULE_BINDING: &str = "$style";

/// Stable identifier for a document, derived from its relative path.
///
/// Rendered as a short hex token so it can be embedded in generated
/// JavaScript identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Derive the identifier from a relative path.
    pub fn derive(path: &str) -> Self {
        Self(hash::hash_prefix(path, 8))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Global identifier the linker assigns to the module's default export
    /// under scope hoisting.
    pub fn export_default_symbol(&self) -> String {
        format!("${}$export$default", self.0)
    }

    /// Global identifier the linker assigns to the module's commonjs
    /// exports object under scope hoisting.
    pub fn exports_symbol(&self) -> String {
        format!("${}$exports", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bundler mode flags for one compile invocation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleOptions {
    /// Whether the host links modules by scope hoisting.
    pub scope_hoist: bool,

    /// Whether supplemental glue code should be minified.
    pub minify: bool,

    /// Whether to request a source map from the script compiler.
    pub source_maps: bool,

    /// Whether to emit hot-reload wiring.
    pub hmr: bool,
}

/// One source document handed in by the host bundler. Immutable once read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    /// Relative path, used for error reporting and identifier derivation.
    pub path: String,

    /// Stable identifier derived from `path`.
    pub id: DocumentId,

    /// Raw document text.
    pub source: String,

    /// Bundler mode flags.
    pub bundle: BundleOptions,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>, source: impl Into<String>, bundle: BundleOptions) -> Self {
        let path = path.into();
        let id = DocumentId::derive(&path);
        Self {
            path,
            id,
            source: source.into(),
            bundle,
        }
    }

    /// Attribute used to isolate component-scoped styles, stable for equal
    /// paths: `data-v-` plus the last six hex characters of the path hash.
    pub fn scope_id(&self) -> String {
        format!("data-v-{}", hash::hash_suffix(&self.path, 6))
    }
}

/// Style source languages recognized by keyword at the start of an
/// embedded block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleDialect {
    Css,
    Scss,
    Sass,
    Less,
    Stylus,
}

impl StyleDialect {
    /// Map a block keyword to its dialect. `styl` is shorthand for stylus.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "css" => Some(Self::Css),
            "scss" => Some(Self::Scss),
            "sass" => Some(Self::Sass),
            "less" => Some(Self::Less),
            "styl" | "stylus" => Some(Self::Stylus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Sass => "sass",
            Self::Less => "less",
            Self::Stylus => "stylus",
        }
    }
}

/// One embedded style region, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRegion {
    /// Style language of the block.
    pub dialect: StyleDialect,

    /// De-indented block content.
    pub content: String,

    /// Whether selectors should be isolated to this component.
    pub scoped: bool,

    /// Module-scope binding name; `None` when the region is not
    /// module-scoped, otherwise the name the class mapping is exposed
    /// under (`$style` unless the block names one).
    pub module: Option<String>,

    /// 1-based line of the block header in the original document.
    pub line: usize,
}

/// The script text remaining after all style regions are excised.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptRegion {
    pub text: String,
}

impl ScriptRegion {
    /// True when nothing but the blank lines left behind by extraction
    /// remain.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Output dialect a script compiler can target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputDialect {
    #[default]
    Js,
    Ts,
}

/// Result of the external script compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledScript {
    /// Generated code text.
    pub code: String,

    /// Dialect of the generated code.
    pub dialect: OutputDialect,

    /// Source map keyed to the original document, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Value>,
}

/// Local class-name mapping discovered for a module-scoped region.
///
/// Ordered so generated code and serialized metadata are deterministic.
pub type ModuleBindings = BTreeMap<String, String>;

/// One typed build artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArtifactPart {
    Js {
        content: String,
        #[serde(
            default,
            rename = "sourceMap",
            skip_serializing_if = "Option::is_none"
        )]
        source_map: Option<Value>,
    },
    Css {
        content: String,
        #[serde(
            default,
            rename = "moduleBindings",
            skip_serializing_if = "Option::is_none"
        )]
        module_bindings: Option<ModuleBindings>,
    },
    Map {
        content: Value,
    },
}

impl ArtifactPart {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Js { .. } => "js",
            Self::Css { .. } => "css",
            Self::Map { .. } => "map",
        }
    }
}

/// Resolved export binding: the alias all glue code references, the lines
/// that establish it, and the commonjs side-channel flag. Recomputed per
/// document, never persisted.
#[derive(Debug, Clone)]
pub struct ExportBinding {
    pub alias: String,
    pub prelude: Vec<String>,
    pub commonjs: bool,
}

/// Everything the pipeline returns to the host for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Ordered artifact list: js, then map, then css.
    pub parts: Vec<ArtifactPart>,

    /// True when export-binding resolution fell back to synthesizing a
    /// commonjs exports object; the host's linker consumes this.
    pub commonjs_exports: bool,

    /// Modules the host must make resolvable at runtime.
    pub extra_dependencies: Vec<String>,
}
