//! Tessera single-file-component pipeline.
//!
//! Compiles one source document that interleaves a script region and
//! embedded style regions into a set of separable build artifacts: an
//! executable module body wired with bundler-mode-aware glue, plus a
//! concatenated style sheet. The host bundler owns file access and graph
//! traversal; the script compiler, style preprocessors and minifier are
//! opaque services injected through [`Services`].
//!
//! ```
//! use std::sync::Arc;
//! use tessera_sfc::{
//!     BundleOptions, CompiledScript, OutputDialect, Pipeline, ScriptCompileRequest,
//!     ScriptCompiler, ScriptCompilerHandle, ServiceError, Services, SourceDocument,
//! };
//!
//! struct EchoCompiler;
//!
//! impl ScriptCompiler for EchoCompiler {
//!     fn compile(
//!         &self,
//!         request: &ScriptCompileRequest<'_>,
//!     ) -> Result<CompiledScript, ServiceError> {
//!         Ok(CompiledScript {
//!             code: request.source.to_string(),
//!             dialect: OutputDialect::Js,
//!             map: None,
//!         })
//!     }
//! }
//!
//! let services = Services::new(ScriptCompilerHandle::preloaded(Arc::new(EchoCompiler)));
//! let pipeline = Pipeline::new(services);
//! let doc = SourceDocument::new("App.tsa", "x = 1\n", BundleOptions::default());
//! let output = pipeline.compile(&doc).unwrap();
//! assert_eq!(output.parts[0].kind(), "js");
//! ```

pub mod compile;
pub mod css;
pub mod css_module;
pub mod error;
pub mod extract;
pub mod generate;
pub mod hmr;
pub mod postprocess;
pub mod scoped;
pub mod selector;
pub mod services;
pub mod style;
pub mod types;

pub use compile::Pipeline;
pub use error::{PipelineError, ServiceError};
pub use extract::extract;
pub use hmr::{HmrWiring, HOT_API_MODULE};
pub use services::{
    Minifier, MinifyOutput, MinifyRequest, ModuleStyleOutput, ModuleStyleRequest,
    ScopedStyleOutput, ScopedStyleRequest, ScriptCompileRequest, ScriptCompiler,
    ScriptCompilerHandle, ScriptCompilerLoader, Services, StyleProcessor,
};
pub use style::DefaultStyleProcessor;
pub use types::{
    ArtifactPart, BundleOptions, CompiledScript, DocumentId, ExportBinding, ModuleBindings,
    OutputDialect, PipelineOutput, ScriptRegion, SourceDocument, StyleDialect, StyleRegion,
    DEFAULT_MODULE_BINDING,
};
