//! Document orchestrator.
//!
//! Owns the document lifecycle and drives the four stages in order:
//! extract, transpile, generate, post-process. All state flows explicitly
//! between the stage calls; nothing is carried on the orchestrator besides
//! the injected services.

use tracing::debug;

use crate::error::PipelineError;
use crate::extract;
use crate::generate;
use crate::postprocess;
use crate::services::{ScriptCompileRequest, Services};
use crate::types::{
    ArtifactPart, CompiledScript, OutputDialect, PipelineOutput, ScriptRegion, SourceDocument,
    StyleRegion,
};

/// The compilation pipeline for one or many documents.
///
/// A `Pipeline` is cheap to share behind an `Arc`; documents never share
/// mutable state, so the host may compile many concurrently against one
/// instance.
pub struct Pipeline {
    services: Services,
}

impl Pipeline {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Stage 1: split the document into script and style regions.
    pub fn extract(&self, doc: &SourceDocument) -> (ScriptRegion, Vec<StyleRegion>) {
        extract::extract(&doc.source)
    }

    /// Stage 2: hand the script region to the external compiler.
    pub fn transpile(
        &self,
        doc: &SourceDocument,
        script: &ScriptRegion,
    ) -> Result<CompiledScript, PipelineError> {
        let compiler = self
            .services
            .script_compiler()
            .map_err(|source| PipelineError::CompilerLoad { source })?;

        let request = ScriptCompileRequest {
            source: &script.text,
            filename: file_name(&doc.path),
            source_path: &doc.path,
            source_map: doc.bundle.source_maps,
            target: OutputDialect::Js,
            comments: !doc.bundle.minify,
        };
        compiler
            .compile(&request)
            .map_err(|source| PipelineError::Compile {
                file: doc.path.clone(),
                source,
            })
    }

    /// Stage 3: reshape regions into the ordered artifact list.
    pub fn generate(
        &self,
        compiled: Option<&CompiledScript>,
        regions: &[StyleRegion],
    ) -> Vec<ArtifactPart> {
        generate::generate(compiled, regions)
    }

    /// Stage 4: synthesize glue, rewrite styles, assemble the output.
    pub fn post_process(
        &self,
        doc: &SourceDocument,
        parts: Vec<ArtifactPart>,
        regions: &[StyleRegion],
    ) -> Result<PipelineOutput, PipelineError> {
        postprocess::post_process(&self.services, doc, parts, regions)
    }

    /// Run all four stages for one document.
    pub fn compile(&self, doc: &SourceDocument) -> Result<PipelineOutput, PipelineError> {
        let (script, regions) = self.extract(doc);
        debug!(
            file = %doc.path,
            styles = regions.len(),
            script = !script.is_blank(),
            "extracted document regions"
        );

        let compiled = if script.is_blank() {
            None
        } else {
            Some(self.transpile(doc, &script)?)
        };

        let parts = self.generate(compiled.as_ref(), &regions);
        self.post_process(doc, parts, &regions)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("services", &self.services)
            .finish()
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
