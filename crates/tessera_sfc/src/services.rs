//! External collaborator interfaces.
//!
//! The script compiler, style processor and minifier are opaque services
//! invoked as single request/response operations. They are bundled in a
//! [`Services`] value injected into the pipeline so the core stays testable
//! without global mutation.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::ServiceError;
use crate::style::DefaultStyleProcessor;
use crate::types::{CompiledScript, ModuleBindings, OutputDialect, StyleDialect};

/// Request handed to the external script compiler.
#[derive(Debug, Clone)]
pub struct ScriptCompileRequest<'a> {
    /// Script region text, verbatim.
    pub source: &'a str,

    /// Base file name, for compiler diagnostics.
    pub filename: &'a str,

    /// Relative path of the originating document.
    pub source_path: &'a str,

    /// Whether a source map is requested.
    pub source_map: bool,

    /// Output dialect to target.
    pub target: OutputDialect,

    /// Whether comments should be preserved in the output.
    pub comments: bool,
}

/// The external script compiler service.
pub trait ScriptCompiler: Send + Sync {
    fn compile(&self, request: &ScriptCompileRequest<'_>) -> Result<CompiledScript, ServiceError>;
}

/// Loader invoked at most once per process to resolve the compiler.
pub type ScriptCompilerLoader =
    Box<dyn Fn() -> Result<Arc<dyn ScriptCompiler>, ServiceError> + Send + Sync>;

/// Once-initialized shared handle to the script compiler.
///
/// Loading is memoized: concurrent documents observe a single load, and
/// every later document reuses the already-loaded instance. The handle is
/// never torn down for the life of the process.
pub struct ScriptCompilerHandle {
    cell: OnceCell<Arc<dyn ScriptCompiler>>,
    loader: Option<ScriptCompilerLoader>,
}

impl ScriptCompilerHandle {
    /// A handle that resolves the compiler on first use.
    pub fn lazy(
        loader: impl Fn() -> Result<Arc<dyn ScriptCompiler>, ServiceError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            cell: OnceCell::new(),
            loader: Some(Box::new(loader)),
        }
    }

    /// A handle around an already-resolved compiler.
    pub fn preloaded(compiler: Arc<dyn ScriptCompiler>) -> Self {
        Self {
            cell: OnceCell::with_value(compiler),
            loader: None,
        }
    }

    /// The compiler, loading it on first call.
    pub fn get(&self) -> Result<&Arc<dyn ScriptCompiler>, ServiceError> {
        self.cell.get_or_try_init(|| match &self.loader {
            Some(load) => load(),
            None => Err(ServiceError::new("no script compiler loader configured")),
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl std::fmt::Debug for ScriptCompilerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptCompilerHandle")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Request for component-scoped style rewriting.
#[derive(Debug, Clone)]
pub struct ScopedStyleRequest<'a> {
    pub source: &'a str,
    pub filename: &'a str,
    pub scope_id: &'a str,
    pub dialect: StyleDialect,
}

/// Scoped rewrite result. A non-empty `errors` list aborts the document;
/// only the first entry is surfaced.
#[derive(Debug, Clone)]
pub struct ScopedStyleOutput {
    pub code: String,
    pub errors: Vec<ServiceError>,
}

/// Request for module-scoped style compilation.
#[derive(Debug, Clone)]
pub struct ModuleStyleRequest<'a> {
    pub source: &'a str,
    pub filename: &'a str,
    pub dialect: StyleDialect,
}

/// Module compilation result: rewritten code plus the discovered
/// local-class-name mapping.
#[derive(Debug, Clone)]
pub struct ModuleStyleOutput {
    pub code: String,
    pub bindings: ModuleBindings,
    pub errors: Vec<ServiceError>,
}

/// The external style-processing service.
pub trait StyleProcessor: Send + Sync {
    fn compile_scoped(&self, request: &ScopedStyleRequest<'_>) -> ScopedStyleOutput;

    fn compile_modules(&self, request: &ModuleStyleRequest<'_>) -> ModuleStyleOutput;
}

/// Request handed to the external minifier.
#[derive(Debug, Clone)]
pub struct MinifyRequest<'a> {
    pub source: &'a str,

    /// Whether top-level names may be mangled.
    pub toplevel: bool,
}

/// Minifier result; a present `error` aborts the document.
#[derive(Debug, Clone)]
pub struct MinifyOutput {
    pub code: String,
    pub error: Option<ServiceError>,
}

/// The external minifier service.
pub trait Minifier: Send + Sync {
    fn minify(&self, request: &MinifyRequest<'_>) -> MinifyOutput;
}

/// Service bundle injected into the pipeline.
pub struct Services {
    script: ScriptCompilerHandle,
    styles: Arc<dyn StyleProcessor>,
    minifier: Option<Arc<dyn Minifier>>,
}

impl Services {
    /// Services with the in-tree style processor and no minifier.
    pub fn new(script: ScriptCompilerHandle) -> Self {
        Self {
            script,
            styles: Arc::new(DefaultStyleProcessor),
            minifier: None,
        }
    }

    pub fn with_style_processor(mut self, styles: Arc<dyn StyleProcessor>) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_minifier(mut self, minifier: Arc<dyn Minifier>) -> Self {
        self.minifier = Some(minifier);
        self
    }

    /// The script compiler, loading it on first use.
    pub fn script_compiler(&self) -> Result<&Arc<dyn ScriptCompiler>, ServiceError> {
        self.script.get()
    }

    pub fn style_processor(&self) -> &dyn StyleProcessor {
        self.styles.as_ref()
    }

    pub fn minifier(&self) -> Option<&dyn Minifier> {
        self.minifier.as_deref()
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("script", &self.script)
            .field("minifier", &self.minifier.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullCompiler;

    impl ScriptCompiler for NullCompiler {
        fn compile(
            &self,
            request: &ScriptCompileRequest<'_>,
        ) -> Result<CompiledScript, ServiceError> {
            Ok(CompiledScript {
                code: request.source.to_string(),
                dialect: OutputDialect::Js,
                map: None,
            })
        }
    }

    #[test]
    fn test_lazy_handle_loads_once() {
        static LOADS: AtomicUsize = AtomicUsize::new(0);
        let handle = ScriptCompilerHandle::lazy(|| {
            LOADS.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NullCompiler) as Arc<dyn ScriptCompiler>)
        });
        assert!(!handle.is_loaded());
        assert!(handle.get().is_ok());
        assert!(handle.get().is_ok());
        assert!(handle.is_loaded());
        assert_eq!(LOADS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lazy_handle_propagates_load_failure() {
        let handle = ScriptCompilerHandle::lazy(|| Err(ServiceError::new("compiler missing")));
        let err = handle.get().err().map(|e| e.message);
        assert_eq!(err.as_deref(), Some("compiler missing"));
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_preloaded_handle() {
        let handle = ScriptCompilerHandle::preloaded(Arc::new(NullCompiler));
        assert!(handle.is_loaded());
        assert!(handle.get().is_ok());
    }
}
