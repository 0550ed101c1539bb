//! The in-tree style processor.
//!
//! Hosts that preprocess dialects externally install their own
//! [`StyleProcessor`]; this one covers the common case: attribute-based
//! scoping, module class renaming, and (for the plain css dialect) a
//! validation pass through LightningCSS. Non-css dialects are assumed to
//! be lowered by an external preprocessor before or after this rewrite and
//! skip validation.

use tessera_core::hash;

use crate::css;
use crate::css_module;
use crate::error::ServiceError;
use crate::scoped;
use crate::services::{
    ModuleStyleOutput, ModuleStyleRequest, ScopedStyleOutput, ScopedStyleRequest, StyleProcessor,
};
use crate::types::StyleDialect;

/// Stateless default implementation of [`StyleProcessor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStyleProcessor;

impl StyleProcessor for DefaultStyleProcessor {
    fn compile_scoped(&self, request: &ScopedStyleRequest<'_>) -> ScopedStyleOutput {
        let mut attr = String::with_capacity(request.scope_id.len() + 2);
        attr.push('[');
        attr.push_str(request.scope_id);
        attr.push(']');

        let rewritten = scoped::rewrite_scoped(request.source, &attr);
        let (code, errors) = finish(rewritten, request.filename, request.dialect);
        ScopedStyleOutput { code, errors }
    }

    fn compile_modules(&self, request: &ModuleStyleRequest<'_>) -> ModuleStyleOutput {
        let tag = hash::hash_prefix(request.filename, 6);
        let (rewritten, bindings) = css_module::rewrite_modules(request.source, &tag);
        let (code, errors) = finish(rewritten, request.filename, request.dialect);
        ModuleStyleOutput {
            code,
            bindings,
            errors,
        }
    }
}

fn finish(code: String, filename: &str, dialect: StyleDialect) -> (String, Vec<ServiceError>) {
    if dialect != StyleDialect::Css {
        return (code, Vec::new());
    }
    let (printed, messages) = css::normalize(&code, filename);
    (printed, messages.into_iter().map(ServiceError::new).collect())
}
