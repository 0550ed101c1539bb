//! Hot-reload wiring codegen.
//!
//! Emits a runtime guard that checks for a live hot-reload channel and
//! registers the export binding with it: first run creates a record,
//! subsequent runs reload it. When the document has style regions, a
//! style-reload callback is wired on the same channel and the hot-reload
//! runtime module is declared as an extra dependency for the host's graph.

use tessera_core::js;

/// Runtime module the generated guard requires.
pub const HOT_API_MODULE: &str = "tessera-hot-api";

/// Generated wiring plus the dependencies the host must resolve.
#[derive(Debug, Clone)]
pub struct HmrWiring {
    pub code: String,
    pub extra_dependencies: Vec<String>,
}

/// Build the hot-reload guard for `binding`, keyed by `hmr_id`.
pub fn hmr_wiring(binding: &str, hmr_id: &str, has_styles: bool) -> HmrWiring {
    let id = js::quote_string(hmr_id);
    let module = js::quote_string(HOT_API_MODULE);

    let mut code = String::with_capacity(320);
    code.push_str("if (module.hot) {\n");
    code.push_str(&format!("  var _sfc_hotApi = require({module});\n"));
    code.push_str("  if (_sfc_hotApi.compatible) {\n");
    code.push_str("    module.hot.accept();\n");
    code.push_str("    if (!module.hot.data) {\n");
    code.push_str(&format!("      _sfc_hotApi.createRecord({id}, {binding});\n"));
    code.push_str("    } else {\n");
    code.push_str(&format!("      _sfc_hotApi.reload({id}, {binding});\n"));
    code.push_str("    }\n");
    if has_styles {
        code.push_str("    module.hot.dispose(function () {\n");
        code.push_str(&format!("      _sfc_hotApi.reloadStyles({id});\n"));
        code.push_str("    });\n");
    }
    code.push_str("  }\n");
    code.push_str("}");

    let extra_dependencies = if has_styles {
        vec![HOT_API_MODULE.to_string()]
    } else {
        Vec::new()
    };

    HmrWiring {
        code,
        extra_dependencies,
    }
}
