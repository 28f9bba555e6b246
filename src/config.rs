/// Engine-level constants
pub const ENGINE_NAME: &str = "Formscribe";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Doc type reported when the form has no recognizable title line.
pub const DEFAULT_DOC_TYPE: &str = "EMR Downtime Office Visit Form";

/// Method identifier written into `source_quality_notes`.
pub const DEFAULT_EXTRACTION_METHOD: &str = "pattern-table field extraction";

/// Log filter used when `RUST_LOG` is unset.
/// Debug builds log the engine at debug; release builds stay at info.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "formscribe=debug,warn"
    } else {
        "formscribe=info,warn"
    }
}
