//! Language-specific extractor implementations.

mod astro;
mod go;
mod script;

pub use astro::AstroExtractor;
pub use go::GoExtractor;
pub use script::ScriptExtractor;

use super::Extractor;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Static storage for Go extractor.
static GO_EXTRACTOR: OnceCell<GoExtractor> = OnceCell::new();

/// Static storage for JavaScript/TypeScript extractor.
static SCRIPT_EXTRACTOR: OnceCell<ScriptExtractor> = OnceCell::new();

/// Static storage for Astro extractor.
static ASTRO_EXTRACTOR: OnceCell<AstroExtractor> = OnceCell::new();

/// Whether extractors have been registered.
static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Register all available extractors.
///
/// This is idempotent - calling it multiple times is safe.
pub fn register_extractors() {
    if REGISTERED.swap(true, Ordering::SeqCst) {
        return;
    }

    GO_EXTRACTOR.get_or_init(GoExtractor::new);
    SCRIPT_EXTRACTOR.get_or_init(ScriptExtractor::new);
    ASTRO_EXTRACTOR.get_or_init(AstroExtractor::new);
}

/// Get an extractor for the given file extension (without dot).
///
/// Returns None if no extractor handles the extension.
pub fn get_extractor(ext: &str) -> Option<&'static dyn Extractor> {
    match ext {
        "go" => Some(GO_EXTRACTOR.get_or_init(GoExtractor::new) as &'static dyn Extractor),
        "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts" => {
            Some(SCRIPT_EXTRACTOR.get_or_init(ScriptExtractor::new) as &'static dyn Extractor)
        }
        "astro" => Some(ASTRO_EXTRACTOR.get_or_init(AstroExtractor::new) as &'static dyn Extractor),
        _ => None,
    }
}

/// All file extensions with a registered extractor.
pub fn registered_extensions() -> Vec<&'static str> {
    register_extractors();
    let mut exts = Vec::new();
    for extractor in [
        GO_EXTRACTOR.get().map(|e| e as &dyn Extractor),
        SCRIPT_EXTRACTOR.get().map(|e| e as &dyn Extractor),
        ASTRO_EXTRACTOR.get().map(|e| e as &dyn Extractor),
    ]
    .into_iter()
    .flatten()
    {
        exts.extend_from_slice(extractor.file_extensions());
    }
    exts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_extension() {
        assert_eq!(get_extractor("go").map(|e| e.language_id()), Some("go"));
        assert_eq!(get_extractor("tsx").map(|e| e.language_id()), Some("script"));
        assert_eq!(get_extractor("mjs").map(|e| e.language_id()), Some("script"));
        assert_eq!(get_extractor("astro").map(|e| e.language_id()), Some("astro"));
        assert!(get_extractor("py").is_none());
    }

    #[test]
    fn test_registered_extensions_match_dispatch() {
        for ext in registered_extensions() {
            let extractor = get_extractor(ext).unwrap();
            assert!(extractor.handles_extension(ext));
        }
    }
}
