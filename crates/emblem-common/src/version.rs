//! Engine version information.
//!
//! The version string keys on-disk cache entries so that a new engine
//! release never trusts pixel data produced by an older one.

/// Engine version string, taken from the crate metadata.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the version prefix used for cache file names.
#[must_use]
pub fn cache_prefix() -> String {
    format!("em_v{ENGINE_VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_prefix_contains_version() {
        assert!(cache_prefix().contains(ENGINE_VERSION));
        assert!(cache_prefix().starts_with("em_v"));
    }
}
