//! In-memory metadata store for interactive-fiction works.
//! Stories are keyed by IFID equivalence; catalog formats live elsewhere.

pub mod logging;
pub mod model;
pub mod store;

pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogConfig, LoggingError,
};
pub use model::ifid::{CompoundId, Ifid, IfidError, IfidResult, LeafId, Leaves, ZCodeId};
pub use model::story::{Story, StoryError, StoryResult};
pub use model::utf16::{str_cmp, str_cpy, Utf16String};
pub use store::iter::{AttributeKeys, Stories, StoryCursor, ValueCursor};
pub use store::metabase::Metabase;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
