//! Error types for praxis-core

use thiserror::Error;

/// Error type for engine-boundary operations.
///
/// Store mutations and the pure helpers (scheduler, graph, gamification)
/// are total and never return errors; this type covers catalog loading
/// and serialization only.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Catalog could not be parsed
    #[error("Catalog parse error: {0}")]
    CatalogParse(String),

    /// Prerequisite relation contains a cycle (authoring defect)
    #[error("Cyclic prerequisites involving unit '{0}'")]
    CyclicPrerequisites(String),

    /// A unit references a prerequisite defined twice
    #[error("Duplicate unit id '{0}' in catalog")]
    DuplicateUnit(String),

    /// Serialization or deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::CatalogParse("bad toml".into());
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn test_cycle_error_names_unit() {
        let err = CoreError::CyclicPrerequisites("derivatives".into());
        assert!(err.to_string().contains("derivatives"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io_err.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
