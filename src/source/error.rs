//! Fix source error types

use thiserror::Error;

/// Errors raised while pulling fixes from a source
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// Every producer has gone away and no fixes remain
    #[error("fix source {source_id} disconnected")]
    Disconnected { source_id: u8 },
    /// Reading the underlying fix log failed
    #[error("fix source I/O error: {message}")]
    Io { message: String },
    /// A fix log could not be decoded
    #[error("malformed fix log: {message}")]
    Parse { message: String },
}

impl SourceError {
    /// Whether the source ended normally rather than failing
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, SourceError::Disconnected { .. })
    }
}

/// Result type for fix source operations
pub type SourceResult<T> = Result<T, SourceError>;
