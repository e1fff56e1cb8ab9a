//! Unified error types for chatlens.
//!
//! This module provides a single [`ChatlensError`] enum that covers all error
//! cases in the library, following the single-error-enum pattern used by
//! crates like `serde_json` and `csv`.
//!
//! # Error Handling Philosophy
//!
//! - **Precondition violations** (analysis before loading) are typed variants
//!   the caller can match on, never silent defaults
//! - **Collaborator failures** (a conversation source that cannot produce its
//!   records) carry the source error chain for debugging
//! - **Arithmetic edge cases** (empty inputs, zero denominators) are *not*
//!   errors at all; the analytics resolve them to zero/absent values

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatlens operations.
///
/// # Example
///
/// ```rust
/// use chatlens::error::Result;
/// use chatlens::Conversation;
///
/// fn my_function() -> Result<Vec<Conversation>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlensError>;

/// The error type for all chatlens operations.
///
/// Each variant contains context about what went wrong and, where applicable,
/// the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlensError {
    /// Analysis was requested before any conversations were loaded.
    ///
    /// [`ConversationAnalyzer::analyze_conversation_patterns`] requires a
    /// prior successful [`load_conversations`] call that produced at least
    /// one conversation.
    ///
    /// [`ConversationAnalyzer::analyze_conversation_patterns`]: crate::analyzer::ConversationAnalyzer::analyze_conversation_patterns
    /// [`load_conversations`]: crate::analyzer::ConversationAnalyzer::load_conversations
    #[error("no conversations loaded; call load_conversations() first")]
    NoConversationsLoaded,

    /// A conversation source failed to produce its records.
    ///
    /// Raised by [`ConversationSource`](crate::source::ConversationSource)
    /// implementations when the normalized input cannot be obtained at all.
    /// A single malformed conversation inside an otherwise valid source is
    /// skipped, not raised.
    #[error("conversation source error{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Source {
        /// Description of what went wrong
        message: String,
        /// The file path, if the source is file-backed
        path: Option<PathBuf>,
    },

    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - A source file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing analysis output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    ///
    /// Occurs when deserializing normalized conversation records or when
    /// encoding analysis results for export.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatlensError {
    /// Creates a source error without a file path.
    pub fn source(message: impl Into<String>) -> Self {
        ChatlensError::Source {
            message: message.into(),
            path: None,
        }
    }

    /// Creates a source error attributed to a specific file.
    pub fn source_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ChatlensError::Source {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Returns `true` if this is the not-loaded precondition error.
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, ChatlensError::NoConversationsLoaded)
    }

    /// Returns `true` if this is a source error.
    pub fn is_source(&self) -> bool {
        matches!(self, ChatlensError::Source { .. })
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlensError::Io(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_loaded_display() {
        let err = ChatlensError::NoConversationsLoaded;
        let display = err.to_string();
        assert!(display.contains("no conversations loaded"));
        assert!(display.contains("load_conversations"));
    }

    #[test]
    fn test_source_error_with_path() {
        let err = ChatlensError::source_at("missing participants array", "/data/export.json");
        let display = err.to_string();
        assert!(display.contains("missing participants array"));
        assert!(display.contains("/data/export.json"));
    }

    #[test]
    fn test_source_error_without_path() {
        let err = ChatlensError::source("empty payload");
        let display = err.to_string();
        assert!(display.contains("empty payload"));
        assert!(!display.contains("file:"));
    }

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ChatlensError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = ChatlensError::from(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ChatlensError = json_err.into();
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_is_methods() {
        let err = ChatlensError::NoConversationsLoaded;
        assert!(err.is_not_loaded());
        assert!(!err.is_source());
        assert!(!err.is_io());

        let err = ChatlensError::source("bad");
        assert!(err.is_source());
        assert!(!err.is_not_loaded());
        assert!(!err.is_io());
    }

    #[test]
    fn test_error_debug() {
        let err = ChatlensError::NoConversationsLoaded;
        let debug = format!("{:?}", err);
        assert!(debug.contains("NoConversationsLoaded"));
    }
}
