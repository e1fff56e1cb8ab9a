//! Configuration for the thread reconstruction engine.
//!
//! All thresholds are explicit here; the segmentation passes carry no hidden
//! defaults of their own.
//!
//! # Example
//!
//! ```rust
//! use chatlens::config::EngineConfig;
//! use chatlens::reconstruct::ThreadReconstructionEngine;
//!
//! let config = EngineConfig::new()
//!     .with_time_gap_minutes(30)
//!     .with_min_thread_messages(3);
//!
//! let engine = ThreadReconstructionEngine::with_config(config);
//! ```

use serde::{Deserialize, Serialize};

/// Thresholds for [`ThreadReconstructionEngine`](crate::reconstruct::ThreadReconstructionEngine).
///
/// # Example
///
/// ```rust
/// use chatlens::config::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_topic_similarity_threshold(0.5);
/// assert_eq!(config.topic_similarity_threshold, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum silence, in minutes, before the time-based pass starts a new
    /// thread (default: 60).
    pub time_gap_minutes: i64,

    /// Minimum Jaccard similarity between a message's topics and the running
    /// thread's topic set for the message to join the thread (default: 0.3).
    pub topic_similarity_threshold: f64,

    /// Minimum number of messages a thread needs to survive to the final
    /// output (default: 2).
    pub min_thread_messages: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_gap_minutes: 60,
            topic_similarity_threshold: 0.3,
            min_thread_messages: 2,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time gap threshold in minutes.
    #[must_use]
    pub fn with_time_gap_minutes(mut self, minutes: i64) -> Self {
        self.time_gap_minutes = minutes;
        self
    }

    /// Sets the topic similarity threshold (0.0 ..= 1.0).
    #[must_use]
    pub fn with_topic_similarity_threshold(mut self, threshold: f64) -> Self {
        self.topic_similarity_threshold = threshold;
        self
    }

    /// Sets the minimum number of messages per surviving thread.
    #[must_use]
    pub fn with_min_thread_messages(mut self, min: usize) -> Self {
        self.min_thread_messages = min;
        self
    }
}
