//! # Chatlens
//!
//! A Rust library for recovering conversation threads from exported
//! messaging logs and computing cross-conversation analytics over them.
//!
//! ## Overview
//!
//! Chat exports are undifferentiated message streams. Chatlens reconstructs
//! the *semantically coherent exchanges* inside them using three independent
//! segmentation heuristics:
//!
//! - **Time-based** — a long silence starts a new thread
//! - **Topic-based** — a Jaccard-similarity drop in topic vocabulary starts
//!   a new thread
//! - **Interaction-based** — rapid alternating-sender reply chains and
//!   clusters around reacted-to messages form threads of their own
//!
//! The candidates from all three passes are merged with an overlap-tolerant
//! tie-break (threads are deliberately *not* a partition of the messages),
//! then analyzed across conversations: response times, length distribution,
//! thread statistics, peak periods, popular topics, and search.
//!
//! Export-format parsing is not this crate's job: it consumes normalized
//! [`Conversation`] records through the [`source::ConversationSource`] trait
//! and exposes flat serializable results for external report exporters.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatlens::analyzer::ConversationAnalyzer;
//! use chatlens::source::VecSource;
//! use chatlens::{Conversation, Message};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! fn main() -> chatlens::Result<()> {
//!     let base = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
//!     let mut conv = Conversation::new("c1", "Weekend plans");
//!     for i in 0..6 {
//!         conv.messages.push(
//!             Message::new(format!("m{i}"), "c1", if i % 2 == 0 { "Alice" } else { "Bob" })
//!                 .with_content("hiking trail weekend plans")
//!                 .with_timestamp(base + Duration::minutes(i * 2)),
//!         );
//!     }
//!
//!     let mut analyzer = ConversationAnalyzer::new(Box::new(VecSource::new(vec![conv])));
//!     analyzer.load_conversations()?;
//!
//!     let analysis = analyzer.analyze_conversation_patterns()?;
//!     println!("{}", analysis.to_json()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Reconstruction only
//!
//! The engine can be used standalone, one conversation at a time:
//!
//! ```rust
//! use chatlens::config::EngineConfig;
//! use chatlens::reconstruct::ThreadReconstructionEngine;
//!
//! let engine = ThreadReconstructionEngine::with_config(
//!     EngineConfig::new().with_time_gap_minutes(30),
//! );
//! let threads = engine.reconstruct_threads(&[]);
//! assert!(threads.is_empty());
//! ```
//!
//! ## Module Structure
//!
//! - [`message`] — [`Message`], media attachments, reactions
//! - [`conversation`] — [`Conversation`], [`Participant`],
//!   [`ConversationThread`](conversation::ConversationThread), summaries
//! - [`topics`] — topic extraction and the stop-word/emoji tables
//! - [`config`] — [`EngineConfig`](config::EngineConfig) thresholds
//! - [`reconstruct`] — the engine and its three segmentation passes
//! - [`metrics`] — per-conversation rollups
//! - [`source`] — the seam to external export parsers
//! - [`analyzer`] — cross-conversation analytics and search
//! - [`error`] — unified error types ([`ChatlensError`], [`Result`])

pub mod analyzer;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod metrics;
pub mod reconstruct;
pub mod source;
pub mod topics;

// Re-export the main types at the crate root for convenience
pub use conversation::{Conversation, ConversationKind, Participant};
pub use error::{ChatlensError, Result};
pub use message::{MediaAttachment, MediaKind, Message, Reaction};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatlens::prelude::*;
/// ```
pub mod prelude {
    // Core data model
    pub use crate::conversation::{
        Conversation, ConversationKind, ConversationSummary, ConversationThread, Participant,
    };
    pub use crate::message::{MediaAttachment, MediaKind, Message, MessageKind, Reaction};

    // Error types
    pub use crate::error::{ChatlensError, Result};

    // Reconstruction
    pub use crate::config::EngineConfig;
    pub use crate::reconstruct::ThreadReconstructionEngine;

    // Metrics
    pub use crate::metrics::{ConversationMetrics, enrich_conversation};

    // Analytics
    pub use crate::analyzer::{ConversationAnalysis, ConversationAnalyzer};

    // Sources
    pub use crate::source::{ConversationSource, JsonSource, VecSource};
}
