//! Thread reconstruction: recovering coherent exchanges from a message
//! stream.
//!
//! [`ThreadReconstructionEngine`] runs three independent segmentation passes
//! over a conversation's messages (see [`passes`]), unions their candidate
//! threads, resolves overlaps greedily by start time, and annotates the
//! survivors with ids, durations and inferred topics.
//!
//! # Overlap semantics
//!
//! The merge step accepts a candidate when the fraction of its message ids
//! already claimed by previously accepted threads is below 0.5. This is an
//! intentional *non-partition*: a message may end up in more than one
//! accepted thread when each individual overlap stays under 50%. Callers
//! must not assume threads are disjoint.
//!
//! # Determinism
//!
//! Given the same message list and configuration, `reconstruct_threads`
//! returns an identical thread list on every call: candidates are ordered by
//! start time with ties broken by first message id, and every topic
//! computation iterates sorted sets.
//!
//! # Example
//!
//! ```
//! use chatlens::config::EngineConfig;
//! use chatlens::reconstruct::ThreadReconstructionEngine;
//! use chatlens::Message;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let base = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
//! let messages: Vec<Message> = (0..4)
//!     .map(|i| {
//!         Message::new(format!("m{i}"), "c1", if i % 2 == 0 { "Alice" } else { "Bob" })
//!             .with_content("planning the weekend hike")
//!             .with_timestamp(base + Duration::minutes(i))
//!     })
//!     .collect();
//!
//! let engine = ThreadReconstructionEngine::new();
//! let threads = engine.reconstruct_threads(&messages);
//! assert!(!threads.is_empty());
//! ```

pub mod passes;

use std::collections::{BTreeMap, BTreeSet};

use crate::config::EngineConfig;
use crate::conversation::{Conversation, ConversationThread};
use crate::message::Message;
use crate::topics::extract_topics;

use passes::ThreadCandidate;

/// Fraction of already-claimed message ids above which a candidate is
/// discarded by the merge step.
const MAX_CLAIMED_OVERLAP: f64 = 0.5;

/// Topic label used when a thread's messages yield no usable topics.
const FALLBACK_TOPIC: &str = "general conversation";

/// Reconstructs conversation threads from an undifferentiated message
/// stream.
///
/// The engine is stateless between calls: it holds only its
/// [`EngineConfig`] and can be reused across conversations. Reconstruction
/// of different conversations is independent, so callers may parallelize
/// over the conversation dimension without coordination.
#[derive(Debug, Clone, Default)]
pub struct ThreadReconstructionEngine {
    config: EngineConfig,
}

impl ThreadReconstructionEngine {
    /// Creates an engine with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with explicit thresholds.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reconstructs threads from a conversation's messages.
    ///
    /// Returns an empty list for empty input. The input need not be sorted;
    /// the engine re-sorts it (stable, undated messages first). Never
    /// fails: malformed single messages simply contribute nothing to the
    /// passes that cannot interpret them.
    pub fn reconstruct_threads(&self, messages: &[Message]) -> Vec<ConversationThread> {
        if messages.is_empty() {
            return Vec::new();
        }

        let mut sorted: Vec<Message> = messages.to_vec();
        sorted.sort_by_key(|m| m.timestamp);

        let mut candidates = passes::time_based(&sorted, &self.config);
        candidates.extend(passes::topic_based(&sorted, &self.config));
        candidates.extend(passes::interaction_based(&sorted, &self.config));

        let accepted = merge_candidates(candidates);
        finalize(accepted)
    }

    /// Runs reconstruction and stores the result on the conversation.
    pub fn reconstruct(&self, conversation: &mut Conversation) {
        conversation.threads = self.reconstruct_threads(&conversation.messages);
    }
}

/// Resolves overlapping candidates from all passes into the accepted set.
///
/// Candidates are sorted by start time ascending (undated first, ties broken
/// by first message id) and accepted greedily while the fraction of their
/// message ids already claimed stays below [`MAX_CLAIMED_OVERLAP`].
fn merge_candidates(mut candidates: Vec<ThreadCandidate>) -> Vec<ThreadCandidate> {
    candidates.sort_by(|a, b| {
        a.start_time.cmp(&b.start_time).then_with(|| {
            let a_first = a.messages.first().map(|m| m.id.as_str()).unwrap_or("");
            let b_first = b.messages.first().map(|m| m.id.as_str()).unwrap_or("");
            a_first.cmp(b_first)
        })
    });

    let mut claimed: BTreeSet<String> = BTreeSet::new();
    let mut accepted = Vec::new();

    for candidate in candidates {
        if candidate.messages.is_empty() {
            continue;
        }
        let ids = candidate.message_ids();
        let overlap = ids.iter().filter(|id| claimed.contains(**id)).count();
        let ratio = overlap as f64 / ids.len() as f64;

        if ratio < MAX_CLAIMED_OVERLAP {
            claimed.extend(ids.iter().map(|id| (*id).to_string()));
            accepted.push(candidate);
        }
    }

    accepted
}

/// Turns accepted candidates into final threads: sequential ids, durations,
/// and an inferred topic where the pass did not assign one.
fn finalize(accepted: Vec<ThreadCandidate>) -> Vec<ConversationThread> {
    accepted
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            let duration_minutes = match (candidate.start_time, candidate.end_time) {
                (Some(start), Some(end)) => (end - start).num_seconds() as f64 / 60.0,
                _ => 0.0,
            };
            let topic = candidate
                .topic
                .clone()
                .or_else(|| Some(infer_topic(&candidate.messages)));

            ConversationThread {
                id: format!("thread_{index}"),
                messages: candidate.messages,
                participants: candidate.participants,
                start_time: candidate.start_time,
                end_time: candidate.end_time,
                duration_minutes,
                topic,
            }
        })
        .collect()
}

/// Infers a topic label: the 3 most common non-`type_` topics across the
/// thread's messages (count descending, ties lexicographic), falling back
/// to [`FALLBACK_TOPIC`].
fn infer_topic(messages: &[Message]) -> String {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for msg in messages {
        for topic in extract_topics(msg) {
            if !topic.starts_with("type_") {
                *counts.entry(topic).or_default() += 1;
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    if ranked.is_empty() {
        return FALLBACK_TOPIC.to_string();
    }

    ranked
        .into_iter()
        .take(3)
        .map(|(topic, _)| topic)
        .collect::<Vec<_>>()
        .join(", ")
}
