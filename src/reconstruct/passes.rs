//! The three independent segmentation passes.
//!
//! Each pass is a pure function `&[Message] -> Vec<ThreadCandidate>` over the
//! pre-sorted message list. The passes know nothing about each other; the
//! engine in the parent module unions their candidates and resolves overlaps.
//!
//! A message without a timestamp never forces a boundary: every comparison
//! that needs a concrete instant simply does not fire for it.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::Message;
use crate::config::EngineConfig;
use crate::topics::extract_topics;

/// Maximum messages the reply-chain scan looks ahead.
const REPLY_SCAN_WINDOW: usize = 10;

/// Maximum seconds between consecutive members of a reply chain.
const REPLY_GAP_SECONDS: i64 = 300;

/// Minimum length of a surviving reply chain.
const REPLY_MIN_LEN: usize = 3;

/// Messages considered on each side of a reacted-to message.
const REACTION_NEIGHBORS: usize = 5;

/// Maximum seconds between a reacted-to message and a group member.
const REACTION_GAP_SECONDS: i64 = 600;

/// An intermediate thread candidate produced by one pass.
///
/// Candidates carry owned message clones; the merge step compares them by
/// message id only.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadCandidate {
    /// The candidate's messages, in the order the pass collected them
    /// (ascending by timestamp).
    pub messages: Vec<Message>,

    /// Senders observed in the candidate.
    pub participants: BTreeSet<String>,

    /// Earliest dated message, if any.
    pub start_time: Option<DateTime<Utc>>,

    /// Latest dated message, if any.
    pub end_time: Option<DateTime<Utc>>,

    /// Label assigned by the pass, if it had one (only the topic pass does).
    pub topic: Option<String>,
}

impl ThreadCandidate {
    /// Builds a candidate from a batch of messages, deriving participants
    /// and the time span.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let participants = messages.iter().map(|m| m.sender.clone()).collect();
        let mut dated = messages.iter().filter_map(|m| m.timestamp);
        let span = dated.next().map(|first| {
            dated.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)))
        });
        Self {
            messages,
            participants,
            start_time: span.map(|(start, _)| start),
            end_time: span.map(|(_, end)| end),
            topic: None,
        }
    }

    /// Builder method to set the topic label.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Returns the candidate's message ids.
    pub fn message_ids(&self) -> BTreeSet<&str> {
        self.messages.iter().map(|m| m.id.as_str()).collect()
    }
}

/// Jaccard similarity of two topic sets: `|A∩B| / |A∪B|`.
///
/// Returns 0.0 when either set is empty.
pub fn jaccard_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

// ============================================================================
// Time-based pass
// ============================================================================

/// Segments by silence: a gap larger than `time_gap_minutes` between a
/// message and the running thread's end starts a new thread.
///
/// Messages without a timestamp join the running thread without extending
/// its end time. Completed threads shorter than `min_thread_messages` are
/// dropped.
pub fn time_based(messages: &[Message], config: &EngineConfig) -> Vec<ThreadCandidate> {
    let gap = Duration::minutes(config.time_gap_minutes);
    let mut candidates = Vec::new();

    let mut current: Vec<Message> = Vec::new();
    let mut current_end: Option<DateTime<Utc>> = None;

    for msg in messages {
        let breaks = match (msg.timestamp, current_end) {
            (Some(ts), Some(end)) => ts - end > gap,
            // Either side undated: no boundary forced.
            _ => false,
        };

        if breaks && !current.is_empty() {
            if current.len() >= config.min_thread_messages {
                candidates.push(ThreadCandidate::from_messages(std::mem::take(&mut current)));
            } else {
                current.clear();
            }
            current_end = None;
        }

        current.push(msg.clone());
        if let Some(ts) = msg.timestamp {
            current_end = Some(current_end.map_or(ts, |end| end.max(ts)));
        }
    }

    if current.len() >= config.min_thread_messages {
        candidates.push(ThreadCandidate::from_messages(current));
    }

    candidates
}

// ============================================================================
// Topic-based pass
// ============================================================================

/// Segments by topic continuity: a message whose topic set is too dissimilar
/// from the running thread's accumulated topics starts a new thread.
///
/// The new thread's label is seeded from the first 3 topics of the message
/// that starts it. Threads shorter than `min_thread_messages` are dropped.
pub fn topic_based(messages: &[Message], config: &EngineConfig) -> Vec<ThreadCandidate> {
    let mut candidates = Vec::new();

    let mut current: Vec<Message> = Vec::new();
    let mut current_topics: BTreeSet<String> = BTreeSet::new();
    let mut current_label: Option<String> = None;

    for msg in messages {
        let topics = extract_topics(msg);
        let similarity = if current.is_empty() {
            0.0
        } else {
            jaccard_similarity(&topics, &current_topics)
        };

        if similarity < config.topic_similarity_threshold {
            if current.len() >= config.min_thread_messages {
                let mut candidate =
                    ThreadCandidate::from_messages(std::mem::take(&mut current));
                candidate.topic = current_label.take();
                candidates.push(candidate);
            } else {
                current.clear();
            }
            current_topics.clear();
            current_label = Some(seed_label(&topics));
        }

        current_topics.extend(topics);
        current.push(msg.clone());
    }

    if current.len() >= config.min_thread_messages {
        let mut candidate = ThreadCandidate::from_messages(current);
        candidate.topic = current_label;
        candidates.push(candidate);
    }

    candidates
}

/// Label for a new topic thread: the first 3 topics of its opening message.
fn seed_label(topics: &BTreeSet<String>) -> String {
    topics
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Interaction-based pass
// ============================================================================

/// Segments by interaction structure: rapid alternating-sender reply chains
/// and clusters of messages around a reacted-to message.
pub fn interaction_based(messages: &[Message], config: &EngineConfig) -> Vec<ThreadCandidate> {
    let mut candidates = reply_chains(messages);
    candidates.extend(reaction_groups(messages, config));
    candidates
}

/// Detects reply chains: runs where each next message is from a different
/// sender than the previous chain tail and lands within
/// [`REPLY_GAP_SECONDS`] of it, looking at most [`REPLY_SCAN_WINDOW`]
/// messages ahead. Chains shorter than [`REPLY_MIN_LEN`] are dropped.
///
/// After a chain is emitted the scan resumes past its last member, so one
/// back-and-forth run yields one candidate rather than the run plus all of
/// its suffixes.
fn reply_chains(messages: &[Message]) -> Vec<ThreadCandidate> {
    let max_gap = Duration::seconds(REPLY_GAP_SECONDS);
    let mut candidates = Vec::new();

    let mut i = 0;
    while i < messages.len() {
        let mut chain = vec![i];
        let limit = messages.len().min(i + REPLY_SCAN_WINDOW + 1);

        for j in (i + 1)..limit {
            let tail = &messages[*chain.last().unwrap_or(&i)];
            let next = &messages[j];

            let alternates = next.sender != tail.sender;
            let rapid = match (tail.timestamp, next.timestamp) {
                (Some(prev), Some(ts)) => ts - prev <= max_gap,
                _ => false,
            };

            if alternates && rapid {
                chain.push(j);
            } else {
                break;
            }
        }

        if chain.len() >= REPLY_MIN_LEN {
            let batch: Vec<Message> = chain.iter().map(|&idx| messages[idx].clone()).collect();
            let last = *chain.last().unwrap_or(&i);
            candidates.push(ThreadCandidate::from_messages(batch));
            i = last + 1;
        } else {
            i += 1;
        }
    }

    candidates
}

/// Detects reaction groups: for every message bearing at least one reaction,
/// itself plus any of the [`REACTION_NEIGHBORS`] preceding/following messages
/// within [`REACTION_GAP_SECONDS`] of it. Groups smaller than
/// `min_thread_messages` are dropped.
fn reaction_groups(messages: &[Message], config: &EngineConfig) -> Vec<ThreadCandidate> {
    let max_gap = Duration::seconds(REACTION_GAP_SECONDS);
    let mut candidates = Vec::new();

    for (i, anchor) in messages.iter().enumerate() {
        if !anchor.has_reactions() {
            continue;
        }

        let lo = i.saturating_sub(REACTION_NEIGHBORS);
        let hi = messages.len().min(i + REACTION_NEIGHBORS + 1);

        let mut batch: Vec<Message> = Vec::new();
        for (j, neighbor) in messages.iter().enumerate().take(hi).skip(lo) {
            if j == i {
                batch.push(neighbor.clone());
                continue;
            }
            // Both instants required; undated messages never join a group.
            if let (Some(anchor_ts), Some(ts)) = (anchor.timestamp, neighbor.timestamp) {
                if (ts - anchor_ts).abs() <= max_gap {
                    batch.push(neighbor.clone());
                }
            }
        }

        if batch.len() >= config.min_thread_messages {
            batch.sort_by_key(|m| m.timestamp);
            candidates.push(ThreadCandidate::from_messages(batch));
        }
    }

    candidates
}
