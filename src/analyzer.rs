//! Cross-conversation analytics over reconstructed threads.
//!
//! [`ConversationAnalyzer`] orchestrates the pipeline: it drains a
//! [`ConversationSource`], runs thread reconstruction and metrics on every
//! conversation, and aggregates the results into one serializable
//! [`ConversationAnalysis`].
//!
//! # State machine
//!
//! ```text
//! unloaded --load_conversations()--> loaded --analyze_conversation_patterns()--> analyzed
//! ```
//!
//! Requesting analysis while unloaded fails with
//! [`ChatlensError::NoConversationsLoaded`]; nothing is silently defaulted.
//!
//! # Example
//!
//! ```
//! use chatlens::analyzer::ConversationAnalyzer;
//! use chatlens::source::VecSource;
//! use chatlens::{Conversation, Message};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! # fn main() -> chatlens::Result<()> {
//! let base = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
//! let mut conv = Conversation::new("c1", "demo");
//! for i in 0..4 {
//!     conv.messages.push(
//!         Message::new(format!("m{i}"), "c1", if i % 2 == 0 { "Alice" } else { "Bob" })
//!             .with_content("weekend hiking plans")
//!             .with_timestamp(base + Duration::minutes(i)),
//!     );
//! }
//!
//! let mut analyzer = ConversationAnalyzer::new(Box::new(VecSource::new(vec![conv])));
//! analyzer.load_conversations()?;
//! let analysis = analyzer.analyze_conversation_patterns()?;
//! assert_eq!(analysis.total_conversations, 1);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::conversation::{Conversation, ConversationKind, ConversationSummary};
use crate::error::{ChatlensError, Result};
use crate::metrics::{WEEKDAY_NAMES, enrich_conversation, weekday_index};
use crate::reconstruct::ThreadReconstructionEngine;
use crate::source::ConversationSource;

/// Gaps longer than this (24 hours, in minutes) are not counted as
/// responses.
const RESPONSE_CUTOFF_MINUTES: f64 = 1440.0;

/// A response at or under this many minutes counts as "fast".
const FAST_RESPONSE_MINUTES: f64 = 5.0;

/// A response at or over this many minutes counts as "slow".
const SLOW_RESPONSE_MINUTES: f64 = 60.0;

/// How many entries the most-active rankings keep.
const TOP_CONVERSATIONS: usize = 5;
const TOP_CONTACTS: usize = 10;
const TOP_TOPICS: usize = 20;

/// Terms that mark a conversation as privacy-sensitive.
///
/// Fixed constant table, same as the stop-word list: matching is
/// case-insensitive substring over message content.
pub const SENSITIVE_KEYWORDS: &[&str] = &[
    "password",
    "passport",
    "ssn",
    "social security",
    "bank account",
    "credit card",
    "iban",
    "pin code",
    "diagnosis",
    "prescription",
    "salary",
];

/// Response-time statistics across all conversations.
///
/// A "response" is the gap between two timewise-consecutive messages in one
/// conversation where the sender changes and both messages are dated; gaps
/// over 24 hours are ignored. All values are zero when no responses exist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseTimeStats {
    /// Number of gaps counted.
    pub count: usize,
    /// Mean gap in minutes.
    pub average_minutes: f64,
    /// Median gap in minutes.
    pub median_minutes: f64,
    /// Percentage of gaps at or under 5 minutes.
    pub fast_percentage: f64,
    /// Percentage of gaps at or over 60 minutes.
    pub slow_percentage: f64,
}

/// Conversation-length distribution over fixed message-count buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthDistribution {
    /// `(label, conversation count)` pairs in ascending bucket order:
    /// `1-5`, `6-20`, `21-100`, `101-500`, `501+`.
    pub buckets: Vec<(String, usize)>,
}

/// Bucket boundaries: `(label, inclusive upper bound)`.
const LENGTH_BUCKETS: &[(&str, usize)] = &[
    ("1-5", 5),
    ("6-20", 20),
    ("21-100", 100),
    ("101-500", 500),
    ("501+", usize::MAX),
];

impl LengthDistribution {
    /// Returns the bucket label for a message count. Empty conversations
    /// fall outside every bucket.
    pub fn bucket_label(message_count: usize) -> Option<&'static str> {
        if message_count == 0 {
            return None;
        }
        LENGTH_BUCKETS
            .iter()
            .find(|(_, upper)| message_count <= *upper)
            .map(|(label, _)| *label)
    }

    fn from_conversations(conversations: &[Conversation]) -> Self {
        let mut counts = vec![0usize; LENGTH_BUCKETS.len()];
        for conv in conversations {
            if let Some(label) = Self::bucket_label(conv.message_count()) {
                if let Some(idx) = LENGTH_BUCKETS.iter().position(|(l, _)| *l == label) {
                    counts[idx] += 1;
                }
            }
        }
        Self {
            buckets: LENGTH_BUCKETS
                .iter()
                .zip(counts)
                .map(|((label, _), count)| ((*label).to_string(), count))
                .collect(),
        }
    }

    /// Returns the count for a bucket label, zero for unknown labels.
    pub fn count_for(&self, label: &str) -> usize {
        self.buckets
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, count)| *count)
    }
}

/// Aggregate statistics over reconstructed threads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThreadStats {
    /// Total threads across all conversations.
    pub total_threads: usize,
    /// Mean messages per thread.
    pub average_length: f64,
    /// Mean thread duration in minutes.
    pub average_duration_minutes: f64,
    /// Mean threads per conversation.
    pub threads_per_conversation: f64,
    /// Thread topics ranked by frequency, descending.
    pub topic_frequency: Vec<(String, usize)>,
}

/// The single most frequent hour, weekday and year-month across all message
/// timestamps, each with its count. Ties go to the smallest key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeakPeriods {
    /// Busiest hour of day (0..24).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub hour: Option<(u32, usize)>,
    /// Busiest day of week.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub weekday: Option<(String, usize)>,
    /// Busiest year-month, as `YYYY-MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub month: Option<(String, usize)>,
}

/// One entry of the cross-conversation popular-topics ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularTopic {
    /// The topic token.
    pub topic: String,
    /// Total occurrences across all conversations.
    pub total_count: usize,
    /// Number of conversations whose keyword table contributed the topic.
    pub conversation_count: usize,
}

/// The cross-conversation analysis result.
///
/// A flat, fully serializable record: every field is a derived value, never
/// a reference back into individual conversations or messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationAnalysis {
    /// Number of conversations analyzed.
    pub total_conversations: usize,
    /// Total messages across all conversations.
    pub total_messages: usize,
    /// Conversation counts per kind.
    pub conversations_by_kind: Vec<(ConversationKind, usize)>,
    /// Top conversations by message count: `(title, message count)`.
    pub most_active_conversations: Vec<(String, usize)>,
    /// Top senders by message count across all conversations.
    pub most_active_contacts: Vec<(String, usize)>,
    /// Message counts per hour of day (24 buckets).
    pub messages_by_hour: Vec<usize>,
    /// Message counts per day of week, Monday first (7 buckets).
    pub messages_by_weekday: Vec<usize>,
    /// Message counts per year-month, ascending by key.
    pub messages_by_month: Vec<(String, usize)>,
    /// Response-time statistics.
    pub response_times: ResponseTimeStats,
    /// Conversation-length distribution.
    pub length_distribution: LengthDistribution,
    /// Thread statistics.
    pub thread_stats: ThreadStats,
    /// Peak activity periods.
    pub peak_periods: PeakPeriods,
    /// Popular topics ranking.
    pub popular_topics: Vec<PopularTopic>,
    /// Conversations containing privacy-sensitive terms.
    pub sensitive_conversation_count: usize,
}

impl ConversationAnalysis {
    /// Encodes the analysis as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the analysis as JSON to a file.
    pub fn write_json(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Lifecycle state of the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerState {
    /// No conversations loaded yet.
    Unloaded,
    /// Conversations loaded and enriched; analysis not yet run.
    Loaded,
    /// At least one analysis has been produced.
    Analyzed,
}

/// Orchestrates loading, thread reconstruction and cross-conversation
/// aggregation.
pub struct ConversationAnalyzer {
    source: Box<dyn ConversationSource>,
    engine: ThreadReconstructionEngine,
    conversations: Vec<Conversation>,
    state: AnalyzerState,
}

impl ConversationAnalyzer {
    /// Creates an analyzer over a source, with default engine thresholds.
    pub fn new(source: Box<dyn ConversationSource>) -> Self {
        Self {
            source,
            engine: ThreadReconstructionEngine::new(),
            conversations: Vec::new(),
            state: AnalyzerState::Unloaded,
        }
    }

    /// Creates an analyzer with explicit engine thresholds.
    pub fn with_engine_config(source: Box<dyn ConversationSource>, config: EngineConfig) -> Self {
        Self {
            source,
            engine: ThreadReconstructionEngine::with_config(config),
            conversations: Vec::new(),
            state: AnalyzerState::Unloaded,
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    /// Returns the loaded conversations.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Drains the source, reconstructs threads and computes metrics for
    /// every conversation. Returns the number of conversations loaded.
    ///
    /// Transitions to `Loaded` when at least one conversation arrives; an
    /// empty source leaves the analyzer effectively unloaded, so a later
    /// analysis still reports the precondition error.
    pub fn load_conversations(&mut self) -> Result<usize> {
        let mut conversations = self.source.load()?;

        for conversation in &mut conversations {
            self.engine.reconstruct(conversation);
            enrich_conversation(conversation);
        }

        self.conversations = conversations;
        if !self.conversations.is_empty() {
            self.state = AnalyzerState::Loaded;
        }
        Ok(self.conversations.len())
    }

    /// Computes the cross-conversation analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::NoConversationsLoaded`] when no
    /// conversations have been loaded.
    pub fn analyze_conversation_patterns(&mut self) -> Result<ConversationAnalysis> {
        if self.conversations.is_empty() {
            return Err(ChatlensError::NoConversationsLoaded);
        }

        let conversations = &self.conversations;
        let total_messages = conversations.iter().map(Conversation::message_count).sum();

        let (messages_by_hour, messages_by_weekday, months) =
            temporal_histograms(conversations);
        let peak_periods = peak_periods(&messages_by_hour, &messages_by_weekday, &months);

        let analysis = ConversationAnalysis {
            total_conversations: conversations.len(),
            total_messages,
            conversations_by_kind: kind_counts(conversations),
            most_active_conversations: most_active_conversations(conversations),
            most_active_contacts: most_active_contacts(conversations),
            messages_by_hour,
            messages_by_weekday,
            messages_by_month: months.into_iter().collect(),
            response_times: response_time_stats(conversations),
            length_distribution: LengthDistribution::from_conversations(conversations),
            thread_stats: thread_stats(conversations),
            peak_periods,
            popular_topics: popular_topics(conversations),
            sensitive_conversation_count: sensitive_count(conversations),
        };

        self.state = AnalyzerState::Analyzed;
        Ok(analysis)
    }

    /// Case-insensitive substring search over conversations.
    ///
    /// `search_content` matches message text; `search_participants` matches
    /// participant display names. A conversation matches when any enabled
    /// dimension matches. O(messages) per query; no index is maintained.
    pub fn search_conversations(
        &self,
        query: &str,
        search_content: bool,
        search_participants: bool,
    ) -> Vec<&Conversation> {
        let needle = query.to_lowercase();
        self.conversations
            .iter()
            .filter(|conv| {
                if search_participants
                    && conv
                        .participants
                        .iter()
                        .any(|p| p.name.to_lowercase().contains(&needle))
                {
                    return true;
                }
                if search_content
                    && conv
                        .messages
                        .iter()
                        .any(|m| m.text().to_lowercase().contains(&needle))
                {
                    return true;
                }
                false
            })
            .collect()
    }

    /// Flat per-conversation summaries for external exporters.
    pub fn conversation_summaries(&self) -> Vec<ConversationSummary> {
        self.conversations.iter().map(Conversation::summary).collect()
    }
}

// ============================================================================
// Aggregation helpers (pure functions over the loaded conversation set)
// ============================================================================

fn kind_counts(conversations: &[Conversation]) -> Vec<(ConversationKind, usize)> {
    let direct = conversations
        .iter()
        .filter(|c| c.kind() == ConversationKind::Direct)
        .count();
    let group = conversations.len() - direct;

    let mut counts = Vec::new();
    if direct > 0 {
        counts.push((ConversationKind::Direct, direct));
    }
    if group > 0 {
        counts.push((ConversationKind::Group, group));
    }
    counts
}

fn most_active_conversations(conversations: &[Conversation]) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = conversations
        .iter()
        .map(|c| (c.title.clone(), c.message_count()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_CONVERSATIONS);
    ranked
}

fn most_active_contacts(conversations: &[Conversation]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for conv in conversations {
        for msg in &conv.messages {
            *counts.entry(msg.sender.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_CONTACTS);
    ranked
}

type MonthHistogram = BTreeMap<String, usize>;

fn temporal_histograms(
    conversations: &[Conversation],
) -> (Vec<usize>, Vec<usize>, MonthHistogram) {
    let mut by_hour = vec![0usize; 24];
    let mut by_weekday = vec![0usize; 7];
    let mut by_month = MonthHistogram::new();

    for conv in conversations {
        for ts in conv.messages.iter().filter_map(|m| m.timestamp) {
            by_hour[ts.hour() as usize] += 1;
            by_weekday[weekday_index(ts.weekday())] += 1;
            *by_month
                .entry(format!("{:04}-{:02}", ts.year(), ts.month()))
                .or_default() += 1;
        }
    }

    (by_hour, by_weekday, by_month)
}

fn peak_periods(
    by_hour: &[usize],
    by_weekday: &[usize],
    by_month: &MonthHistogram,
) -> PeakPeriods {
    let peak_index = |buckets: &[usize]| {
        buckets
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, n)| *n > 0)
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
    };

    // BTreeMap iterates ascending, so with a strict `>` the earliest month
    // wins ties.
    let month = by_month
        .iter()
        .fold(None::<(String, usize)>, |best, (key, &count)| match best {
            Some((_, best_count)) if count <= best_count => best,
            Some(_) if count > 0 => Some((key.clone(), count)),
            None if count > 0 => Some((key.clone(), count)),
            other => other,
        });

    PeakPeriods {
        hour: peak_index(by_hour).map(|(i, n)| (i as u32, n)),
        weekday: peak_index(by_weekday).map(|(i, n)| (WEEKDAY_NAMES[i].to_string(), n)),
        month,
    }
}

fn response_time_stats(conversations: &[Conversation]) -> ResponseTimeStats {
    let mut gaps: Vec<f64> = Vec::new();

    for conv in conversations {
        let mut dated: Vec<_> = conv
            .messages
            .iter()
            .filter(|m| m.timestamp.is_some())
            .collect();
        dated.sort_by_key(|m| m.timestamp);

        for pair in dated.windows(2) {
            if pair[0].sender == pair[1].sender {
                continue;
            }
            if let (Some(prev), Some(next)) = (pair[0].timestamp, pair[1].timestamp) {
                let minutes = (next - prev).num_seconds() as f64 / 60.0;
                if minutes <= RESPONSE_CUTOFF_MINUTES {
                    gaps.push(minutes);
                }
            }
        }
    }

    if gaps.is_empty() {
        return ResponseTimeStats::default();
    }

    gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let count = gaps.len();
    let total: f64 = gaps.iter().sum();
    let median = if count % 2 == 1 {
        gaps[count / 2]
    } else {
        (gaps[count / 2 - 1] + gaps[count / 2]) / 2.0
    };
    let fast = gaps.iter().filter(|g| **g <= FAST_RESPONSE_MINUTES).count();
    let slow = gaps.iter().filter(|g| **g >= SLOW_RESPONSE_MINUTES).count();

    ResponseTimeStats {
        count,
        average_minutes: total / count as f64,
        median_minutes: median,
        fast_percentage: fast as f64 / count as f64 * 100.0,
        slow_percentage: slow as f64 / count as f64 * 100.0,
    }
}

fn thread_stats(conversations: &[Conversation]) -> ThreadStats {
    let threads: Vec<_> = conversations.iter().flat_map(|c| &c.threads).collect();
    let total_threads = threads.len();

    if total_threads == 0 {
        return ThreadStats::default();
    }

    let total_length: usize = threads.iter().map(|t| t.len()).sum();
    let total_duration: f64 = threads.iter().map(|t| t.duration_minutes).sum();

    let mut topic_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for thread in &threads {
        if let Some(topic) = &thread.topic {
            *topic_counts.entry(topic.as_str()).or_default() += 1;
        }
    }
    let mut topic_frequency: Vec<(String, usize)> = topic_counts
        .into_iter()
        .map(|(topic, count)| (topic.to_string(), count))
        .collect();
    topic_frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ThreadStats {
        total_threads,
        average_length: total_length as f64 / total_threads as f64,
        average_duration_minutes: total_duration / total_threads as f64,
        threads_per_conversation: total_threads as f64 / conversations.len() as f64,
        topic_frequency,
    }
}

fn popular_topics(conversations: &[Conversation]) -> Vec<PopularTopic> {
    // (total occurrences, contributing conversations)
    let mut aggregate: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for conv in conversations {
        for (topic, count) in &conv.keyword_frequency {
            let entry = aggregate.entry(topic.as_str()).or_default();
            entry.0 += count;
            entry.1 += 1;
        }
    }

    let mut ranked: Vec<PopularTopic> = aggregate
        .into_iter()
        .map(|(topic, (total_count, conversation_count))| PopularTopic {
            topic: topic.to_string(),
            total_count,
            conversation_count,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| a.topic.cmp(&b.topic))
    });
    ranked.truncate(TOP_TOPICS);
    ranked
}

fn sensitive_count(conversations: &[Conversation]) -> usize {
    conversations
        .iter()
        .filter(|conv| {
            conv.messages.iter().any(|m| {
                let text = m.text().to_lowercase();
                SENSITIVE_KEYWORDS.iter().any(|kw| text.contains(kw))
            })
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::VecSource;
    use crate::{Message, Participant};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn conv_with_gaps() -> Conversation {
        // A@00:00, B@00:03, A@01:30 — gaps of 3 and 87 minutes.
        Conversation::new("c1", "gaps")
            .with_participant(Participant::owner("A"))
            .with_participant(Participant::new("B"))
            .with_message(
                Message::new("m1", "c1", "A")
                    .with_content("first")
                    .with_timestamp(ts(0)),
            )
            .with_message(
                Message::new("m2", "c1", "B")
                    .with_content("quick reply")
                    .with_timestamp(ts(3)),
            )
            .with_message(
                Message::new("m3", "c1", "A")
                    .with_content("late reply")
                    .with_timestamp(ts(90)),
            )
    }

    fn analyzer_over(conversations: Vec<Conversation>) -> ConversationAnalyzer {
        ConversationAnalyzer::new(Box::new(VecSource::new(conversations)))
    }

    #[test]
    fn test_analyze_before_load_fails() {
        let mut analyzer = analyzer_over(vec![conv_with_gaps()]);
        let err = analyzer.analyze_conversation_patterns().unwrap_err();
        assert!(err.is_not_loaded());
        assert_eq!(analyzer.state(), AnalyzerState::Unloaded);
    }

    #[test]
    fn test_empty_source_stays_unloaded() {
        let mut analyzer = analyzer_over(vec![]);
        assert_eq!(analyzer.load_conversations().unwrap(), 0);
        assert_eq!(analyzer.state(), AnalyzerState::Unloaded);
        assert!(analyzer.analyze_conversation_patterns().unwrap_err().is_not_loaded());
    }

    #[test]
    fn test_state_transitions() {
        let mut analyzer = analyzer_over(vec![conv_with_gaps()]);
        assert_eq!(analyzer.state(), AnalyzerState::Unloaded);

        analyzer.load_conversations().unwrap();
        assert_eq!(analyzer.state(), AnalyzerState::Loaded);

        analyzer.analyze_conversation_patterns().unwrap();
        assert_eq!(analyzer.state(), AnalyzerState::Analyzed);
    }

    #[test]
    fn test_load_populates_threads_and_metrics() {
        let mut analyzer = analyzer_over(vec![conv_with_gaps()]);
        analyzer.load_conversations().unwrap();
        let conv = &analyzer.conversations()[0];
        assert!(conv.metrics.is_some());
        assert!(!conv.keyword_frequency.is_empty());
    }

    #[test]
    fn test_response_time_scenario() {
        // Gaps of 3 and 87 minutes: 1 of 2 fast (50%), average 45.
        let stats = response_time_stats(&[conv_with_gaps()]);
        assert_eq!(stats.count, 2);
        assert!((stats.average_minutes - 45.0).abs() < f64::EPSILON);
        assert!((stats.median_minutes - 45.0).abs() < f64::EPSILON);
        assert!((stats.fast_percentage - 50.0).abs() < f64::EPSILON);
        assert!((stats.slow_percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_response_time_ignores_same_sender_and_long_gaps() {
        let conv = Conversation::new("c1", "test")
            .with_message(Message::new("m1", "c1", "A").with_timestamp(ts(0)))
            .with_message(Message::new("m2", "c1", "A").with_timestamp(ts(5))) // same sender
            .with_message(Message::new("m3", "c1", "B").with_timestamp(ts(5 + 2000))); // >24h
        let stats = response_time_stats(&[conv]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average_minutes, 0.0);
    }

    #[test]
    fn test_length_bucket_boundaries() {
        assert_eq!(LengthDistribution::bucket_label(1), Some("1-5"));
        assert_eq!(LengthDistribution::bucket_label(5), Some("1-5"));
        assert_eq!(LengthDistribution::bucket_label(6), Some("6-20"));
        assert_eq!(LengthDistribution::bucket_label(100), Some("21-100"));
        assert_eq!(LengthDistribution::bucket_label(501), Some("501+"));
        assert_eq!(LengthDistribution::bucket_label(0), None);
    }

    #[test]
    fn test_length_distribution_counts() {
        let five = (0..5).fold(Conversation::new("c1", "five"), |c, i| {
            c.with_message(Message::new(format!("m{i}"), "c1", "A"))
        });
        let six = (0..6).fold(Conversation::new("c2", "six"), |c, i| {
            c.with_message(Message::new(format!("m{i}"), "c2", "A"))
        });
        let dist = LengthDistribution::from_conversations(&[five, six]);
        assert_eq!(dist.count_for("1-5"), 1);
        assert_eq!(dist.count_for("6-20"), 1);
        assert_eq!(dist.count_for("21-100"), 0);
    }

    #[test]
    fn test_thread_stats_empty() {
        let stats = thread_stats(&[Conversation::new("c1", "no threads")]);
        assert_eq!(stats.total_threads, 0);
        assert_eq!(stats.average_length, 0.0);
    }

    #[test]
    fn test_peak_periods_from_histograms() {
        let mut by_month = MonthHistogram::new();
        by_month.insert("2024-05".to_string(), 3);
        by_month.insert("2024-06".to_string(), 3);

        let mut by_hour = vec![0; 24];
        by_hour[9] = 4;
        let mut by_weekday = vec![0; 7];
        by_weekday[2] = 4;

        let peaks = peak_periods(&by_hour, &by_weekday, &by_month);
        assert_eq!(peaks.hour, Some((9, 4)));
        assert_eq!(peaks.weekday, Some(("Wednesday".to_string(), 4)));
        // Tie between months goes to the earliest.
        assert_eq!(peaks.month, Some(("2024-05".to_string(), 3)));
    }

    #[test]
    fn test_search_by_participant_and_content() {
        let mut analyzer = analyzer_over(vec![
            Conversation::new("c1", "one")
                .with_participant(Participant::new("Alice"))
                .with_message(Message::new("m1", "c1", "Alice").with_content("hello world")),
            Conversation::new("c2", "two")
                .with_participant(Participant::new("Bob"))
                .with_message(Message::new("m2", "c2", "Bob").with_content("goodbye")),
        ]);
        analyzer.load_conversations().unwrap();

        let by_name = analyzer.search_conversations("ALICE", false, true);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "c1");

        let by_content = analyzer.search_conversations("goodbye", true, false);
        assert_eq!(by_content.len(), 1);
        assert_eq!(by_content[0].id, "c2");

        let disabled = analyzer.search_conversations("alice", false, false);
        assert!(disabled.is_empty());
    }

    #[test]
    fn test_sensitive_count() {
        let sensitive = Conversation::new("c1", "secrets").with_message(
            Message::new("m1", "c1", "A").with_content("my Password is hunter2"),
        );
        let benign = Conversation::new("c2", "chat")
            .with_message(Message::new("m2", "c2", "B").with_content("see you at lunch"));
        assert_eq!(sensitive_count(&[sensitive, benign]), 1);
    }

    #[test]
    fn test_popular_topics_counts_conversations() {
        let mut a = Conversation::new("c1", "a").with_message(
            Message::new("m1", "c1", "A").with_content("hiking hiking weekend"),
        );
        let mut b = Conversation::new("c2", "b")
            .with_message(Message::new("m2", "c2", "B").with_content("hiking boots"));
        enrich_conversation(&mut a);
        enrich_conversation(&mut b);

        let topics = popular_topics(&[a, b]);
        let hiking = topics.iter().find(|t| t.topic == "hiking").unwrap();
        assert_eq!(hiking.conversation_count, 2);
        assert!(hiking.total_count >= 2);
    }

    #[test]
    fn test_full_analysis_shape() {
        let mut analyzer = analyzer_over(vec![conv_with_gaps()]);
        analyzer.load_conversations().unwrap();
        let analysis = analyzer.analyze_conversation_patterns().unwrap();

        assert_eq!(analysis.total_conversations, 1);
        assert_eq!(analysis.total_messages, 3);
        assert_eq!(
            analysis.conversations_by_kind,
            vec![(ConversationKind::Direct, 1)]
        );
        assert_eq!(analysis.most_active_conversations[0].0, "gaps");
        assert_eq!(analysis.messages_by_hour.len(), 24);
        assert_eq!(analysis.messages_by_weekday.len(), 7);
        assert_eq!(analysis.messages_by_month, vec![("2024-06".to_string(), 3)]);
        assert!(analysis.peak_periods.hour.is_some());
        assert_eq!(analysis.sensitive_conversation_count, 0);
    }

    #[test]
    fn test_analysis_serializes() {
        let mut analyzer = analyzer_over(vec![conv_with_gaps()]);
        analyzer.load_conversations().unwrap();
        let analysis = analyzer.analyze_conversation_patterns().unwrap();

        let json = analysis.to_json().unwrap();
        assert!(json.contains("total_conversations"));
        let parsed: ConversationAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, analysis);
    }

    #[test]
    fn test_summaries() {
        let mut analyzer = analyzer_over(vec![conv_with_gaps()]);
        analyzer.load_conversations().unwrap();
        let summaries = analyzer.conversation_summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].message_count, 3);
    }
}
