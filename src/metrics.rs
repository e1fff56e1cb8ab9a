//! Per-conversation metrics rollups.
//!
//! [`enrich_conversation`] is the single entry point: after thread
//! reconstruction it writes [`ConversationMetrics`], the
//! [`ActivityPattern`] histograms, the message-type ranking and the keyword
//! frequency table back onto the conversation. Everything here is a pure
//! computation over the message list; all averages guard their denominators
//! and resolve empty inputs to zero/absent values.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::Conversation;
use crate::message::MessageKind;
use crate::topics::{count_emoji, extract_topics};

/// Hour-of-day and day-of-week message histograms for one conversation.
///
/// `by_hour` has 24 buckets, `by_weekday` 7 (Monday first). Both are empty
/// until [`enrich_conversation`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityPattern {
    /// Message counts per hour of day (0..24).
    #[serde(default)]
    pub by_hour: Vec<usize>,

    /// Message counts per day of week, Monday first.
    #[serde(default)]
    pub by_weekday: Vec<usize>,
}

impl ActivityPattern {
    /// Returns the busiest hour with its count, smallest hour winning ties.
    /// `None` if no dated messages were seen.
    pub fn peak_hour(&self) -> Option<(u32, usize)> {
        peak_bucket(&self.by_hour).map(|(i, n)| (i as u32, n))
    }

    /// Returns the busiest weekday name with its count, earliest weekday
    /// winning ties. `None` if no dated messages were seen.
    pub fn peak_weekday(&self) -> Option<(&'static str, usize)> {
        peak_bucket(&self.by_weekday).map(|(i, n)| (WEEKDAY_NAMES[i], n))
    }
}

pub(crate) const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Index of the largest non-zero bucket; first index wins ties.
fn peak_bucket(buckets: &[usize]) -> Option<(usize, usize)> {
    buckets
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, n)| *n > 0)
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
}

/// Per-conversation metrics rollup.
///
/// All fields are plain derived values, safe to serialize as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMetrics {
    /// Total number of messages.
    pub total_messages: usize,

    /// Number of participants.
    pub total_participants: usize,

    /// Message counts per sender, descending, ties broken by name.
    pub messages_per_participant: Vec<(String, usize)>,

    /// Sender with the most messages, if any messages exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub most_active_participant: Option<String>,

    /// Busiest hour of day (0..24), if any dated messages exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub most_active_hour: Option<u32>,

    /// Busiest day of week, if any dated messages exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub most_active_day: Option<String>,

    /// Emoji characters across all message content.
    pub emoji_count: usize,

    /// Total reactions across all messages.
    pub reaction_count: usize,

    /// Total media attachments across all messages.
    pub media_count: usize,

    /// Earliest dated message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub first_message: Option<DateTime<Utc>>,

    /// Latest dated message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub last_message: Option<DateTime<Utc>>,

    /// Average messages per day over the conversation's date range.
    /// Zero when no messages are dated.
    pub messages_per_day: f64,
}

/// Computes and stores all derived per-conversation data.
///
/// Writes [`ConversationMetrics`], [`ActivityPattern`], the message-type
/// ranking and the keyword frequency table onto the conversation. Safe to
/// call repeatedly; each call recomputes from the message list.
pub fn enrich_conversation(conversation: &mut Conversation) {
    conversation.activity = compute_activity(conversation);
    conversation.message_type_ranking = compute_type_ranking(conversation);
    conversation.keyword_frequency = compute_keyword_frequency(conversation);
    conversation.metrics = Some(compute_metrics(conversation));
}

/// Computes the metrics rollup for one conversation.
pub fn compute_metrics(conversation: &Conversation) -> ConversationMetrics {
    let messages = &conversation.messages;

    let mut per_sender: BTreeMap<&str, usize> = BTreeMap::new();
    let mut emoji_count = 0;
    let mut reaction_count = 0;
    let mut media_count = 0;

    for msg in messages {
        *per_sender.entry(msg.sender.as_str()).or_default() += 1;
        emoji_count += count_emoji(msg.text());
        reaction_count += msg.reactions.len();
        media_count += msg.media.len();
    }

    let mut messages_per_participant: Vec<(String, usize)> = per_sender
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    // Descending by count; BTreeMap iteration already ordered names for ties.
    messages_per_participant.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let most_active_participant = messages_per_participant
        .first()
        .map(|(name, _)| name.clone());

    let range = conversation.date_range();
    let messages_per_day = match range {
        Some((first, last)) => {
            let days = (last.date_naive() - first.date_naive()).num_days() + 1;
            messages.len() as f64 / days as f64
        }
        None => 0.0,
    };

    let activity = &conversation.activity;

    ConversationMetrics {
        total_messages: messages.len(),
        total_participants: conversation.participants.len(),
        messages_per_participant,
        most_active_participant,
        most_active_hour: activity.peak_hour().map(|(h, _)| h),
        most_active_day: activity.peak_weekday().map(|(d, _)| d.to_string()),
        emoji_count,
        reaction_count,
        media_count,
        first_message: range.map(|(first, _)| first),
        last_message: range.map(|(_, last)| last),
        messages_per_day,
    }
}

/// Builds the hour/weekday histograms from dated messages.
pub fn compute_activity(conversation: &Conversation) -> ActivityPattern {
    let mut by_hour = vec![0usize; 24];
    let mut by_weekday = vec![0usize; 7];

    for ts in conversation.messages.iter().filter_map(|m| m.timestamp) {
        by_hour[ts.hour() as usize] += 1;
        by_weekday[weekday_index(ts.weekday())] += 1;
    }

    ActivityPattern {
        by_hour,
        by_weekday,
    }
}

pub(crate) fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// Ranks message kinds by frequency, most common first, ties broken by the
/// kind's declaration order.
pub fn compute_type_ranking(conversation: &Conversation) -> Vec<(MessageKind, usize)> {
    let mut counts: BTreeMap<MessageKind, usize> = BTreeMap::new();
    for msg in &conversation.messages {
        *counts.entry(msg.kind()).or_default() += 1;
    }

    let mut ranking: Vec<(MessageKind, usize)> = counts.into_iter().collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranking
}

/// Builds the keyword frequency table: topic tokens (excluding the synthetic
/// `type_` tags) counted across all messages, descending, ties broken
/// lexicographically.
pub fn compute_keyword_frequency(conversation: &Conversation) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for msg in &conversation.messages {
        for topic in extract_topics(msg) {
            if !topic.starts_with("type_") {
                *counts.entry(topic).or_default() += 1;
            }
        }
    }

    let mut table: Vec<(String, usize)> = counts.into_iter().collect();
    table.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MediaAttachment, MediaKind, Reaction};
    use crate::{Message, Participant};
    use chrono::TimeZone;

    fn ts(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, h, m, 0).unwrap()
    }

    fn sample_conversation() -> Conversation {
        Conversation::new("c1", "test")
            .with_participant(Participant::owner("Alice"))
            .with_participant(Participant::new("Bob"))
            .with_message(
                Message::new("m1", "c1", "Alice")
                    .with_content("planning the weekend hike 🎉")
                    .with_timestamp(ts(10, 9, 0)), // June 10 2024, a Monday
            )
            .with_message(
                Message::new("m2", "c1", "Bob")
                    .with_content("sounds great")
                    .with_timestamp(ts(10, 9, 5))
                    .with_reaction(Reaction::new("👍", "Alice")),
            )
            .with_message(
                Message::new("m3", "c1", "Alice")
                    .with_media(MediaAttachment::new(MediaKind::Photo))
                    .with_timestamp(ts(11, 18, 0)),
            )
    }

    #[test]
    fn test_enrich_populates_everything() {
        let mut conv = sample_conversation();
        enrich_conversation(&mut conv);
        assert!(conv.metrics.is_some());
        assert_eq!(conv.activity.by_hour.len(), 24);
        assert!(!conv.message_type_ranking.is_empty());
        assert!(!conv.keyword_frequency.is_empty());
    }

    #[test]
    fn test_metrics_counts() {
        let mut conv = sample_conversation();
        enrich_conversation(&mut conv);
        let metrics = conv.metrics.unwrap();

        assert_eq!(metrics.total_messages, 3);
        assert_eq!(metrics.total_participants, 2);
        assert_eq!(metrics.most_active_participant.as_deref(), Some("Alice"));
        assert_eq!(metrics.emoji_count, 1);
        assert_eq!(metrics.reaction_count, 1);
        assert_eq!(metrics.media_count, 1);
        assert_eq!(metrics.first_message, Some(ts(10, 9, 0)));
        assert_eq!(metrics.last_message, Some(ts(11, 18, 0)));
        // 3 messages over 2 calendar days
        assert!((metrics.messages_per_day - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_empty_conversation() {
        let mut conv = Conversation::new("c1", "empty");
        enrich_conversation(&mut conv);
        let metrics = conv.metrics.unwrap();

        assert_eq!(metrics.total_messages, 0);
        assert!(metrics.most_active_participant.is_none());
        assert!(metrics.most_active_hour.is_none());
        assert!(metrics.most_active_day.is_none());
        assert_eq!(metrics.messages_per_day, 0.0);
    }

    #[test]
    fn test_activity_histograms() {
        let conv = sample_conversation();
        let activity = compute_activity(&conv);

        assert_eq!(activity.by_hour[9], 2);
        assert_eq!(activity.by_hour[18], 1);
        assert_eq!(activity.peak_hour(), Some((9, 2)));
        // June 10 2024 is a Monday, June 11 a Tuesday
        assert_eq!(activity.by_weekday[0], 2);
        assert_eq!(activity.by_weekday[1], 1);
        assert_eq!(activity.peak_weekday(), Some(("Monday", 2)));
    }

    #[test]
    fn test_activity_ignores_undated() {
        let conv = Conversation::new("c1", "test")
            .with_message(Message::new("m1", "c1", "A").with_content("no clock"));
        let activity = compute_activity(&conv);
        assert!(activity.peak_hour().is_none());
        assert!(activity.peak_weekday().is_none());
    }

    #[test]
    fn test_peak_hour_tie_breaks_low() {
        let conv = Conversation::new("c1", "test")
            .with_message(Message::new("m1", "c1", "A").with_timestamp(ts(10, 8, 0)))
            .with_message(Message::new("m2", "c1", "A").with_timestamp(ts(10, 22, 0)));
        let activity = compute_activity(&conv);
        assert_eq!(activity.peak_hour(), Some((8, 1)));
    }

    #[test]
    fn test_type_ranking() {
        let conv = sample_conversation();
        let ranking = compute_type_ranking(&conv);
        assert_eq!(ranking[0], (MessageKind::Text, 2));
        assert_eq!(ranking[1], (MessageKind::Photo, 1));
    }

    #[test]
    fn test_keyword_frequency_excludes_type_tags() {
        let conv = sample_conversation();
        let table = compute_keyword_frequency(&conv);
        assert!(table.iter().all(|(k, _)| !k.starts_with("type_")));
        assert!(table.iter().any(|(k, _)| k == "weekend"));
    }

    #[test]
    fn test_per_participant_tie_breaks_by_name() {
        let conv = Conversation::new("c1", "test")
            .with_message(Message::new("m1", "c1", "Zoe").with_content("hi"))
            .with_message(Message::new("m2", "c1", "Amy").with_content("hi"));
        let metrics = compute_metrics(&conv);
        assert_eq!(metrics.most_active_participant.as_deref(), Some("Amy"));
    }
}
