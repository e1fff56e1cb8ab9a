//! Conversations, participants and reconstructed threads.
//!
//! A [`Conversation`] is the unit of work for this crate: the external parser
//! builds one per export file, the reconstruction engine writes its derived
//! `threads`, the metrics pass writes its rollups, and the analyzer only
//! reads. A conversation exclusively owns its messages and threads; nothing
//! is shared across conversations.
//!
//! # Example
//!
//! ```
//! use chatlens::{Conversation, ConversationKind, Message, Participant};
//!
//! let conv = Conversation::new("conv_1", "Alice & Bob")
//!     .with_participant(Participant::owner("Alice"))
//!     .with_participant(Participant::new("Bob"))
//!     .with_message(Message::new("m1", "conv_1", "Alice").with_content("hi"));
//!
//! assert_eq!(conv.kind(), ConversationKind::Direct);
//! assert_eq!(conv.message_count(), 1);
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Message;
use crate::message::MessageKind;
use crate::metrics::{ActivityPattern, ConversationMetrics};

/// A participant in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display name.
    pub name: String,

    /// Platform handle (username), if the export provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub handle: Option<String>,

    /// `true` if this participant is the account owner of the export.
    #[serde(default)]
    pub is_owner: bool,
}

impl Participant {
    /// Creates a participant that is not the account owner.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
            is_owner: false,
        }
    }

    /// Creates the account-owner participant.
    pub fn owner(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
            is_owner: true,
        }
    }

    /// Builder method to set the handle.
    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }
}

/// The kind of a conversation, derived from its participant count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    /// Two or fewer participants
    #[serde(alias = "dm")]
    Direct,
    /// More than two participants
    Group,
}

impl std::fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationKind::Direct => write!(f, "direct"),
            ConversationKind::Group => write!(f, "group"),
        }
    }
}

impl std::str::FromStr for ConversationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" | "dm" => Ok(ConversationKind::Direct),
            "group" => Ok(ConversationKind::Group),
            _ => Err(format!(
                "Unknown conversation kind: '{s}'. Expected one of: direct, group"
            )),
        }
    }
}

/// A coherent exchange reconstructed from a conversation's message stream.
///
/// Threads are produced by
/// [`ThreadReconstructionEngine::reconstruct_threads`](crate::reconstruct::ThreadReconstructionEngine::reconstruct_threads).
/// Their messages are always sorted ascending by timestamp and form a
/// subsequence of the owning conversation's message order. Because the merge
/// step is overlap-tolerant, one message may appear in more than one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationThread {
    /// Sequential thread identifier within the conversation (`thread_0`, …).
    pub id: String,

    /// The messages judged to form this exchange, ascending by timestamp.
    pub messages: Vec<Message>,

    /// Display names of everyone who sent a message in this thread.
    pub participants: BTreeSet<String>,

    /// Timestamp of the earliest dated message, if any message is dated.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    /// Timestamp of the latest dated message, if any message is dated.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    /// Span between start and end, in minutes. Zero when either bound is
    /// missing.
    pub duration_minutes: f64,

    /// Inferred or assigned topic label.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub topic: Option<String>,
}

impl ConversationThread {
    /// Returns the number of messages in this thread.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the thread holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// One conversation from an export: participants plus the chronological
/// message list, and the derived structures written back by the engine and
/// the metrics pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Stable conversation identifier within the export.
    pub id: String,

    /// Human-readable title (chat name, or the peer's name for DMs).
    pub title: String,

    /// Everyone in the conversation.
    #[serde(default)]
    pub participants: Vec<Participant>,

    /// The full message list, non-decreasing by timestamp.
    ///
    /// The external parser sorts this; the engine re-sorts before segmenting.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Reconstructed threads. Empty until the engine runs.
    #[serde(default)]
    pub threads: Vec<ConversationThread>,

    /// Per-conversation metrics rollup. `None` until computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub metrics: Option<ConversationMetrics>,

    /// Hour/weekday activity histograms. Empty until computed.
    #[serde(default)]
    pub activity: ActivityPattern,

    /// Message kinds ranked by frequency, most common first.
    #[serde(default)]
    pub message_type_ranking: Vec<(MessageKind, usize)>,

    /// Keywords ranked by frequency, most common first.
    #[serde(default)]
    pub keyword_frequency: Vec<(String, usize)>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            participants: Vec::new(),
            messages: Vec::new(),
            threads: Vec::new(),
            metrics: None,
            activity: ActivityPattern::default(),
            message_type_ranking: Vec::new(),
            keyword_frequency: Vec::new(),
        }
    }

    /// Builder method to add a participant.
    #[must_use]
    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participants.push(participant);
        self
    }

    /// Builder method to add a message.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Returns the conversation kind: [`Direct`](ConversationKind::Direct)
    /// for two or fewer participants, [`Group`](ConversationKind::Group)
    /// otherwise.
    pub fn kind(&self) -> ConversationKind {
        if self.participants.len() <= 2 {
            ConversationKind::Direct
        } else {
            ConversationKind::Group
        }
    }

    /// Returns the number of messages.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the earliest and latest message timestamps, ignoring undated
    /// messages. `None` when no message carries a timestamp.
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut dated = self.messages.iter().filter_map(|m| m.timestamp);
        let first = dated.next()?;
        let (min, max) = dated.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
        Some((min, max))
    }

    /// Builds the flat summary record handed to external exporters.
    pub fn summary(&self) -> ConversationSummary {
        let range = self.date_range();
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            kind: self.kind(),
            participant_count: self.participants.len(),
            message_count: self.messages.len(),
            thread_count: self.threads.len(),
            start_date: range.map(|(start, _)| start),
            end_date: range.map(|(_, end)| end),
        }
    }
}

/// Flat per-conversation summary suitable for direct JSON encoding.
///
/// Exposed to external report exporters; holds only derived values, never
/// references back into the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub id: String,
    /// Conversation title.
    pub title: String,
    /// Direct or group.
    pub kind: ConversationKind,
    /// Number of participants.
    pub participant_count: usize,
    /// Number of messages.
    pub message_count: usize,
    /// Number of reconstructed threads.
    pub thread_count: usize,
    /// Earliest dated message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Latest dated message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}
