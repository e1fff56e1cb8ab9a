//! Normalized message records for all chat platforms.
//!
//! This module provides [`Message`], the normalized representation the
//! external export parser hands to the reconstruction engine. All
//! platform-specific formats are converted into this structure before
//! anything in this crate sees them.
//!
//! # Overview
//!
//! A message consists of:
//! - **Required**: `id`, `conversation_id` and `sender`
//! - **Optional**: `timestamp`, `content`
//! - **Collections**: `media` attachments, `reactions`
//!
//! A missing timestamp is legal everywhere: ordering, thread reconstruction
//! and analytics all treat it as "no concrete instant" rather than an error.
//!
//! # Examples
//!
//! ```
//! use chatlens::Message;
//! use chrono::Utc;
//!
//! let msg = Message::new("msg_1", "conv_1", "Alice")
//!     .with_content("Hello, world! #greetings")
//!     .with_timestamp(Utc::now());
//!
//! assert_eq!(msg.sender(), "Alice");
//! assert!(msg.timestamp().is_some());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a media attachment on a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A photo or image attachment
    Photo,
    /// A video attachment
    Video,
    /// An audio clip or voice message
    Audio,
    /// An animated GIF
    Gif,
    /// A sticker
    Sticker,
}

impl MediaKind {
    /// Returns the lowercase name used in derived topic tags and rankings.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Gif => "gif",
            MediaKind::Sticker => "sticker",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media attachment carried by a message.
///
/// The URI is whatever the export provided (a relative path inside the
/// export archive, usually); this crate never dereferences it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// What kind of media this is.
    pub kind: MediaKind,

    /// Export-relative location of the media file, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub uri: Option<String>,
}

impl MediaAttachment {
    /// Creates an attachment of the given kind with no URI.
    pub fn new(kind: MediaKind) -> Self {
        Self { kind, uri: None }
    }

    /// Builder method to set the URI.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

/// A reaction left on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// The reaction symbol, usually a single emoji.
    pub emoji: String,

    /// Display name of the person who reacted.
    pub actor: String,

    /// When the reaction was left, if the export records it.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Reaction {
    /// Creates a reaction without a timestamp.
    pub fn new(emoji: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            actor: actor.into(),
            timestamp: None,
        }
    }

    /// Builder method to set the reaction timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }
}

/// The derived kind of a message, based on its first media attachment.
///
/// Used for the synthetic `type_<kind>` topic tag and for per-conversation
/// message-type rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text (no attachments)
    Text,
    /// Carries a photo
    Photo,
    /// Carries a video
    Video,
    /// Carries audio
    Audio,
    /// Carries a GIF
    Gif,
    /// Carries a sticker
    Sticker,
}

impl MessageKind {
    /// Returns the lowercase name, as used in `type_<kind>` topic tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Photo => "photo",
            MessageKind::Video => "video",
            MessageKind::Audio => "audio",
            MessageKind::Gif => "gif",
            MessageKind::Sticker => "sticker",
        }
    }

    /// Returns all kinds, in ranking display order.
    pub fn all() -> &'static [MessageKind] {
        &[
            MessageKind::Text,
            MessageKind::Photo,
            MessageKind::Video,
            MessageKind::Audio,
            MessageKind::Gif,
            MessageKind::Sticker,
        ]
    }
}

impl From<MediaKind> for MessageKind {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Photo => MessageKind::Photo,
            MediaKind::Video => MessageKind::Video,
            MediaKind::Audio => MessageKind::Audio,
            MediaKind::Gif => MessageKind::Gif,
            MediaKind::Sticker => MessageKind::Sticker,
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized chat message from any supported platform.
///
/// The external parser converts platform-native records into this universal
/// representation; everything downstream (thread reconstruction, metrics,
/// analytics) operates only on this struct.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `id` | `String` | Stable message identifier within the export |
/// | `conversation_id` | `String` | Identifier of the owning conversation |
/// | `sender` | `String` | Display name of the message author |
/// | `timestamp` | `Option<DateTime<Utc>>` | When the message was sent |
/// | `content` | `Option<String>` | Text content, if any |
/// | `media` | `Vec<MediaAttachment>` | Zero or more attachments |
/// | `reactions` | `Vec<Reaction>` | Reactions in the order the export lists them |
///
/// # Construction
///
/// Use [`Message::new`] plus builder methods:
///
/// ```
/// use chatlens::{MediaAttachment, MediaKind, Message, Reaction};
/// use chrono::Utc;
///
/// let msg = Message::new("msg_42", "conv_1", "Alice")
///     .with_content("look at this")
///     .with_timestamp(Utc::now())
///     .with_media(MediaAttachment::new(MediaKind::Photo))
///     .with_reaction(Reaction::new("❤️", "Bob"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stable message identifier within the export.
    pub id: String,

    /// Identifier of the conversation this message belongs to.
    pub conversation_id: String,

    /// Display name of the message author.
    pub sender: String,

    /// When the message was sent.
    ///
    /// Absent for some export formats; a missing timestamp never forces a
    /// thread boundary and is excluded from duration/gap computations.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    /// Text content of the message, if any.
    ///
    /// Media-only messages carry `None` here.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub content: Option<String>,

    /// Media attachments, in export order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub media: Vec<MediaAttachment>,

    /// Reactions, in export order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Message {
    /// Creates a new message with no timestamp, content, media or reactions.
    pub fn new(
        id: impl Into<String>,
        conversation_id: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            conversation_id: conversation_id.into(),
            sender: sender.into(),
            timestamp: None,
            content: None,
            media: Vec::new(),
            reactions: Vec::new(),
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Builder method to set the text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Builder method to add a media attachment.
    #[must_use]
    pub fn with_media(mut self, media: MediaAttachment) -> Self {
        self.media.push(media);
        self
    }

    /// Builder method to add a reaction.
    #[must_use]
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the stable message identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the timestamp, if available.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Returns the text content, or `""` for media-only messages.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Returns the derived kind of this message.
    ///
    /// The first media attachment decides the kind; a message with no
    /// attachments is [`MessageKind::Text`].
    pub fn kind(&self) -> MessageKind {
        self.media
            .first()
            .map_or(MessageKind::Text, |m| MessageKind::from(m.kind))
    }

    /// Returns `true` if this message has any reactions.
    pub fn has_reactions(&self) -> bool {
        !self.reactions.is_empty()
    }

    /// Returns `true` if this message has no text content (or whitespace only).
    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }
}
