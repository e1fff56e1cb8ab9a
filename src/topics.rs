//! Topic extraction from single messages.
//!
//! This module provides [`extract_topics`], the leaf helper behind the
//! topic-based segmentation pass and thread topic inference. It also hosts
//! the process-wide constant tables: the mixed-language stop-word list and
//! the emoji ranges used by per-conversation metrics.
//!
//! # Extraction Rules
//!
//! | Source | Rule |
//! |--------|------|
//! | Hashtags | `#word` tokens, lowercased, kept verbatim |
//! | Mentions | `@word` tokens, lowercased, kept verbatim |
//! | Words | length ≥ 4, not a stop word, first 5 survivors |
//! | Kind tag | `type_<kind>` is always added |
//!
//! The kind tag guarantees every message contributes at least one topic even
//! with empty content, so Jaccard comparisons are never between two empty
//! sets for adjacent messages.
//!
//! # Example
//!
//! ```
//! use chatlens::Message;
//! use chatlens::topics::extract_topics;
//!
//! let msg = Message::new("m1", "c1", "Alice")
//!     .with_content("planning the weekend hike #outdoors with @bob");
//! let topics = extract_topics(&msg);
//!
//! assert!(topics.contains("#outdoors"));
//! assert!(topics.contains("@bob"));
//! assert!(topics.contains("weekend"));
//! assert!(topics.contains("type_text"));
//! ```

use std::collections::BTreeSet;

use crate::Message;

/// Common words excluded from topic extraction.
///
/// Mixed-language (English, Spanish, German, Russian) since chat exports
/// routinely mix languages. Deliberately small: topic extraction only needs
/// to drop the highest-frequency filler words, not be a real NLP stop list.
pub const STOP_WORDS: &[&str] = &[
    // English
    "that", "this", "with", "have", "will", "your", "from", "they", "been",
    "were", "said", "each", "which", "their", "would", "there", "about",
    "could", "other", "just", "like", "what", "when", "where", "then",
    "them", "some", "into", "than", "only", "over", "also", "really",
    // Spanish
    "para", "pero", "como", "este", "esta", "todo", "bien", "más", "porque",
    "cuando", "hacer", "tiene", "puede", "ahora",
    // German
    "aber", "auch", "dann", "doch", "eine", "einen", "haben", "ich", "nicht",
    "noch", "schon", "sein", "sind", "und", "wenn", "wir",
    // Russian
    "что", "это", "как", "так", "вот", "быть", "его", "только", "уже",
];

/// Maximum number of plain content words contributed per message.
const MAX_CONTENT_WORDS: usize = 5;

/// Minimum length for a plain word to count as a topic.
const MIN_WORD_LEN: usize = 4;

/// Extracts the topic set of a single message.
///
/// Pure function of the message; no side effects. Returns a [`BTreeSet`] so
/// iteration order is deterministic everywhere topics become observable
/// (thread labels, inferred topics).
///
/// See the module docs for the extraction rules.
pub fn extract_topics(message: &Message) -> BTreeSet<String> {
    let mut topics = BTreeSet::new();

    let mut content_words = 0usize;
    for raw in message.text().split_whitespace() {
        let token = raw.to_lowercase();

        if let Some(tag) = parse_tagged(&token, '#') {
            topics.insert(format!("#{tag}"));
            continue;
        }
        if let Some(tag) = parse_tagged(&token, '@') {
            topics.insert(format!("@{tag}"));
            continue;
        }

        if content_words >= MAX_CONTENT_WORDS {
            continue;
        }
        let word: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
        if word.chars().count() >= MIN_WORD_LEN && !STOP_WORDS.contains(&word.as_str()) {
            if topics.insert(word) {
                content_words += 1;
            }
        }
    }

    // Every message contributes at least its kind tag.
    topics.insert(format!("type_{}", message.kind().as_str()));

    topics
}

/// Strips a leading sigil (`#` or `@`) and returns the tag word, if the
/// remainder is a plausible tag (non-empty, alphanumeric/underscore).
fn parse_tagged(token: &str, sigil: char) -> Option<String> {
    let rest = token.strip_prefix(sigil)?;
    let tag: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if tag.is_empty() { None } else { Some(tag) }
}

/// Returns `true` if the character is an emoji.
///
/// Covers the main emoji blocks; enough for reaction/content tallies, not a
/// full Unicode emoji-data implementation.
pub fn is_emoji(c: char) -> bool {
    matches!(u32::from(c),
        0x1F300..=0x1F5FF   // symbols & pictographs
        | 0x1F600..=0x1F64F // emoticons
        | 0x1F680..=0x1F6FF // transport & map
        | 0x1F900..=0x1F9FF // supplemental symbols
        | 0x1FA70..=0x1FAFF // extended-A
        | 0x2600..=0x26FF   // miscellaneous symbols
        | 0x2700..=0x27BF   // dingbats
        | 0x2764            // heavy black heart
    )
}

/// Counts emoji characters in a string.
pub fn count_emoji(text: &str) -> usize {
    text.chars().filter(|c| is_emoji(*c)).count()
}
