//! The seam to the external export parser.
//!
//! Export-file discovery, format classification and field-level parsing live
//! outside this crate. What it needs from them is captured by
//! [`ConversationSource`]: anything that can hand over normalized
//! [`Conversation`] records.
//!
//! Two implementations ship with the crate:
//! - [`VecSource`] — conversations built in memory (tests, embedding callers)
//! - [`JsonSource`] — a file of already-normalized conversation records in
//!   this crate's own serde format (not a platform export format)
//!
//! # Example
//!
//! ```
//! use chatlens::source::{ConversationSource, VecSource};
//! use chatlens::Conversation;
//!
//! let mut source = VecSource::new(vec![Conversation::new("c1", "test")]);
//! let conversations = source.load().unwrap();
//! assert_eq!(conversations.len(), 1);
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::conversation::Conversation;
use crate::error::{ChatlensError, Result};

/// Anything that can produce normalized conversations.
///
/// `load` drains the source: implementations may return the records only
/// once. A source that cannot produce anything at all returns
/// [`ChatlensError::Source`]; a source that can skip individual malformed
/// conversations should do so rather than fail the whole load.
pub trait ConversationSource {
    /// Produces the normalized conversations.
    fn load(&mut self) -> Result<Vec<Conversation>>;
}

/// A source over pre-built in-memory conversations.
///
/// `load` hands the conversations over once; subsequent calls return an
/// empty list.
#[derive(Debug, Default)]
pub struct VecSource {
    conversations: Vec<Conversation>,
}

impl VecSource {
    /// Wraps pre-built conversations.
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self { conversations }
    }
}

impl ConversationSource for VecSource {
    fn load(&mut self) -> Result<Vec<Conversation>> {
        Ok(std::mem::take(&mut self.conversations))
    }
}

/// A source reading normalized conversation records from a JSON file.
///
/// The file holds a JSON array of [`Conversation`] records in this crate's
/// serde format — the output of an external parser, not a raw platform
/// export.
#[derive(Debug)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    /// Creates a source over the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationSource for JsonSource {
    fn load(&mut self) -> Result<Vec<Conversation>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|err| {
            ChatlensError::source_at(
                format!("not a normalized conversation array: {err}"),
                self.path.clone(),
            )
        })
    }
}
