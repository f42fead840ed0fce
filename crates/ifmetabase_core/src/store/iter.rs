//! Story and attribute-key enumeration.
//!
//! # Responsibility
//! - Borrowing iterators for read-only passes (`Metabase::stories`,
//!   `Story::keys`).
//! - Detached cursors for passes that mutate the store between steps.
//!
//! # Invariants
//! - Stories are visited in insertion order, attribute keys in key order.
//! - Every form is single-pass: once it reports the end it keeps reporting
//!   the end, even if elements are added afterwards.
//! - A cursor holds a position, never a reference. Mutating the store
//!   between steps may or may not be reflected, but the cursor only ever
//!   moves forward, so every pass terminates.

use crate::model::story::Story;
use crate::model::utf16::Utf16String;
use crate::store::metabase::Metabase;
use std::collections::btree_map;
use std::iter::FusedIterator;
use std::ops::Bound::{Excluded, Unbounded};

/// Borrowing iterator over all stories, in insertion order.
#[derive(Debug, Clone)]
pub struct Stories<'a> {
    inner: btree_map::Values<'a, u64, Story>,
}

impl<'a> Iterator for Stories<'a> {
    type Item = &'a Story;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Stories<'_> {}
impl FusedIterator for Stories<'_> {}

/// Borrowing iterator over the keys currently set on a story.
#[derive(Debug, Clone)]
pub struct AttributeKeys<'a> {
    inner: btree_map::Keys<'a, String, Utf16String>,
}

impl<'a> Iterator for AttributeKeys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for AttributeKeys<'_> {}
impl FusedIterator for AttributeKeys<'_> {}

/// Detached, forward-only position over a metabase's stories.
#[derive(Debug, Clone, Default)]
pub struct StoryCursor {
    last: Option<u64>,
    exhausted: bool,
}

impl StoryCursor {
    /// Cursor positioned before the first story of whichever metabase it is
    /// later stepped against.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to the next story, or `None` once the end was reached.
    pub fn next_story<'m>(&mut self, meta: &'m Metabase) -> Option<&'m Story> {
        let seq = self.advance(meta)?;
        meta.stories.get(&seq)
    }

    /// Same as [`StoryCursor::next_story`] with mutable access to the story.
    pub fn next_story_mut<'m>(&mut self, meta: &'m mut Metabase) -> Option<&'m mut Story> {
        let seq = self.advance(meta)?;
        meta.stories.get_mut(&seq)
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn advance(&mut self, meta: &Metabase) -> Option<u64> {
        if self.exhausted {
            return None;
        }

        let next = match self.last {
            Some(last) => meta.stories.range((Excluded(last), Unbounded)).next(),
            None => meta.stories.iter().next(),
        };
        match next {
            Some((seq, _)) => {
                self.last = Some(*seq);
                Some(*seq)
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

/// Detached, forward-only position over one story's attribute keys.
#[derive(Debug, Clone, Default)]
pub struct ValueCursor {
    last: Option<String>,
    exhausted: bool,
}

impl ValueCursor {
    /// Cursor positioned before the first key of whichever story it is later
    /// stepped against.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to the next set key, or `None` once the end was reached.
    pub fn next_key<'s>(&mut self, story: &'s Story) -> Option<&'s str> {
        if self.exhausted {
            return None;
        }

        let next = match self.last.as_deref() {
            Some(last) => story
                .attributes
                .range::<str, _>((Excluded(last), Unbounded))
                .next(),
            None => story.attributes.iter().next(),
        };
        match next {
            Some((key, _)) => {
                self.last = Some(key.clone());
                Some(key.as_str())
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl Metabase {
    /// Read-only pass over every story in insertion order.
    pub fn stories(&self) -> Stories<'_> {
        Stories {
            inner: self.stories.values(),
        }
    }

    /// Starts a detached pass that tolerates mutation between steps.
    ///
    /// The cursor keeps only a sequence position and is not tied to this
    /// metabase. Stepped against a different one, it walks that store's
    /// sequence numbers from the same position.
    pub fn story_cursor(&self) -> StoryCursor {
        StoryCursor::new()
    }
}

impl<'a> IntoIterator for &'a Metabase {
    type Item = &'a Story;
    type IntoIter = Stories<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.stories()
    }
}

impl Story {
    /// Read-only pass over the keys currently set, in key order.
    pub fn keys(&self) -> AttributeKeys<'_> {
        AttributeKeys {
            inner: self.attributes.keys(),
        }
    }

    /// Starts a detached pass over keys that tolerates mutation between steps.
    ///
    /// The cursor keeps only the last key it returned and is not tied to this
    /// story. Stepped against another story, it continues in that story's key
    /// order after the same key.
    pub fn key_cursor(&self) -> ValueCursor {
        ValueCursor::new()
    }
}
