//! Story record: one catalog entry.
//!
//! # Responsibility
//! - Carry the canonical identity of one work.
//! - Own the work's attribute map (key -> UTF-16 value).
//!
//! # Invariants
//! - Attribute keys are never empty.
//! - An unset attribute is absent from the map; an empty value is kept.
//! - Stories are only created by `Metabase`, which owns them exclusively.

use crate::model::ifid::Ifid;
use crate::model::utf16::Utf16String;
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoryResult<T> = Result<T, StoryError>;

/// Attribute mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryError {
    /// Attribute keys must contain at least one character.
    EmptyKey,
}

impl Display for StoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "attribute key must not be empty"),
        }
    }
}

impl Error for StoryError {}

/// One work in the metabase: identity plus attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    ifid: Ifid,
    pub(crate) attributes: BTreeMap<String, Utf16String>,
}

impl Story {
    pub(crate) fn new(ifid: Ifid) -> Self {
        Self {
            ifid,
            attributes: BTreeMap::new(),
        }
    }

    /// Canonical identity this story was created with.
    pub fn ifid(&self) -> &Ifid {
        &self.ifid
    }

    /// Borrows the current value of `key`.
    ///
    /// The borrow ends before any mutation of this story can start, so a
    /// returned slice can never observe a later `set_attribute`.
    pub fn attribute(&self, key: &str) -> Option<&[u16]> {
        self.attributes.get(key).map(Utf16String::as_units)
    }

    /// Owned copy of the current value of `key`.
    pub fn attribute_owned(&self, key: &str) -> Option<Utf16String> {
        self.attributes.get(key).cloned()
    }

    /// Current value of `key` decoded to UTF-8 (lossy).
    pub fn attribute_string(&self, key: &str) -> Option<String> {
        self.attributes.get(key).map(Utf16String::to_string_lossy)
    }

    /// Sets (`Some`) or unsets (`None`) an attribute.
    ///
    /// # Errors
    /// - `StoryError::EmptyKey` when `key` is empty.
    pub fn set_attribute(&mut self, key: &str, value: Option<Utf16String>) -> StoryResult<()> {
        if key.is_empty() {
            return Err(StoryError::EmptyKey);
        }

        match value {
            Some(value) => {
                debug!(
                    "event=attribute_set module=story status=ok ifid={} key={} units={}",
                    self.ifid,
                    key,
                    value.len()
                );
                self.attributes.insert(key.to_string(), value);
            }
            None => {
                self.clear_attribute(key);
            }
        }
        Ok(())
    }

    /// UTF-8 convenience over [`Story::set_attribute`].
    pub fn set_attribute_str(&mut self, key: &str, value: &str) -> StoryResult<()> {
        self.set_attribute(key, Some(Utf16String::from(value)))
    }

    /// Removes `key` and returns the value it held.
    pub fn clear_attribute(&mut self, key: &str) -> Option<Utf16String> {
        let removed = self.attributes.remove(key);
        debug!(
            "event=attribute_unset module=story status=ok ifid={} key={} removed={}",
            self.ifid,
            key,
            removed.is_some()
        );
        removed
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}
