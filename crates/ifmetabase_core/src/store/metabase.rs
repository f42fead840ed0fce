//! In-memory story store.
//!
//! # Responsibility
//! - Own every `Story` and resolve identities to them (lookup-or-create).
//! - Remove stories and answer containment by identity.
//!
//! # Invariants
//! - No two stored stories have equivalent identities, so every leaf id maps
//!   to at most one story in `leaf_index`.
//! - Sequence numbers are assigned in insertion order and never reused.
//! - When an identity overlaps several stories (possible through compounds),
//!   the earliest-inserted one is chosen. Stories are never merged or split.

use crate::model::ifid::{Ifid, LeafId};
use crate::model::story::Story;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Store of stories keyed by identity equivalence class.
#[derive(Debug, Default)]
pub struct Metabase {
    pub(crate) stories: BTreeMap<u64, Story>,
    leaf_index: HashMap<LeafId, u64>,
    next_seq: u64,
}

impl Metabase {
    /// Creates an empty metabase.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Returns the story equivalent to `ifid`, creating it when absent.
    ///
    /// A new story stores its own copy of `ifid`; the caller keeps theirs.
    pub fn resolve_story(&mut self, ifid: &Ifid) -> &mut Story {
        let seq = match self.find_seq(ifid) {
            Some(seq) => seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                for leaf in ifid.leaves() {
                    self.leaf_index.insert(leaf.clone(), seq);
                }
                debug!(
                    "event=story_created module=metabase status=ok ifid={} stories={}",
                    ifid,
                    self.stories.len() + 1
                );
                seq
            }
        };

        self.stories
            .entry(seq)
            .or_insert_with(|| Story::new(ifid.clone()))
    }

    /// Looks up the story equivalent to `ifid` without creating one.
    pub fn story(&self, ifid: &Ifid) -> Option<&Story> {
        let seq = self.find_seq(ifid)?;
        self.stories.get(&seq)
    }

    pub fn story_mut(&mut self, ifid: &Ifid) -> Option<&mut Story> {
        let seq = self.find_seq(ifid)?;
        self.stories.get_mut(&seq)
    }

    /// True iff `resolve_story` would find rather than create.
    pub fn contains_story(&self, ifid: &Ifid) -> bool {
        self.find_seq(ifid).is_some()
    }

    /// Removes the story `resolve_story` would find and hands it back.
    ///
    /// Returns `None` when nothing matches; that is not an error.
    pub fn remove_story(&mut self, ifid: &Ifid) -> Option<Story> {
        let Some(seq) = self.find_seq(ifid) else {
            debug!(
                "event=story_removed module=metabase status=not_found ifid={}",
                ifid
            );
            return None;
        };

        let story = self.stories.remove(&seq)?;
        for leaf in story.ifid().leaves() {
            self.leaf_index.remove(leaf);
        }
        debug!(
            "event=story_removed module=metabase status=ok ifid={} stories={}",
            story.ifid(),
            self.stories.len()
        );
        Some(story)
    }

    /// Drops every story.
    pub fn clear(&mut self) {
        let dropped = self.stories.len();
        self.stories.clear();
        self.leaf_index.clear();
        debug!(
            "event=metabase_cleared module=metabase status=ok dropped={}",
            dropped
        );
    }

    fn find_seq(&self, ifid: &Ifid) -> Option<u64> {
        ifid.leaves()
            .filter_map(|leaf| self.leaf_index.get(leaf).copied())
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::Metabase;
    use crate::model::ifid::Ifid;

    fn uuid(byte: u8) -> Ifid {
        Ifid::from_uuid_bytes([byte; 16])
    }

    #[test]
    fn resolve_is_lookup_or_create() {
        let mut meta = Metabase::new();
        let id = uuid(1);
        meta.resolve_story(&id)
            .set_attribute_str("title", "Trinity")
            .expect("set title");
        let again = meta.resolve_story(&id);
        assert_eq!(again.attribute_string("title").as_deref(), Some("Trinity"));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn compound_resolves_to_story_of_any_member() {
        let mut meta = Metabase::new();
        let a = uuid(1);
        let b = uuid(2);
        let ab = Ifid::merge([&a, &b]).expect("merge");
        meta.resolve_story(&ab);

        assert!(meta.contains_story(&a));
        assert!(meta.contains_story(&b));
        assert_eq!(meta.story(&b).map(|s| s.ifid()), Some(&ab));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn partial_overlap_picks_earliest_story_and_never_merges() {
        let mut meta = Metabase::new();
        let a = uuid(1);
        let b = uuid(2);
        let c = uuid(3);
        meta.resolve_story(&b);
        meta.resolve_story(&a);

        let abc = Ifid::merge([&a, &b, &c]).expect("merge");
        let found = meta.resolve_story(&abc).ifid().clone();
        assert_eq!(found, b);
        assert_eq!(meta.len(), 2);
        assert!(!meta.contains_story(&c));
    }

    #[test]
    fn remove_frees_all_leaves_of_the_story() {
        let mut meta = Metabase::new();
        let a = uuid(1);
        let b = uuid(2);
        meta.resolve_story(&Ifid::merge([&a, &b]).expect("merge"));

        let removed = meta.remove_story(&a).expect("story removed");
        assert_eq!(removed.ifid().leaf_count(), 2);
        assert!(!meta.contains_story(&b));
        assert!(meta.is_empty());
        assert!(meta.remove_story(&a).is_none());
    }

    #[test]
    fn story_mut_does_not_create() {
        let mut meta = Metabase::new();
        assert!(meta.story_mut(&uuid(9)).is_none());
        assert!(meta.is_empty());
    }

    #[test]
    fn clear_empties_store_and_index() {
        let mut meta = Metabase::new();
        meta.resolve_story(&uuid(1));
        meta.resolve_story(&uuid(2));
        meta.clear();
        assert!(meta.is_empty());
        assert!(!meta.contains_story(&uuid(1)));
    }
}
