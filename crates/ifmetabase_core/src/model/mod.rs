//! Identity and record model for the metabase.
//!
//! # Responsibility
//! - Define story identities (IFIDs) and their equivalence rule.
//! - Define the story record and its UTF-16 attribute values.
//!
//! # Invariants
//! - Compound identities are flat sets of two or more leaves.
//! - Identity values are plain owned data; copying is `Clone`.

pub mod ifid;
pub mod story;
pub mod utf16;
