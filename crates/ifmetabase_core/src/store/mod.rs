//! Story storage and enumeration.
//!
//! # Responsibility
//! - Own stories and resolve identities to them.
//! - Enumerate stories and attribute keys in a stable, single-pass order.
//!
//! # Invariants
//! - At most one story per identity equivalence class.

pub mod iter;
pub mod metabase;
