//! Story identifiers (IFIDs).
//!
//! # Responsibility
//! - Model the UUID, Z-code legacy and compound identity schemes as one value.
//! - Parse and print the canonical textual forms.
//! - Decide identity equivalence between two IFIDs.
//!
//! # Invariants
//! - A compound always holds at least two leaves and never nests another
//!   compound; merging down to one leaf yields that leaf.
//! - Two IFIDs are equivalent iff their leaf sets intersect. Equivalence is
//!   reflexive and symmetric but not transitive, so `Ifid` does not implement
//!   `PartialEq` as equivalence. The derived `PartialEq` is structural.
//! - `Display` output parses back to a structurally equal value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{btree_set, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:UUID://(?P<wrapped>[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})//|(?P<bare>[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}))$",
    )
    .expect("valid uuid ifid regex")
});
static ZCODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:ZCODE)-(?P<release>[0-9]{1,5})-(?P<serial>[0-9A-Za-z]{6})-(?P<checksum>[0-9A-Fa-f]{4})$")
        .expect("valid zcode ifid regex")
});

/// Number of characters in a Z-code serial.
pub const ZCODE_SERIAL_LEN: usize = 6;
/// Number of raw bytes in a UUID identifier.
pub const UUID_LEN: usize = 16;

pub type IfidResult<T> = Result<T, IfidError>;

/// Errors produced while constructing an IFID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IfidError {
    /// Textual input matches none of the accepted forms.
    InvalidFormat(String),
    /// Z-code serial is not exactly six ASCII alphanumerics.
    InvalidSerial(String),
    /// UUID byte input has the wrong length.
    InvalidUuidLength(usize),
    /// A merge was asked to combine zero identifiers.
    EmptyCompound,
}

impl Display for IfidError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(value) => write!(f, "invalid ifid format: `{value}`"),
            Self::InvalidSerial(value) => write!(
                f,
                "z-code serial must be {ZCODE_SERIAL_LEN} ascii alphanumerics, got `{value}`"
            ),
            Self::InvalidUuidLength(len) => {
                write!(f, "uuid ifid requires {UUID_LEN} bytes, got {len}")
            }
            Self::EmptyCompound => write!(f, "cannot merge an empty set of ifids"),
        }
    }
}

impl Error for IfidError {}

/// Legacy Z-code identity: release number, serial code and header checksum.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZCodeId {
    release: u16,
    serial: String,
    checksum: u16,
}

impl ZCodeId {
    /// Validates the serial and builds the identity.
    pub fn new(release: u16, serial: &str, checksum: u16) -> IfidResult<Self> {
        if serial.len() != ZCODE_SERIAL_LEN || !serial.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(IfidError::InvalidSerial(serial.to_string()));
        }
        Ok(Self {
            release,
            serial: serial.to_string(),
            checksum,
        })
    }

    pub fn release(&self) -> u16 {
        self.release
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }
}

impl Display for ZCodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ZCODE-{}-{}-{:04X}",
            self.release, self.serial, self.checksum
        )
    }
}

/// A single, non-compound identity.
///
/// The derived ordering (UUIDs first, then Z-codes by release, serial and
/// checksum) is an implementation detail used for deterministic sorting only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LeafId {
    Uuid(Uuid),
    ZCode(ZCodeId),
}

impl LeafId {
    fn parse(value: &str) -> IfidResult<Self> {
        if let Some(caps) = UUID_RE.captures(value) {
            let hex = caps
                .name("wrapped")
                .or_else(|| caps.name("bare"))
                .map(|m| m.as_str())
                .ok_or_else(|| IfidError::InvalidFormat(value.to_string()))?;
            let uuid =
                Uuid::parse_str(hex).map_err(|_| IfidError::InvalidFormat(value.to_string()))?;
            return Ok(Self::Uuid(uuid));
        }

        if let Some(caps) = ZCODE_RE.captures(value) {
            let invalid = || IfidError::InvalidFormat(value.to_string());
            let release = caps["release"].parse::<u16>().map_err(|_| invalid())?;
            let checksum = u16::from_str_radix(&caps["checksum"], 16).map_err(|_| invalid())?;
            return Ok(Self::ZCode(ZCodeId::new(
                release,
                &caps["serial"],
                checksum,
            )?));
        }

        Err(IfidError::InvalidFormat(value.to_string()))
    }
}

impl Display for LeafId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uuid(uuid) => write!(f, "UUID://{uuid:X}//"),
            Self::ZCode(zcode) => write!(f, "{zcode}"),
        }
    }
}

impl From<Uuid> for LeafId {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<ZCodeId> for LeafId {
    fn from(value: ZCodeId) -> Self {
        Self::ZCode(value)
    }
}

/// Flat set of two or more leaves asserting they name the same work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundId {
    leaves: BTreeSet<LeafId>,
}

impl CompoundId {
    pub fn leaves(&self) -> btree_set::Iter<'_, LeafId> {
        self.leaves.iter()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn contains(&self, leaf: &LeafId) -> bool {
        self.leaves.contains(leaf)
    }

    fn intersects(&self, other: &CompoundId) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (&self.leaves, &other.leaves)
        } else {
            (&other.leaves, &self.leaves)
        };
        small.iter().any(|leaf| large.contains(leaf))
    }
}

/// Story identity value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ifid {
    Leaf(LeafId),
    Compound(CompoundId),
}

impl Ifid {
    /// Parses a canonical IFID string.
    ///
    /// Accepts `UUID://…//`, a bare hyphenated UUID, `ZCODE-r-serial-CCCC`,
    /// or a comma-separated list of those, which is merged.
    pub fn parse(value: &str) -> IfidResult<Self> {
        if !value.contains(',') {
            return LeafId::parse(value.trim()).map(Self::Leaf);
        }

        let mut leaves = BTreeSet::new();
        for item in value.split(',') {
            let item = item.trim();
            if item.is_empty() {
                return Err(IfidError::InvalidFormat(value.to_string()));
            }
            leaves.insert(LeafId::parse(item)?);
        }
        Self::from_leaves(leaves)
    }

    /// Wraps 16 raw bytes as a UUID identity.
    pub fn from_uuid_bytes(bytes: [u8; UUID_LEN]) -> Self {
        Self::Leaf(LeafId::Uuid(Uuid::from_bytes(bytes)))
    }

    /// Same as [`Ifid::from_uuid_bytes`] for unchecked slices.
    pub fn from_uuid_slice(bytes: &[u8]) -> IfidResult<Self> {
        let bytes: [u8; UUID_LEN] = bytes
            .try_into()
            .map_err(|_| IfidError::InvalidUuidLength(bytes.len()))?;
        Ok(Self::from_uuid_bytes(bytes))
    }

    /// Creates a fresh random UUID identity for a new work.
    pub fn generate() -> Self {
        Self::Leaf(LeafId::Uuid(Uuid::new_v4()))
    }

    pub fn from_zcode(release: u16, serial: &str, checksum: u16) -> IfidResult<Self> {
        Ok(Self::Leaf(LeafId::ZCode(ZCodeId::new(
            release, serial, checksum,
        )?)))
    }

    /// Builds an identity from a leaf set, collapsing a single leaf.
    pub fn from_leaves(leaves: impl IntoIterator<Item = LeafId>) -> IfidResult<Self> {
        let mut leaves: BTreeSet<LeafId> = leaves.into_iter().collect();
        match leaves.len() {
            0 => Err(IfidError::EmptyCompound),
            1 => leaves
                .pop_first()
                .map(Self::Leaf)
                .ok_or(IfidError::EmptyCompound),
            _ => Ok(Self::Compound(CompoundId { leaves })),
        }
    }

    /// Unions the leaves of every input into one identity.
    ///
    /// Nested compounds are flattened and duplicates dropped. A union of one
    /// leaf comes back as that leaf, never as a singleton compound.
    pub fn merge<'a, I>(ids: I) -> IfidResult<Self>
    where
        I: IntoIterator<Item = &'a Ifid>,
    {
        Self::from_leaves(ids.into_iter().flat_map(|id| id.leaves().cloned()))
    }

    /// Returns true when the two identities share at least one leaf.
    pub fn is_equivalent(&self, other: &Ifid) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => a == b,
            (Self::Leaf(leaf), Self::Compound(compound))
            | (Self::Compound(compound), Self::Leaf(leaf)) => compound.contains(leaf),
            (Self::Compound(a), Self::Compound(b)) => a.intersects(b),
        }
    }

    /// `Equal` iff equivalent; otherwise ordered by smallest leaf.
    ///
    /// The non-equal order is implementation-defined and only meant for
    /// deterministic sorting. It is not consistent with a total order across
    /// overlapping compounds because equivalence itself is not transitive.
    pub fn compare(&self, other: &Ifid) -> Ordering {
        if self.is_equivalent(other) {
            return Ordering::Equal;
        }
        self.leaves().next().cmp(&other.leaves().next())
    }

    /// Leaves in ascending leaf order.
    pub fn leaves(&self) -> Leaves<'_> {
        match self {
            Self::Leaf(leaf) => Leaves::One(Some(leaf)),
            Self::Compound(compound) => Leaves::Many(compound.leaves()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Compound(compound) => compound.len(),
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Self::Compound(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafId> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Compound(_) => None,
        }
    }
}

/// Iterator over the leaves of an [`Ifid`].
#[derive(Debug, Clone)]
pub enum Leaves<'a> {
    One(Option<&'a LeafId>),
    Many(btree_set::Iter<'a, LeafId>),
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a LeafId;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::One(leaf) => leaf.take(),
            Self::Many(iter) => iter.next(),
        }
    }
}

impl Display for Ifid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, leaf) in self.leaves().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{leaf}")?;
        }
        Ok(())
    }
}

impl FromStr for Ifid {
    type Err = IfidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<LeafId> for Ifid {
    fn from(value: LeafId) -> Self {
        Self::Leaf(value)
    }
}

impl From<Uuid> for Ifid {
    fn from(value: Uuid) -> Self {
        Self::Leaf(LeafId::Uuid(value))
    }
}

impl Serialize for Ifid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ifid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
