//! UTF-16 attribute values and the two code-unit primitives.
//!
//! # Responsibility
//! - Own attribute values as raw UTF-16 code units.
//! - Provide the compare/copy primitives catalog collaborators rely on.
//!
//! # Invariants
//! - Code units are kept verbatim, including NUL units and unpaired
//!   surrogates. Every constructor and serde agree on this.
//! - Only `from_terminated_units`, `str_cmp` and `str_cpy` treat NUL as an
//!   end marker; they model terminated buffers.
//! - Ordering is lexicographic over code units, not over Unicode scalars.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Owned UTF-16 string value stored in story attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Utf16String {
    units: Vec<u16>,
}

impl Utf16String {
    /// Creates an empty value. Distinct from an unset attribute.
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    /// Wraps code units verbatim.
    pub fn from_units(units: impl Into<Vec<u16>>) -> Self {
        Self {
            units: units.into(),
        }
    }

    /// Copies a terminated buffer: everything from the first NUL unit on is
    /// left out.
    pub fn from_terminated_units(units: &[u16]) -> Self {
        Self::from_units(terminated(units))
    }

    /// Encodes a UTF-8 string as UTF-16.
    pub fn from_str_lossless(value: &str) -> Self {
        Self::from_units(value.encode_utf16().collect::<Vec<u16>>())
    }

    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    pub fn into_units(self) -> Vec<u16> {
        self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Decodes to UTF-8, replacing unpaired surrogates with U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    /// Decodes to UTF-8, or `None` when the value holds unpaired surrogates.
    pub fn to_string_checked(&self) -> Option<String> {
        String::from_utf16(&self.units).ok()
    }
}

impl From<&str> for Utf16String {
    fn from(value: &str) -> Self {
        Self::from_str_lossless(value)
    }
}

impl From<String> for Utf16String {
    fn from(value: String) -> Self {
        Self::from_str_lossless(value.as_str())
    }
}

impl From<Vec<u16>> for Utf16String {
    fn from(value: Vec<u16>) -> Self {
        Self::from_units(value)
    }
}

impl AsRef<[u16]> for Utf16String {
    fn as_ref(&self) -> &[u16] {
        &self.units
    }
}

impl Display for Utf16String {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for decoded in char::decode_utf16(self.units.iter().copied()) {
            write!(f, "{}", decoded.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

/// Compares two UTF-16 buffers unit by unit.
///
/// Each side ends at its first NUL unit or at the end of the slice, whichever
/// comes first, so terminated and unterminated buffers compare alike.
pub fn str_cmp(a: &[u16], b: &[u16]) -> Ordering {
    terminated(a).cmp(terminated(b))
}

/// Replaces the contents of `dst` with `src` up to its first NUL unit.
///
/// The destination grows as needed.
pub fn str_cpy(dst: &mut Vec<u16>, src: &[u16]) {
    dst.clear();
    dst.extend_from_slice(terminated(src));
}

fn terminated(units: &[u16]) -> &[u16] {
    match units.iter().position(|unit| *unit == 0) {
        Some(end) => &units[..end],
        None => units,
    }
}

#[cfg(test)]
mod tests {
    use super::{str_cmp, str_cpy, Utf16String};
    use std::cmp::Ordering;

    #[test]
    fn from_units_keeps_nul_units() {
        let value = Utf16String::from_units(vec![0x54, 0x72, 0, 0x78]);
        assert_eq!(value.as_units(), &[0x54, 0x72, 0, 0x78]);
        assert_eq!(Utf16String::from("a\0b").as_units(), &[0x61, 0, 0x62]);
    }

    #[test]
    fn from_terminated_units_stops_at_nul() {
        let value = Utf16String::from_terminated_units(&[0x54, 0x72, 0, 0x78]);
        assert_eq!(value.as_units(), &[0x54, 0x72]);
    }

    #[test]
    fn serde_keeps_units_verbatim() {
        let value = Utf16String::from_units(vec![0x41, 0, 0xD800, 0x42]);
        let json = serde_json::to_string(&value).expect("serialize");
        assert_eq!(json, "[65,0,55296,66]");
        let decoded: Utf16String = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, value);
        assert_eq!(
            serde_json::from_str::<Utf16String>("[65,0,66]").expect("deserialize"),
            Utf16String::from_units(vec![65, 0, 66])
        );
    }

    #[test]
    fn empty_value_is_not_absent() {
        let value = Utf16String::from("");
        assert!(value.is_empty());
        assert_eq!(value, Utf16String::new());
    }

    #[test]
    fn str_cmp_stops_at_terminator() {
        let a = [0x41, 0x42, 0, 0x43];
        let b = [0x41, 0x42];
        assert_eq!(str_cmp(&a, &b), Ordering::Equal);
        assert_eq!(str_cmp(&[0x41], &[0x42]), Ordering::Less);
        assert_eq!(str_cmp(&[0x41, 0x41], &[0x41]), Ordering::Greater);
    }

    #[test]
    fn str_cpy_replaces_destination() {
        let mut dst = vec![1, 2, 3, 4, 5];
        str_cpy(&mut dst, &[0x5A, 0x6F, 0, 0x6B]);
        assert_eq!(dst, vec![0x5A, 0x6F]);
    }

    #[test]
    fn lossy_decoding_replaces_unpaired_surrogates() {
        let value = Utf16String::from_units(vec![0x48, 0xD800]);
        assert_eq!(value.to_string_checked(), None);
        assert_eq!(value.to_string_lossy(), "H\u{FFFD}");
        assert_eq!(value.to_string(), "H\u{FFFD}");
    }

    #[test]
    fn non_bmp_text_round_trips() {
        let value = Utf16String::from("Zork \u{1F5E1}");
        assert_eq!(value.len(), 7);
        assert_eq!(value.to_string_checked().as_deref(), Some("Zork \u{1F5E1}"));
    }
}
