use ifmetabase_core::{Ifid, IfidError};
use std::cmp::Ordering;

fn sample_ids() -> Vec<Ifid> {
    let a = Ifid::from_uuid_bytes([0x11; 16]);
    let b = Ifid::from_zcode(88, "840726", 0).unwrap();
    let c = Ifid::parse("ZCODE-2-AB12CD-FFFF").unwrap();
    let ab = Ifid::merge([&a, &b]).unwrap();
    vec![a, b, c, ab]
}

#[test]
fn compare_is_reflexive() {
    for id in sample_ids() {
        assert_eq!(id.compare(&id), Ordering::Equal, "{id}");
        assert_eq!(id.compare(&id.clone()), Ordering::Equal, "{id}");
    }
}

#[test]
fn uuid_equality_is_bytewise() {
    let mut other = [0x11; 16];
    assert_eq!(
        Ifid::from_uuid_bytes([0x11; 16]).compare(&Ifid::from_uuid_bytes(other)),
        Ordering::Equal
    );
    other[15] = 0x12;
    assert_ne!(
        Ifid::from_uuid_bytes([0x11; 16]).compare(&Ifid::from_uuid_bytes(other)),
        Ordering::Equal
    );
}

#[test]
fn merge_flattening_is_idempotent() {
    let a = Ifid::from_uuid_bytes([1; 16]);
    let b = Ifid::from_zcode(1, "000001", 2).unwrap();
    let c = Ifid::from_zcode(3, "000003", 4).unwrap();

    let nested = Ifid::merge([&Ifid::merge([&a, &b]).unwrap(), &c]).unwrap();
    let flat = Ifid::merge([&a, &b, &c]).unwrap();

    assert_eq!(nested.compare(&flat), Ordering::Equal);
    assert_eq!(nested, flat);
    assert_eq!(nested.leaf_count(), 3);
    assert!(nested.leaves().all(|leaf| flat.leaves().any(|other| other == leaf)));
}

#[test]
fn merge_is_equivalent_to_members_only() {
    let a = Ifid::from_uuid_bytes([1; 16]);
    let b = Ifid::from_uuid_bytes([2; 16]);
    let c = Ifid::from_uuid_bytes([3; 16]);
    let ab = Ifid::merge([&a, &b]).unwrap();

    assert_eq!(ab.compare(&a), Ordering::Equal);
    assert_eq!(ab.compare(&b), Ordering::Equal);
    assert_ne!(ab.compare(&c), Ordering::Equal);
    assert_eq!(ab.compare(&c), c.compare(&ab).reverse());
}

#[test]
fn merge_of_single_leaf_never_yields_compound() {
    let a = Ifid::from_zcode(88, "840726", 0).unwrap();
    let merged = Ifid::merge([&a]).unwrap();
    assert!(!merged.is_compound());
    assert_eq!(merged, a);
}

#[test]
fn copy_is_independent() {
    let original = Ifid::merge([
        &Ifid::from_uuid_bytes([5; 16]),
        &Ifid::from_uuid_bytes([6; 16]),
    ])
    .unwrap();
    let copy = original.clone();
    drop(original);
    assert_eq!(copy.leaf_count(), 2);
}

#[test]
fn canonical_strings_round_trip() {
    for id in sample_ids() {
        let text = id.to_string();
        let parsed: Ifid = text.parse().unwrap();
        assert_eq!(parsed, id, "round trip of `{text}`");
    }
}

#[test]
fn invalid_constructions_produce_no_value() {
    assert!(matches!(
        Ifid::parse("ZCODE-88-8407-0000"),
        Err(IfidError::InvalidFormat(_))
    ));
    assert!(matches!(
        Ifid::from_zcode(88, "84072", 0),
        Err(IfidError::InvalidSerial(_))
    ));
    assert!(matches!(
        Ifid::from_uuid_slice(&[0u8; 17]),
        Err(IfidError::InvalidUuidLength(17))
    ));
}

#[test]
fn generated_ids_are_distinct() {
    let first = Ifid::generate();
    let second = Ifid::generate();
    assert_ne!(first.compare(&second), Ordering::Equal);
}
