//! Tier 3: properties of name resolution and opening

use std::sync::Arc;

use gdbkit::{split_attribute_name, DatabaseManager};
use proptest::prelude::*;

use crate::test_utils::*;

#[test]
fn repeated_open_opens_once() {
    let t = TestHub::new();
    let manager = DatabaseManager::new(
        DatabaseDescriptor::new("once", "ONCE", t.file("once.dex")),
        Arc::new(FileEngine::new()),
    );
    for _ in 0..25 {
        manager.open().unwrap();
    }
    assert_eq!(manager.open_count(), 1);
    manager.close().unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A composite name with exactly one split resolves like the two-part form.
    #[test]
    fn composite_matches_two_part_lookup(
        ty in prop::sample::select(vec!["NodeType", "EdgeType", "Missing", ""]),
        attr in prop::sample::select(vec!["Attribute", "Missing", ""]),
    ) {
        let t = TestHub::new();
        t.hub.activate(t.single("Prop")).unwrap();
        create_schema(&t.hub);

        let composite = format!("{}#{}", ty, attr);
        let split = t.hub.attribute_id_split(&composite, '#').unwrap();
        let direct = t.hub.attribute_id(ty, attr).unwrap();
        prop_assert_eq!(split, direct);
        prop_assert_eq!(split.is_valid(), !ty.is_empty() && ty != "Missing" && attr == "Attribute");

        t.hub.shutdown().unwrap();
    }

    /// Zero or several split characters never resolve.
    #[test]
    fn wrong_split_count_fails(parts in prop::collection::vec("[a-z]{0,4}", 1..5)) {
        prop_assume!(parts.len() != 2);
        let composite = parts.join("/");
        prop_assert!(matches!(
            split_attribute_name(&composite, '/'),
            Err(Error::NameResolution { .. })
        ), "expected NameResolution error for {:?}", composite);
    }
}
