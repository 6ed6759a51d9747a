//! Tests for shared identifier and collection types.

use topograph_core::types::{FunctionId, FxHashMap, FxHashSet, TestId};

#[test]
fn test_ids_lookup_by_str() {
    let mut map: FxHashMap<FunctionId, u32> = FxHashMap::default();
    map.insert(FunctionId::from("src/a.ts:foo"), 1);
    assert_eq!(map.get("src/a.ts:foo"), Some(&1));
    assert_eq!(map.get("src/a.ts:bar"), None);

    let mut set: FxHashSet<TestId> = FxHashSet::default();
    set.insert(TestId::new("a.test.ts:works:3"));
    assert!(set.contains("a.test.ts:works:3"));
}

#[test]
fn test_ids_serialize_transparently() {
    let id = FunctionId::from("f1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"f1\"");
    let back: TestId = serde_json::from_str("\"t1\"").unwrap();
    assert_eq!(back.as_str(), "t1");
    assert_eq!(back.to_string(), "t1");
}

#[test]
fn test_ids_order_lexicographically() {
    let mut ids = vec![FunctionId::from("b"), FunctionId::from("a"), FunctionId::from("c")];
    ids.sort();
    assert_eq!(ids, vec![FunctionId::from("a"), FunctionId::from("b"), FunctionId::from("c")]);
}
