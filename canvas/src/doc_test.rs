#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn px(id: &str, order: f64, height: f64) -> Section {
    Section::new(id, order, SectionHeight::px(height))
}

fn element(id: &str, section_id: &str, x: f64, y: f64) -> Element {
    Element { id: id.into(), section_id: section_id.into(), x, y }
}

fn display_ids(store: &DocStore) -> Vec<&str> {
    store.sorted_sections().iter().map(|s| s.id.as_str()).collect()
}

fn three_section_store() -> DocStore {
    let mut store = DocStore::new();
    store.insert_section(px("s1", 0.0, 300.0)).unwrap();
    store.insert_section(px("s2", 1.0, 400.0)).unwrap();
    store.insert_section(px("s3", 2.0, 200.0)).unwrap();
    store
}

// =============================================================
// Section serde
// =============================================================

#[test]
fn section_deserializes_without_unit_as_px() {
    let section: Section = serde_json::from_value(json!({ "id": "s1", "order": 0, "height": 300 })).unwrap();
    assert_eq!(section.unit, HeightUnit::Px);
    assert_eq!(section.height, 300.0);
}

#[test]
fn section_deserializes_vh_unit() {
    let section: Section = serde_json::from_value(json!({ "id": "hero", "order": 1.5, "height": 100, "unit": "vh" })).unwrap();
    assert_eq!(section.unit, HeightUnit::Vh);
    assert_eq!(section.order, 1.5);
    assert_eq!(section.height_px(720.0), 720.0);
}

#[test]
fn partial_element_skips_absent_fields() {
    let partial = PartialElement { y: Some(12.0), ..Default::default() };
    assert_eq!(serde_json::to_value(&partial).unwrap(), json!({ "y": 12.0 }));
}

// =============================================================
// sort_by_order / validate_sections
// =============================================================

#[test]
fn sort_by_order_does_not_require_presorted_input() {
    let sections = vec![px("c", 2.0, 10.0), px("a", 0.0, 10.0), px("b", 1.0, 10.0)];
    let ids: Vec<&str> = sort_by_order(&sections).iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(sections[0].id, "c");
}

#[test]
fn sort_by_order_ties_keep_insertion_order() {
    let sections = vec![px("x", 1.0, 10.0), px("a", 0.0, 10.0), px("y", 1.0, 10.0), px("z", 1.0, 10.0)];
    let ids: Vec<&str> = sort_by_order(&sections).iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["a", "x", "y", "z"]);
}

#[test]
fn validate_accepts_good_list() {
    assert!(validate_sections(&[px("a", 0.0, 1.0), px("b", 1.0, 2.0)]).is_ok());
}

#[test]
fn validate_rejects_duplicate_ids() {
    let err = validate_sections(&[px("a", 0.0, 1.0), px("a", 1.0, 2.0)]).unwrap_err();
    assert_eq!(err, LayoutError::DuplicateSection("a".into()));
}

#[test]
fn validate_rejects_bad_heights() {
    for height in [0.0, -10.0, f64::NAN, f64::INFINITY] {
        let err = validate_sections(&[px("a", 0.0, height)]).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidHeight { .. }), "height {height}");
    }
}

#[test]
fn validate_rejects_empty_id_and_nan_order() {
    assert_eq!(validate_sections(&[px("", 0.0, 1.0)]).unwrap_err(), LayoutError::EmptySectionId);
    assert_eq!(
        validate_sections(&[px("a", f64::NAN, 1.0)]).unwrap_err(),
        LayoutError::InvalidOrder { id: "a".into() }
    );
}

// =============================================================
// Section lifecycle
// =============================================================

#[test]
fn append_to_empty_store_starts_at_order_zero() {
    let mut store = DocStore::new();
    let id = store.append_section(SectionHeight::px(300.0)).unwrap();
    assert_eq!(store.section(&id).unwrap().order, 0.0);
    assert!(!id.is_empty());
}

#[test]
fn append_uses_max_order_plus_one() {
    let mut store = DocStore::new();
    store.insert_section(px("a", 4.0, 10.0)).unwrap();
    store.insert_section(px("b", 1.0, 10.0)).unwrap();
    let id = store.append_section(SectionHeight::vh(100.0)).unwrap();
    let section = store.section(&id).unwrap();
    assert_eq!(section.order, 5.0);
    assert_eq!(section.unit, HeightUnit::Vh);
    assert_eq!(display_ids(&store).last().copied(), Some(id.as_str()));
}

#[test]
fn append_generates_distinct_ids() {
    let mut store = DocStore::new();
    let a = store.append_section(SectionHeight::px(10.0)).unwrap();
    let b = store.append_section(SectionHeight::px(10.0)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn append_rejects_non_positive_height() {
    let mut store = DocStore::new();
    assert!(store.append_section(SectionHeight::px(0.0)).is_err());
    assert!(store.is_empty());
}

#[test]
fn insert_rejects_duplicate() {
    let mut store = three_section_store();
    let err = store.insert_section(px("s2", 9.0, 10.0)).unwrap_err();
    assert_eq!(err, LayoutError::DuplicateSection("s2".into()));
    assert_eq!(store.section_count(), 3);
}

#[test]
fn resize_updates_height_and_unit() {
    let mut store = three_section_store();
    store.resize_section("s2", SectionHeight::vh(50.0)).unwrap();
    let s2 = store.section("s2").unwrap();
    assert_eq!(s2.height, 50.0);
    assert_eq!(s2.unit, HeightUnit::Vh);
}

#[test]
fn resize_rejects_unknown_and_invalid() {
    let mut store = three_section_store();
    assert_eq!(
        store.resize_section("nope", SectionHeight::px(10.0)).unwrap_err(),
        LayoutError::UnknownSection("nope".into())
    );
    assert!(store.resize_section("s1", SectionHeight::px(-1.0)).is_err());
    assert_eq!(store.section("s1").unwrap().height, 300.0);
}

#[test]
fn move_up_swaps_order_values() {
    let mut store = three_section_store();
    assert!(store.move_section_up("s2").unwrap());
    assert_eq!(display_ids(&store), ["s2", "s1", "s3"]);
    assert_eq!(store.section("s2").unwrap().order, 0.0);
    assert_eq!(store.section("s1").unwrap().order, 1.0);
}

#[test]
fn move_down_swaps_order_values() {
    let mut store = three_section_store();
    assert!(store.move_section_down("s2").unwrap());
    assert_eq!(display_ids(&store), ["s1", "s3", "s2"]);
}

#[test]
fn move_at_edges_is_noop() {
    let mut store = three_section_store();
    assert!(!store.move_section_up("s1").unwrap());
    assert!(!store.move_section_down("s3").unwrap());
    assert_eq!(display_ids(&store), ["s1", "s2", "s3"]);
}

#[test]
fn move_unknown_section_errors() {
    let mut store = three_section_store();
    assert!(store.move_section_up("ghost").is_err());
}

#[test]
fn move_with_sparse_orders() {
    let mut store = DocStore::new();
    store.insert_section(px("a", 10.0, 1.0)).unwrap();
    store.insert_section(px("b", 25.0, 1.0)).unwrap();
    store.insert_section(px("c", 40.0, 1.0)).unwrap();
    assert!(store.move_section_up("c").unwrap());
    assert_eq!(display_ids(&store), ["a", "c", "b"]);
    assert_eq!(store.section("c").unwrap().order, 25.0);
    assert_eq!(store.section("b").unwrap().order, 40.0);
}

#[test]
fn move_between_tied_orders_still_reorders() {
    let mut store = DocStore::new();
    store.insert_section(px("a", 0.0, 1.0)).unwrap();
    store.insert_section(px("b", 1.0, 1.0)).unwrap();
    store.insert_section(px("c", 1.0, 1.0)).unwrap();
    assert!(store.move_section_up("c").unwrap());
    assert_eq!(display_ids(&store), ["a", "c", "b"]);
}

#[test]
fn remove_section_cascades_to_elements() {
    let mut store = three_section_store();
    store.insert_element(element("e1", "s1", 0.0, 10.0)).unwrap();
    store.insert_element(element("e2", "s2", 0.0, 20.0)).unwrap();
    store.insert_element(element("e3", "s2", 5.0, 30.0)).unwrap();

    let (section, removed) = store.remove_section("s2").unwrap();
    assert_eq!(section.id, "s2");
    let removed_ids: Vec<&str> = removed.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(removed_ids, ["e2", "e3"]);
    assert_eq!(store.element_count(), 1);
    assert!(store.element("e1").is_some());
    assert_eq!(display_ids(&store), ["s1", "s3"]);
}

#[test]
fn remove_unknown_section_returns_none() {
    let mut store = three_section_store();
    assert!(store.remove_section("ghost").is_none());
    assert_eq!(store.section_count(), 3);
}

// =============================================================
// Elements
// =============================================================

#[test]
fn insert_element_requires_section() {
    let mut store = three_section_store();
    let err = store.insert_element(element("e1", "missing", 0.0, 0.0)).unwrap_err();
    assert_eq!(err, LayoutError::UnknownSection("missing".into()));
    assert_eq!(store.element_count(), 0);
}

#[test]
fn elements_in_filters_by_section() {
    let mut store = three_section_store();
    store.insert_element(element("b", "s1", 0.0, 0.0)).unwrap();
    store.insert_element(element("a", "s1", 0.0, 0.0)).unwrap();
    store.insert_element(element("c", "s3", 0.0, 0.0)).unwrap();
    let ids: Vec<&str> = store.elements_in("s1").iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(store.elements().len(), 3);
}

#[test]
fn apply_partial_moves_element_between_sections() {
    let mut store = three_section_store();
    store.insert_element(element("e1", "s1", 10.0, 290.0)).unwrap();
    let partial = PartialElement { section_id: Some("s2".into()), y: Some(50.0), ..Default::default() };
    assert!(store.apply_partial("e1", &partial));
    let e1 = store.element("e1").unwrap();
    assert_eq!(e1.section_id, "s2");
    assert_eq!(e1.x, 10.0);
    assert_eq!(e1.y, 50.0);
}

#[test]
fn apply_partial_rejects_unknown_target_section() {
    let mut store = three_section_store();
    store.insert_element(element("e1", "s1", 0.0, 0.0)).unwrap();
    let partial = PartialElement { section_id: Some("ghost".into()), y: Some(1.0), ..Default::default() };
    assert!(!store.apply_partial("e1", &partial));
    assert_eq!(store.element("e1").unwrap().section_id, "s1");
    assert_eq!(store.element("e1").unwrap().y, 0.0);
}

#[test]
fn apply_partial_unknown_element_returns_false() {
    let mut store = three_section_store();
    assert!(!store.apply_partial("ghost", &PartialElement::default()));
}

// =============================================================
// Snapshot
// =============================================================

#[test]
fn load_snapshot_replaces_state() {
    let mut store = three_section_store();
    store.insert_element(element("old", "s1", 0.0, 0.0)).unwrap();
    store
        .load_snapshot(vec![px("n1", 0.0, 50.0)], vec![element("new", "n1", 1.0, 2.0)])
        .unwrap();
    assert_eq!(store.section_count(), 1);
    assert!(store.element("old").is_none());
    assert!(store.element("new").is_some());
}

#[test]
fn load_snapshot_rejects_orphan_elements() {
    let mut store = three_section_store();
    let err = store
        .load_snapshot(vec![px("n1", 0.0, 50.0)], vec![element("e", "gone", 0.0, 0.0)])
        .unwrap_err();
    assert_eq!(err, LayoutError::UnknownSection("gone".into()));
    assert_eq!(store.section_count(), 3);
}
