//! Edge case tests for tirea-mapper.

use serde_json::{json, Value};
use std::borrow::Cow;
use tirea_mapper::{
    combine, mapper_fn, parse_path, rename_paths, rename_props, scope_builder, Mapper,
    RenameProps, RenameTable,
};

fn table(pairs: &[(&str, &str)]) -> RenameTable {
    RenameTable::try_from_pairs(pairs.iter().copied()).unwrap()
}

// ============================================================================
// Path-rename engine
// ============================================================================

#[test]
fn test_rename_identity_is_same_reference() {
    let docs = [json!({}), json!({"a": [1, 2]}), json!(null), json!("s")];
    for doc in &docs {
        match rename_paths(&RenameTable::new(), doc) {
            Cow::Borrowed(out) => assert!(std::ptr::eq(out, doc)),
            Cow::Owned(_) => panic!("empty table copied {doc}"),
        }
    }
}

#[test]
fn test_rename_round_trip_shape() {
    let doc = json!({"a": {"b": 5}});
    let out = rename_paths(&table(&[("a.b", "x.y")]), &doc);
    assert_eq!(*out, json!({"x": {"y": 5}}));
}

#[test]
fn test_rename_missing_source_is_null_not_error() {
    let doc = json!({});
    let out = rename_paths(&table(&[("a.b", "x")]), &doc);
    assert_eq!(*out, json!({"x": null}));
}

#[test]
fn test_rename_through_scalar_is_null() {
    let doc = json!({"a": {"b": 1}});
    let out = rename_paths(&table(&[("a.b.c", "x")]), &doc);
    assert_eq!(*out, json!({"x": null}));
}

#[test]
fn test_rename_sibling_destinations_under_same_key_overwrite() {
    let doc = json!({"first": "Ada", "last": "Lovelace"});
    let out = rename_paths(
        &table(&[("first", "name.first"), ("last", "name.last")]),
        &doc,
    );
    assert_eq!(*out, json!({"name": {"last": "Lovelace"}}));
}

#[test]
fn test_rename_moves_whole_subtrees() {
    let doc = json!({"user": {"name": "a", "tags": ["x"]}});
    let out = rename_paths(&table(&[("user", "profile")]), &doc);
    assert_eq!(*out, json!({"profile": {"name": "a", "tags": ["x"]}}));
}

#[test]
fn test_rename_does_not_touch_source() {
    let doc = json!({"a": {"b": 1}});
    let snapshot = doc.clone();
    let _ = rename_paths(&table(&[("a.b", "a.c")]), &doc);
    assert_eq!(doc, snapshot);
}

#[test]
fn test_rename_bracket_and_dotted_sources_are_the_same_entry() {
    let t = table(&[("items.0", "a"), ("items[0]", "b")]);
    assert_eq!(t.len(), 1);
    let doc = json!({"items": ["z"]});
    let out = rename_paths(&t, &doc);
    assert_eq!(*out, json!({"b": "z"}));
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_parse_path_reports_offset() {
    let err = parse_path("a.b[1").unwrap_err();
    assert!(err.to_string().contains("offset 3"), "{err}");
}

// ============================================================================
// Renaming wrapper
// ============================================================================

#[test]
fn test_wrapper_with_empty_tables_matches_unwrapped() {
    let mapper = mapper_fn(|state, props| json!({"s": state, "p": props}));
    let wrapped = RenameProps::default().wrap(mapper);
    let inputs = [
        (json!({}), json!({})),
        (json!({"a": 1}), json!({"b": [1, 2]})),
        (json!(null), json!("str")),
        (json!([1]), Value::Null),
    ];
    for (state, props) in &inputs {
        assert_eq!(wrapped.map(state, props), mapper.map(state, props));
    }
}

#[test]
fn test_wrapper_output_non_object_reads_null() {
    let wrapped = rename_props(RenameTable::new(), table(&[("a", "b")]))
        .wrap(mapper_fn(|_, _| json!(3)));
    assert_eq!(wrapped.map_state(&json!({})), json!({"b": null}));
}

#[test]
fn test_wrapper_with_null_props_and_input_table() {
    let wrapped = rename_props(table(&[("id", "key")]), RenameTable::new())
        .wrap(mapper_fn(|_, p| p.clone()));
    assert_eq!(wrapped.map_state(&json!({})), json!({"key": null}));
}

// ============================================================================
// Combinator
// ============================================================================

#[test]
fn test_combine_sequencing() {
    let m1 = mapper_fn(|_, _| json!({"a": 1}));
    let m2 = mapper_fn(|_, p| json!({"b": p["a"].as_i64().unwrap() + 1}));
    let combined = combine!(m1, m2);
    assert_eq!(
        combined.map(&json!({"any": "state"}), &json!({})),
        json!({"a": 1, "b": 2})
    );
}

#[test]
fn test_combine_single_mapper_is_shallow_copy_of_output() {
    let combined = combine!(mapper_fn(|_, _| json!({"a": {"b": 1}})));
    assert_eq!(combined.map_state(&json!({})), json!({"a": {"b": 1}}));
}

#[test]
fn test_combine_scalar_own_props_contribute_nothing() {
    let combined = combine!(mapper_fn(|_, p| json!({"seen": p})));
    assert_eq!(combined.map(&json!({}), &json!(42)), json!({"seen": {}}));
}

// ============================================================================
// Scoped builder
// ============================================================================

#[test]
fn test_scope_single_function() {
    let m = scope_builder("t").finish(|args| args.scoped().clone());
    assert_eq!(m.map(&json!({"t": {"v": 9}}), &json!({})), json!({"v": 9}));
}

#[test]
fn test_scope_chained() {
    let m = scope_builder("t")
        .then(mapper_fn(|s, _| s["v"].clone()))
        .finish(|args| json!([args.result(0), args.scoped()["v"]]));
    assert_eq!(m.map(&json!({"t": {"v": 9}}), &json!({})), json!([9, 9]));
}

#[test]
fn test_scope_branch_holding_scalar() {
    let m = scope_builder("n").finish(|args| json!(args.scoped().as_i64().map(|n| n + 1)));
    assert_eq!(m.map_state(&json!({"n": 1})), json!(2));
}

#[test]
fn test_scope_branch_with_dots_is_a_single_key() {
    let m = scope_builder("a.b").finish(|args| args.scoped().clone());
    assert_eq!(m.map_state(&json!({"a.b": 1, "a": {"b": 2}})), json!(1));
}

#[test]
fn test_scope_result_positions_out_of_range() {
    let m = scope_builder("t").finish(|args| {
        json!({"r0": args.result(0), "p9": args.get(9), "len": args.len()})
    });
    assert_eq!(
        m.map_state(&json!({"t": 1})),
        json!({"r0": null, "p9": null, "len": 3})
    );
}
