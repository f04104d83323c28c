use jsonarena::{Arena, Error, JsonType, ValueRef};

fn parse(arena: &mut Arena, input: &str) -> ValueRef {
    arena.parse_document(input).unwrap()
}

fn json(arena: &Arena, v: ValueRef) -> String {
    arena.stringify(v).unwrap()
}

/// Helper: a fresh root value with the given key and number payload.
fn keyed_number(arena: &mut Arena, key: &str, num: &str) -> ValueRef {
    let v = arena.new_value();
    arena.set_key(v, key).unwrap();
    arena.set_num_str(v, num).unwrap();
    v
}

// ============================================================================
// Scalar setters
// ============================================================================

#[test]
fn scalar_setters_change_type() {
    let mut arena = Arena::new();
    let v = arena.new_value();

    arena.set_bool(v, true).unwrap();
    assert_eq!(json(&arena, v), "true");

    arena.set_num_str(v, "-12.5e3").unwrap();
    assert_eq!(arena.json_type(v), Some(JsonType::Number));
    assert_eq!(json(&arena, v), "-12.5e3");

    arena.set_str(v, "hello").unwrap();
    assert_eq!(json(&arena, v), r#""hello""#);

    arena.set_null(v).unwrap();
    assert!(arena.is_null(v));
}

#[test]
fn set_num_str_validates_grammar() {
    let mut arena = Arena::new();
    let v = arena.new_value();
    arena.set_num_str(v, "7").unwrap();
    for bad in ["", "abc", "01", "1.", "+1", "NaN", "Infinity", " 1", "1 "] {
        let err = arena.set_num_str(v, bad).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber(ref s) if s == bad), "{bad:?}");
    }
    assert_eq!(arena.get_num(v), Some("7"));
}

#[test]
fn set_str_stores_verbatim() {
    let mut arena = Arena::new();
    let v = arena.new_value();
    arena.set_str(v, r#"already \"escaped\""#).unwrap();
    assert_eq!(arena.get_str(v), Some(r#"already \"escaped\""#));
    assert_eq!(arena.get_unescaped_str(v), Some(r#"already "escaped""#));
    assert_eq!(json(&arena, v), r#""already \"escaped\"""#);
}

#[test]
fn set_str_escape_escapes_specials() {
    let mut arena = Arena::new();
    let v = arena.new_value();
    arena.set_str_escape(v, "q\"b\\c\u{01}\t").unwrap();
    assert_eq!(arena.get_str(v), Some(r#"q\"b\\c\u0001\t"#));
    assert_eq!(arena.get_unescaped_str(v), Some("q\"b\\c\u{01}\t"));
}

#[test]
fn set_key_on_member_changes_serialized_key() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"old":1}"#);
    let member = arena.obj_get(doc, "old").unwrap();
    arena.set_key(member, "new").unwrap();
    assert_eq!(json(&arena, doc), r#"{"new":1}"#);

    arena.set_key_escape(member, "line\nbreak").unwrap();
    assert_eq!(arena.get_key(member), Some(r"line\nbreak"));
    assert_eq!(arena.get_unescaped_key(member), Some("line\nbreak"));
    assert_eq!(json(&arena, doc), r#"{"line\nbreak":1}"#);
}

#[test]
fn set_key_on_root_is_hidden_until_added_to_object() {
    let mut arena = Arena::new();
    let v = keyed_number(&mut arena, "k", "1");
    assert_eq!(arena.get_key(v), None);
    assert_eq!(arena.get_unescaped_key(v), None);
    assert_eq!(json(&arena, v), "1");

    let doc = parse(&mut arena, "{}");
    let added = arena.obj_add_fast(doc, v).unwrap();
    assert_eq!(arena.get_key(added), Some("k"));
    assert_eq!(json(&arena, doc), r#"{"k":1}"#);
}

#[test]
fn set_key_on_array_element_is_hidden() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, r#"[1,"two"]"#);
    let second = arena.array_get(arr, 1).unwrap();
    arena.set_key_escape(second, "tab\t").unwrap();

    assert_eq!(arena.get_key(second), None);
    assert_eq!(arena.get_unescaped_key(second), None);
    assert_eq!(json(&arena, arr), r#"[1,"two"]"#);
}

#[test]
fn set_array_and_obj_discard_children() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":[1,2]}"#);
    let a = arena.obj_get(doc, "a").unwrap();
    let one = arena.array_get(a, 0).unwrap();

    arena.set_array(a).unwrap();
    assert_eq!(json(&arena, doc), r#"{"a":[]}"#);
    assert!(!arena.contains(one));

    arena.set_obj(doc).unwrap();
    assert_eq!(json(&arena, doc), "{}");
    assert!(!arena.contains(a));
}

#[test]
fn overwriting_scalar_with_scalar_keeps_handle() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"[1]"#);
    let one = arena.array_get(doc, 0).unwrap();
    arena.set_str_escape(one, "x").unwrap();
    assert!(arena.contains(one));
    assert_eq!(json(&arena, doc), r#"["x"]"#);
}

// ============================================================================
// Set / SetFast
// ============================================================================

#[test]
fn set_deep_copies_and_keeps_destination_key() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"dst":0,"src":{"k":[1,2]}}"#);
    let dst = arena.obj_get(doc, "dst").unwrap();
    let src = arena.obj_get(doc, "src").unwrap();

    arena.set(dst, src).unwrap();
    assert_eq!(json(&arena, doc), r#"{"dst":{"k":[1,2]},"src":{"k":[1,2]}}"#);
    assert_eq!(arena.get_key(dst), Some("dst"));

    let inner = arena.obj_get(src, "k").unwrap();
    let three = keyed_number(&mut arena, "ignored", "3");
    arena.array_add_fast(inner, three).unwrap();
    assert_eq!(json(&arena, dst), r#"{"k":[1,2]}"#);
    assert_eq!(json(&arena, src), r#"{"k":[1,2,3]}"#);
}

#[test]
fn set_from_own_descendant_copies_first() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":{"b":[1]}}"#);
    let b = arena.obj_get(arena.obj_get(doc, "a").unwrap(), "b").unwrap();
    arena.set(doc, b).unwrap();
    assert_eq!(json(&arena, doc), "[1]");
    assert!(!arena.contains(b));
}

#[test]
fn set_fast_moves_payload_and_invalidates_source() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"dst":0}"#);
    let dst = arena.obj_get(doc, "dst").unwrap();
    let src = parse(&mut arena, r#"[true,{"x":null}]"#);
    let nested = arena.array_get(src, 1).unwrap();

    arena.set_fast(dst, src).unwrap();

    assert_eq!(json(&arena, doc), r#"{"dst":[true,{"x":null}]}"#);
    assert!(!arena.contains(src));
    assert!(arena.contains(nested));
    assert_eq!(json(&arena, nested), r#"{"x":null}"#);
}

#[test]
fn set_fast_from_attached_source_detaches_it() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":[1,2],"b":"x"}"#);
    let a = arena.obj_get(doc, "a").unwrap();
    let b = arena.obj_get(doc, "b").unwrap();

    arena.set_fast(b, a).unwrap();

    assert_eq!(json(&arena, doc), r#"{"b":[1,2]}"#);
    assert_eq!(arena.size(doc), 1);
    assert_eq!(arena.obj_get(doc, "a"), None);
    assert_eq!(arena.begin(doc), Some(b));
    assert!(!arena.contains(a));
}

#[test]
fn set_fast_from_descendant_replaces_ancestor() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":{"b":[1,2]}}"#);
    let a = arena.obj_get(doc, "a").unwrap();
    let b = arena.obj_get(a, "b").unwrap();

    arena.set_fast(doc, a).unwrap();

    assert_eq!(json(&arena, doc), r#"{"b":[1,2]}"#);
    assert!(!arena.contains(a));
    assert_eq!(json(&arena, b), "[1,2]");
    let three = parse(&mut arena, "3");
    arena.array_add_fast(b, three).unwrap();
    assert_eq!(json(&arena, doc), r#"{"b":[1,2,3]}"#);
}

#[test]
fn set_fast_into_own_subtree_is_rejected() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":{"b":1}}"#);
    let a = arena.obj_get(doc, "a").unwrap();
    let b = arena.obj_get(a, "b").unwrap();

    assert!(matches!(arena.set_fast(b, doc), Err(Error::CyclicMove)));
    assert!(matches!(arena.set_fast(b, a), Err(Error::CyclicMove)));
    assert_eq!(json(&arena, doc), r#"{"a":{"b":1}}"#);
    assert!(arena.contains(a));
}

#[test]
fn set_fast_onto_itself_is_a_no_op() {
    let mut arena = Arena::new();
    let v = parse(&mut arena, "[1]");
    arena.set_fast(v, v).unwrap();
    assert!(arena.contains(v));
    assert_eq!(json(&arena, v), "[1]");
}

// ============================================================================
// ObjAdd / ObjAddFast
// ============================================================================

#[test]
fn obj_add_copies_member() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, "{}");
    let member = keyed_number(&mut arena, "n", "1");

    let added = arena.obj_add(doc, member).unwrap();
    assert_ne!(added, member);
    assert_eq!(json(&arena, doc), r#"{"n":1}"#);

    arena.set_num_str(member, "2").unwrap();
    assert_eq!(json(&arena, doc), r#"{"n":1}"#);
    assert_eq!(arena.get_key(added), Some("n"));
}

#[test]
fn obj_add_fast_moves_member() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":1}"#);
    let member = arena.new_value();
    arena.set_key(member, "list").unwrap();
    arena.parse(member, "[1,2]").unwrap();

    let added = arena.obj_add_fast(doc, member).unwrap();

    assert!(!arena.contains(member));
    assert_eq!(arena.get_key(added), Some("list"));
    assert_eq!(json(&arena, doc), r#"{"a":1,"list":[1,2]}"#);
    assert_eq!(arena.next(arena.obj_get(doc, "a").unwrap()), Some(added));
}

#[test]
fn obj_add_requires_key_and_object() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, "{}");
    let arr = parse(&mut arena, "[]");
    let unkeyed = arena.new_value();
    let keyed = keyed_number(&mut arena, "k", "1");

    assert!(matches!(arena.obj_add(doc, unkeyed), Err(Error::MissingKey)));
    assert!(matches!(arena.obj_add_fast(doc, unkeyed), Err(Error::MissingKey)));
    assert!(matches!(arena.obj_add(arr, keyed), Err(Error::NotAnObject)));
    assert!(matches!(arena.obj_add_fast(arr, keyed), Err(Error::NotAnObject)));

    assert_eq!(json(&arena, doc), "{}");
    assert!(arena.contains(unkeyed));
    assert!(arena.contains(keyed));
}

#[test]
fn obj_add_copy_of_itself() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":{"b":{}}}"#);
    let a = arena.obj_get(doc, "a").unwrap();
    arena.obj_add(a, a).unwrap();
    assert_eq!(json(&arena, doc), r#"{"a":{"b":{},"a":{"b":{}}}}"#);
}

#[test]
fn obj_add_fast_into_own_subtree_is_rejected() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":{"b":{}}}"#);
    let a = arena.obj_get(doc, "a").unwrap();
    let b = arena.obj_get(a, "b").unwrap();

    assert!(matches!(arena.obj_add_fast(b, a), Err(Error::CyclicMove)));
    assert!(matches!(arena.obj_add_fast(a, a), Err(Error::CyclicMove)));
    assert_eq!(json(&arena, doc), r#"{"a":{"b":{}}}"#);
}

#[test]
fn obj_add_fast_from_another_object_removes_member() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":{"x":1},"b":{}}"#);
    let a = arena.obj_get(doc, "a").unwrap();
    let b = arena.obj_get(doc, "b").unwrap();
    let x = arena.obj_get(a, "x").unwrap();

    arena.obj_add_fast(b, x).unwrap();

    assert_eq!(json(&arena, doc), r#"{"a":{},"b":{"x":1}}"#);
    assert_eq!(arena.size(a), 0);
    assert_eq!(arena.obj_get(a, "x"), None);
    assert_eq!(arena.begin(a), None);
}

#[test]
fn obj_add_fast_of_own_member_moves_it_to_the_end() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"x":1,"y":2,"z":3}"#);
    let x = arena.obj_get(doc, "x").unwrap();

    let moved = arena.obj_add_fast(doc, x).unwrap();

    assert_eq!(json(&arena, doc), r#"{"y":2,"z":3,"x":1}"#);
    assert_eq!(arena.size(doc), 3);
    assert_eq!(arena.next(moved), None);
    assert_eq!(arena.get_key(moved), Some("x"));
}

// ============================================================================
// ArrayAdd / ArrayAddFast
// ============================================================================

#[test]
fn array_add_copies_and_drops_key() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, "[]");
    let keyed = keyed_number(&mut arena, "k", "5");

    let added = arena.array_add(arr, keyed).unwrap();

    assert_eq!(json(&arena, arr), "[5]");
    assert_eq!(arena.get_key(added), None);
    assert_eq!(json(&arena, keyed), "5");
}

#[test]
fn array_add_fast_moves_and_drops_key() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, "[0]");
    let obj = parse(&mut arena, r#"{"k":{"deep":[1]}}"#);
    let k = arena.obj_get(obj, "k").unwrap();

    let added = arena.array_add_fast(arr, k).unwrap();

    assert_eq!(json(&arena, arr), r#"[0,{"deep":[1]}]"#);
    assert_eq!(arena.get_key(added), None);
    assert!(!arena.contains(k));
    assert_eq!(json(&arena, obj), "{}");
    assert_eq!(arena.size(obj), 0);
}

#[test]
fn array_add_fast_reorders_within_same_array() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, "[1,2]");
    let first = arena.array_get(arr, 0).unwrap();

    arena.array_add_fast(arr, first).unwrap();

    assert_eq!(json(&arena, arr), "[2,1]");
    assert_eq!(arena.size(arr), 2);
    assert!(!arena.contains(first));
}

#[test]
fn moving_middle_element_keeps_chain_consistent() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, "[0,1,2,3]");
    let other = parse(&mut arena, "[]");
    let one = arena.array_get(arr, 1).unwrap();
    let two = arena.array_get(arr, 2).unwrap();

    arena.array_add_fast(other, one).unwrap();
    arena.array_add_fast(other, two).unwrap();

    assert_eq!(json(&arena, arr), "[0,3]");
    assert_eq!(json(&arena, other), "[1,2]");
    arena.array_del(arr, 1).unwrap();
    let four = parse(&mut arena, "4");
    arena.array_add_fast(arr, four).unwrap();
    assert_eq!(json(&arena, arr), "[0,4]");
    assert_eq!(arena.array_get(arr, 2), None);
}

#[test]
fn array_add_requires_array() {
    let mut arena = Arena::new();
    let obj = parse(&mut arena, "{}");
    let v = arena.new_value();
    assert!(matches!(arena.array_add(obj, v), Err(Error::NotAnArray)));
    assert!(matches!(arena.array_add_fast(obj, v), Err(Error::NotAnArray)));
    assert!(arena.contains(v));
}

#[test]
fn array_add_fast_of_itself_is_rejected() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, "[[]]");
    let inner = arena.array_get(arr, 0).unwrap();
    assert!(matches!(arena.array_add_fast(arr, arr), Err(Error::CyclicMove)));
    assert!(matches!(arena.array_add_fast(inner, arr), Err(Error::CyclicMove)));

    arena.array_add(arr, arr).unwrap();
    assert_eq!(json(&arena, arr), "[[],[[]]]");
}

#[test]
fn array_add_keeps_insertion_order() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, "[]");
    for i in 0..5 {
        let v = arena.new_value();
        arena.set_num_str(v, &i.to_string()).unwrap();
        arena.array_add_fast(arr, v).unwrap();
    }
    assert_eq!(json(&arena, arr), "[0,1,2,3,4]");
    assert_eq!(arena.size(arr), 5);
}

// ============================================================================
// ObjDel / ArrayDel
// ============================================================================

#[test]
fn obj_del_removes_first_match_only() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"x":1,"y":2,"x":3}"#);
    arena.obj_del(doc, "x").unwrap();
    assert_eq!(json(&arena, doc), r#"{"y":2,"x":3}"#);
    assert_eq!(arena.size(doc), 2);
}

#[test]
fn obj_del_missing_key_fails_without_change() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":1}"#);
    let err = arena.obj_del(doc, "b").unwrap_err();
    assert!(matches!(err, Error::KeyNotFound(ref k) if k == "b"));
    assert_eq!(json(&arena, doc), r#"{"a":1}"#);

    let arr = parse(&mut arena, "[1]");
    assert!(matches!(arena.obj_del(arr, "a"), Err(Error::NotAnObject)));
}

#[test]
fn obj_del_last_member_then_append() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":1,"b":2}"#);
    arena.obj_del(doc, "b").unwrap();
    let c = keyed_number(&mut arena, "c", "3");
    arena.obj_add_fast(doc, c).unwrap();
    assert_eq!(json(&arena, doc), r#"{"a":1,"c":3}"#);
}

#[test]
fn array_del_head_middle_and_tail() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, "[0,1,2,3,4]");

    arena.array_del(arr, 2).unwrap();
    assert_eq!(json(&arena, arr), "[0,1,3,4]");

    arena.array_del(arr, 0).unwrap();
    assert_eq!(json(&arena, arr), "[1,3,4]");

    arena.array_del(arr, 2).unwrap();
    assert_eq!(json(&arena, arr), "[1,3]");

    let five = arena.parse_document("5").unwrap();
    arena.array_add_fast(arr, five).unwrap();
    assert_eq!(json(&arena, arr), "[1,3,5]");
    assert_eq!(arena.size(arr), 3);
}

#[test]
fn array_del_until_empty_then_refill() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, "[1,2]");
    arena.array_del(arr, 1).unwrap();
    arena.array_del(arr, 0).unwrap();
    assert_eq!(json(&arena, arr), "[]");
    assert_eq!(arena.begin(arr), None);

    let v = arena.parse_document("true").unwrap();
    arena.array_add_fast(arr, v).unwrap();
    assert_eq!(json(&arena, arr), "[true]");
}

#[test]
fn array_del_out_of_bounds_fails() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, "[1,2]");
    let err = arena.array_del(arr, 2).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfBounds { index: 2, len: 2 }));
    assert_eq!(json(&arena, arr), "[1,2]");

    let obj = parse(&mut arena, "{}");
    assert!(matches!(arena.array_del(obj, 0), Err(Error::NotAnArray)));
}

#[test]
fn deleted_subtree_handles_go_stale() {
    let mut arena = Arena::new();
    let arr = parse(&mut arena, r#"[{"deep":[1,2]},3]"#);
    let obj = arena.array_get(arr, 0).unwrap();
    let deep = arena.obj_get(obj, "deep").unwrap();
    let one = arena.array_get(deep, 0).unwrap();
    let three = arena.array_get(arr, 1).unwrap();

    arena.array_del(arr, 0).unwrap();

    assert!(!arena.contains(obj));
    assert!(!arena.contains(deep));
    assert!(!arena.contains(one));
    assert!(arena.contains(three));
    assert_eq!(arena.array_get(arr, 0), Some(three));
}

// ============================================================================
// Copy / Move
// ============================================================================

#[test]
fn copy_value_is_independent() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":[1,{"b":"c"}]}"#);
    let a = arena.obj_get(doc, "a").unwrap();

    let copy = arena.copy_value(a).unwrap();
    assert_eq!(arena.get_key(copy), None);
    assert_eq!(json(&arena, copy), json(&arena, a));

    arena.array_del(copy, 0).unwrap();
    assert_eq!(json(&arena, a), r#"[1,{"b":"c"}]"#);
    assert_eq!(json(&arena, copy), r#"[{"b":"c"}]"#);
    assert_eq!(arena.next(copy), None);

    let holder = parse(&mut arena, "{}");
    arena.obj_add_fast(holder, copy).unwrap();
    assert_eq!(json(&arena, holder), r#"{"a":[{"b":"c"}]}"#);
}

#[test]
fn move_value_from_root_vacates_source() {
    let mut arena = Arena::new();
    let v = keyed_number(&mut arena, "k", "9");
    let live_before = arena.stats().live_nodes;

    let moved = arena.move_value(v).unwrap();

    assert!(!arena.contains(v));
    assert_eq!(json(&arena, moved), "9");
    assert_eq!(arena.stats().live_nodes, live_before);

    let doc = parse(&mut arena, "{}");
    let added = arena.obj_add_fast(doc, moved).unwrap();
    assert_eq!(arena.get_key(added), Some("k"));
}

#[test]
fn move_value_from_container_detaches_it() {
    let mut arena = Arena::new();
    let doc = parse(&mut arena, r#"{"a":[1,2],"b":3}"#);
    let a = arena.obj_get(doc, "a").unwrap();
    let one = arena.array_get(a, 0).unwrap();
    let live_before = arena.stats().live_nodes;

    let moved = arena.move_value(a).unwrap();

    assert_eq!(json(&arena, doc), r#"{"b":3}"#);
    assert_eq!(arena.size(doc), 1);
    assert_eq!(arena.obj_get(doc, "a"), None);
    assert_eq!(arena.stats().live_nodes, live_before);
    assert_eq!(json(&arena, moved), "[1,2]");
    assert_eq!(arena.next(moved), None);
    assert!(arena.contains(one));
    assert_eq!(arena.array_get(moved, 0), Some(one));
}

// ============================================================================
// Stale handles
// ============================================================================

#[test]
fn mutations_on_stale_handles_fail() {
    let mut arena = Arena::new();
    let live = parse(&mut arena, "[]");
    let stale = arena.new_value();
    arena.move_value(stale).unwrap();

    assert!(matches!(arena.set_null(stale), Err(Error::StaleHandle)));
    assert!(matches!(arena.set_key(stale, "k"), Err(Error::StaleHandle)));
    assert!(matches!(arena.array_add(live, stale), Err(Error::StaleHandle)));
    assert!(matches!(arena.array_add_fast(stale, live), Err(Error::StaleHandle)));
    assert!(matches!(arena.copy_value(stale), Err(Error::StaleHandle)));
    assert!(matches!(arena.move_value(stale), Err(Error::StaleHandle)));
    assert!(matches!(arena.set(live, stale), Err(Error::StaleHandle)));
    assert_eq!(json(&arena, live), "[]");
}

// ============================================================================
// Deep chains
// ============================================================================

const DEEP: usize = 100_000;

#[test]
fn appending_at_the_bottom_of_a_deep_chain() {
    let mut arena = Arena::new();
    let root = parse(&mut arena, "[]");
    let mut bottom = root;
    for _ in 0..DEEP {
        let child = arena.new_value();
        arena.set_array(child).unwrap();
        bottom = arena.array_add_fast(bottom, child).unwrap();
    }

    let out = json(&arena, root);
    assert_eq!(out.len(), 2 * (DEEP + 1));
    assert!(out.starts_with("[[[") && out.ends_with("]]]"));
    assert!(matches!(arena.array_add_fast(bottom, root), Err(Error::CyclicMove)));
}

#[test]
fn appending_members_at_the_bottom_of_a_deep_chain() {
    let mut arena = Arena::new();
    let root = parse(&mut arena, "{}");
    let mut bottom = root;
    for _ in 0..DEEP {
        let child = arena.new_value();
        arena.set_key(child, "n").unwrap();
        arena.set_obj(child).unwrap();
        bottom = arena.obj_add_fast(bottom, child).unwrap();
    }

    let subtree = parse(&mut arena, r#"{"n":{"n":{}}}"#);
    let inner = arena.obj_get(subtree, "n").unwrap();
    arena.obj_add_fast(bottom, inner).unwrap();
    assert_eq!(arena.size(subtree), 0);
    assert_eq!(json(&arena, root).len(), "{\"n\":}".len() * (DEEP + 2) + 2);
}
