//! Tests for `walker`.

use proptest::prelude::*;

use crate::document_loader::parse_document;
use crate::resolver::ResolutionOrder;
use crate::types::{Document, Mapping, Record, TransformSpec, WalkSpec};
use crate::walker::{WalkOptions, Walker, walk};

fn doc(yaml: &str) -> Document {
  parse_document(yaml).unwrap()
}

fn walk_spec(yaml: &str) -> WalkSpec {
  WalkSpec::from_document(&doc(yaml)).unwrap()
}

fn transform_spec(yaml: &str) -> TransformSpec {
  TransformSpec::from_document(&doc(yaml)).unwrap()
}

fn record(yaml: &str) -> Record {
  doc(yaml).as_mapping().unwrap().clone()
}

#[test]
fn ancestor_inheritance() {
  let out = walk(
    &walk_spec("{children: {}}"),
    Some(&transform_spec("{out1: a, out2: x}")),
    &doc(r#"{"a":1, "children":[{"x":5}]}"#),
    &WalkOptions::new().with_required(["out1", "out2"]),
  );
  assert_eq!(out, vec![record("{out1: 1, out2: 5}")]);
}

#[test]
fn missing_required_drops_everything() {
  let out = walk(
    &walk_spec("{children: {}}"),
    Some(&transform_spec("{out1: a, out2: x}")),
    &doc(r#"{"a":1, "children":[{"x":5}]}"#),
    &WalkOptions::new().with_required(["out1", "out2", "out3"]),
  );
  assert!(out.is_empty());
}

#[test]
fn candidate_fallback() {
  let out = walk(
    &WalkSpec::new(),
    Some(&transform_spec("{out: [missing_key, a]}")),
    &doc("{a: 7}"),
    &WalkOptions::new(),
  );
  assert_eq!(out, vec![record("{out: 7}")]);
}

#[test]
fn intermediate_node_is_transformed_when_deeper_key_absent() {
  let out = walk(
    &walk_spec("{children: {grand: {}}}"),
    Some(&transform_spec("{a: a, b: b}")),
    &doc(r#"{"a":1,"children":{"b":2}}"#),
    &WalkOptions::new(),
  );
  // The `children` node itself, inheriting `a` from the root.
  assert_eq!(out, vec![record("{a: 1, b: 2}")]);
}

#[test]
fn root_without_walk_keys_is_a_leaf() {
  let out = walk(
    &walk_spec("{children: {}}"),
    Some(&transform_spec("{name: name}")),
    &doc("{name: solo}"),
    &WalkOptions::new(),
  );
  assert_eq!(out, vec![record("{name: solo}")]);
}

#[test]
fn children_inherit_parent_attributes() {
  let out = walk(
    &walk_spec("{sounds: {}}"),
    Some(&transform_spec("{filename: file, name: name}")),
    &doc("{file: group.mp3, sounds: [{name: a}, {name: b}]}"),
    &WalkOptions::new().with_required(["filename", "name"]),
  );
  assert_eq!(
    out,
    vec![
      record("{filename: group.mp3, name: a}"),
      record("{filename: group.mp3, name: b}"),
    ]
  );
}

#[test]
fn falsy_child_values_fall_through_to_ancestors() {
  let out = walk(
    &walk_spec("{takes: {}}"),
    Some(&transform_spec("{filename: file}")),
    &doc("{file: owl.mp3, takes: [{file: ''}, {file: 0}, {file: ~}]}"),
    &WalkOptions::new().require("filename"),
  );
  assert_eq!(out, vec![record("{filename: owl.mp3}"); 3]);
}

#[test]
fn suppressed_children_leave_no_output() {
  // The child lacks `take`, and so does every ancestor: the parent is tried and dropped too.
  let out = walk(
    &walk_spec("{takes: {}}"),
    Some(&transform_spec("{filename: file, take: take}")),
    &doc("{file: owl.mp3, takes: [{x: 1}]}"),
    &WalkOptions::new().with_required(["filename", "take"]),
  );
  assert!(out.is_empty());
}

#[test]
fn parent_is_transformed_when_descent_yields_nothing() {
  let transform = transform_spec("{filename: file, marker: [child, parent]}");
  let options = WalkOptions::new().with_required(["filename", "marker"]);
  let expected = vec![record("{filename: owl.mp3, marker: p}")];

  // Empty list under a walked key.
  let out = walk(
    &walk_spec("{takes: {}}"),
    Some(&transform),
    &doc("{file: owl.mp3, parent: p, takes: []}"),
    &options,
  );
  assert_eq!(out, expected);

  // Scalar under a walked key.
  let out = walk(
    &walk_spec("{takes: {}}"),
    Some(&transform),
    &doc("{file: owl.mp3, parent: p, takes: 5}"),
    &options,
  );
  assert_eq!(out, expected);

  // Every matched key yields nothing.
  let out = walk(
    &walk_spec("{takes: {}, extras: {}}"),
    Some(&transform),
    &doc("{file: owl.mp3, parent: p, takes: [], extras: [1, 2]}"),
    &options,
  );
  assert_eq!(out, expected);
}

#[test]
fn matched_sibling_keeps_parent_from_transforming() {
  let out = walk(
    &walk_spec("{takes: {}, extras: {}}"),
    Some(&transform_spec("{filename: [name, file]}")),
    &doc("{file: owl.mp3, takes: [], extras: [{name: hoot.mp3}]}"),
    &WalkOptions::new().require("filename"),
  );
  assert_eq!(out, vec![record("{filename: hoot.mp3}")]);
}

#[test]
fn walk_key_order_drives_output_order() {
  let source = doc("{birds: [{n: owl}], cows: [{n: cow}]}");
  let transform = transform_spec("{n: n}");
  let forward = walk(
    &walk_spec("{birds: {}, cows: {}}"),
    Some(&transform),
    &source,
    &WalkOptions::new(),
  );
  let reverse = walk(
    &walk_spec("{cows: {}, birds: {}}"),
    Some(&transform),
    &source,
    &WalkOptions::new(),
  );
  assert_eq!(forward, vec![record("{n: owl}"), record("{n: cow}")]);
  assert_eq!(reverse, vec![record("{n: cow}"), record("{n: owl}")]);
}

#[test]
fn depth_first_ordering_across_levels() {
  let source = doc(
    r#"
    groups:
      - name: farm
        sounds: [{n: cow}, {n: hen}]
      - name: wild
        sounds: [{n: owl}]
    "#,
  );
  let out = walk(
    &walk_spec("{groups: {sounds: {}}}"),
    Some(&transform_spec("{n: n, group: name}")),
    &source,
    &WalkOptions::new(),
  );
  assert_eq!(
    out,
    vec![
      record("{n: cow, group: farm}"),
      record("{n: hen, group: farm}"),
      record("{n: owl, group: wild}"),
    ]
  );
}

#[test]
fn sibling_branches_do_not_share_context() {
  let source = doc(
    r#"
    groups:
      - context: first
        sounds: [{n: a}]
      - sounds: [{n: b}]
    "#,
  );
  let out = walk(
    &walk_spec("{groups: {sounds: {}}}"),
    Some(&transform_spec("{n: n, context: context}")),
    &source,
    &WalkOptions::new(),
  );
  assert_eq!(out, vec![record("{n: a, context: first}"), record("{n: b}")]);
}

#[test]
fn list_membership_does_not_add_an_ancestor() {
  // Top-level list of mappings: each element is a leaf with no ancestors.
  let out = walk(
    &walk_spec("{children: {}}"),
    Some(&transform_spec("{n: n, up: up}")),
    &doc("[{n: a}, {n: b, up: 1}, [{n: c}]]"),
    &WalkOptions::new(),
  );
  assert_eq!(
    out,
    vec![record("{n: a}"), record("{n: b, up: 1}"), record("{n: c}")]
  );
}

#[test]
fn nested_lists_inherit_the_same_ancestors() {
  let out = walk(
    &walk_spec("{items: {}}"),
    Some(&transform_spec("{n: n, root: root}")),
    &doc("{root: r, items: [[{n: a}], [[{n: b}]]]}"),
    &WalkOptions::new(),
  );
  assert_eq!(
    out,
    vec![record("{n: a, root: r}"), record("{n: b, root: r}")]
  );
}

#[test]
fn no_transform_passes_leaves_through() {
  let out = walk(
    &walk_spec("{sounds: {}}"),
    None,
    &doc("{group: g, sounds: [{filename: a.mp3, extra: 1}, {filename: b.mp3}]}"),
    &WalkOptions::new().require("filename"),
  );
  assert_eq!(
    out,
    vec![record("{filename: a.mp3, extra: 1}"), record("{filename: b.mp3}")]
  );
}

#[test]
fn passthrough_drops_leaves_missing_required_fields() {
  let source = doc("[{filename: a.mp3}, {description: nameless}, {filename: b.mp3, take: 2}]");
  let required = walk(
    &WalkSpec::new(),
    None,
    &source,
    &WalkOptions::new().require("filename").debug(true),
  );
  assert_eq!(
    required,
    vec![record("{filename: a.mp3}"), record("{filename: b.mp3, take: 2}")]
  );

  let unrestricted = walk(&WalkSpec::new(), None, &source, &WalkOptions::new());
  assert_eq!(unrestricted.len(), 3);
  assert_eq!(unrestricted[1], record("{description: nameless}"));
}

#[test]
fn scalars_are_ignored() {
  let options = WalkOptions::new();
  let transform = transform_spec("{n: n}");
  assert!(walk(&WalkSpec::new(), Some(&transform), &doc("42"), &options).is_empty());
  assert!(walk(&WalkSpec::new(), Some(&transform), &doc("[1, two, ~]"), &options).is_empty());
}

#[test]
fn resolve_order_option_is_honoured() {
  let source = doc("{label: parent, items: [{name: leaf}]}");
  let transform = transform_spec("{title: [label, name]}");
  let spec = walk_spec("{items: {}}");
  let nearest = walk(&spec, Some(&transform), &source, &WalkOptions::new());
  let candidate = walk(
    &spec,
    Some(&transform),
    &source,
    &WalkOptions::new().resolve_order(ResolutionOrder::CandidateFirst),
  );
  assert_eq!(nearest, vec![record("{title: leaf}")]);
  assert_eq!(candidate, vec![record("{title: parent}")]);
}

#[test]
fn walker_struct_runs_configured_walk() {
  let walker = Walker::new(
    walk_spec("{children: {}}"),
    Some(transform_spec("{out1: a, out2: x}")),
    WalkOptions::new().with_required(["out1", "out2"]),
  );
  assert_eq!(walker.options().required.len(), 2);
  let out = walker.run(&doc(r#"{"a":1, "children":[{"x":5}]}"#));
  assert_eq!(out, vec![record("{out1: 1, out2: 5}")]);
}

fn leaf(n: i64, tag: bool) -> Document {
  let mut m = Mapping::new();
  m.insert("n", n);
  if tag {
    m.insert("tag", "t");
  }
  Document::Mapping(m)
}

proptest! {
  #[test]
  fn output_order_follows_source_order(ns in proptest::collection::vec(1i64..1000, 0..20)) {
    let mut root = Mapping::new();
    root.insert("items", Document::Sequence(ns.iter().map(|&n| leaf(n, true)).collect()));
    let source = Document::Mapping(root);
    let out = walk(
      &WalkSpec::new().step("items", WalkSpec::new()),
      Some(&TransformSpec::new().field("n", ["n"])),
      &source,
      &WalkOptions::new().require("n"),
    );
    let got: Vec<Document> = out.iter().filter_map(|r| r.get("n").cloned()).collect();
    let expected: Vec<Document> = ns.iter().map(|&n| Document::from(n)).collect();
    if ns.is_empty() {
      // Nothing to descend into yields a transform of the root, which lacks `n`.
      prop_assert!(out.is_empty());
    } else {
      prop_assert_eq!(got, expected);
    }
  }

  #[test]
  fn records_kept_iff_required_fields_present(
    items in proptest::collection::vec((1i64..1000, any::<bool>()), 1..20)
  ) {
    let mut root = Mapping::new();
    root.insert(
      "items",
      Document::Sequence(items.iter().map(|&(n, tag)| leaf(n, tag)).collect()),
    );
    let source = Document::Mapping(root);
    let out = walk(
      &WalkSpec::new().step("items", WalkSpec::new()),
      Some(&TransformSpec::new().field("n", ["n"]).field("tag", ["tag"])),
      &source,
      &WalkOptions::new().require("n").require("tag"),
    );
    let expected: Vec<i64> = items.iter().filter(|(_, tag)| *tag).map(|(n, _)| *n).collect();
    let got: Vec<Document> = out.iter().filter_map(|r| r.get("n").cloned()).collect();
    prop_assert!(out.iter().all(|r| r.contains_key("n") && r.contains_key("tag")));
    prop_assert_eq!(got, expected.into_iter().map(Document::from).collect::<Vec<_>>());
  }
}
