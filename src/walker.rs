//! Recursive accumulating walk: source document to a flat list of records.
//!
//! The walk descends along the walk spec's keys (in declared order), collecting each mapping
//! it descends through as an ancestor. A mapping becomes a leaf when none of its walk-spec
//! descents produced any record; leaves are transformed (or passed through when no transform
//! spec is given). Either way a record lacking a required field is dropped. Sequences are walked element by element without adding an ancestor frame.

use std::collections::BTreeSet;

use tracing::{debug, info, instrument, trace};

use crate::resolver::ResolutionOrder;
use crate::transformer::transform;
use crate::types::{Document, Mapping, Record, TransformSpec, WalkSpec};

/// Options threaded through the walk.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
  /// Output fields a record must contain to be kept.
  pub required: BTreeSet<String>,
  pub resolve_order: ResolutionOrder,
  /// Emit a debug trace for every transform decision.
  pub debug: bool,
}

impl WalkOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn require(mut self, field: impl Into<String>) -> Self {
    self.required.insert(field.into());
    self
  }

  pub fn with_required<I, S>(mut self, fields: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.required.extend(fields.into_iter().map(Into::into));
    self
  }

  pub fn resolve_order(mut self, order: ResolutionOrder) -> Self {
    self.resolve_order = order;
    self
  }

  pub fn debug(mut self, debug: bool) -> Self {
    self.debug = debug;
    self
  }
}

/// Walks `source` and returns every record in depth-first order.
pub fn walk(
  walk_spec: &WalkSpec,
  transform_spec: Option<&TransformSpec>,
  source: &Document,
  options: &WalkOptions,
) -> Vec<Record> {
  walk_node(walk_spec, transform_spec, source, options, &[])
}

/// `ancestors` is ordered outermost-first; siblings each get their own extended copy.
fn walk_node<'a>(
  walk_spec: &WalkSpec,
  transform_spec: Option<&TransformSpec>,
  source: &'a Document,
  options: &WalkOptions,
  ancestors: &[&'a Mapping],
) -> Vec<Record> {
  match source {
    Document::Sequence(items) => items
      .iter()
      .flat_map(|item| walk_node(walk_spec, transform_spec, item, options, ancestors))
      .collect(),
    Document::Mapping(node) => walk_mapping(walk_spec, transform_spec, node, options, ancestors),
    Document::Scalar(s) => {
      trace!(scalar = %s, "ignoring scalar outside a mapping");
      Vec::new()
    }
  }
}

fn walk_mapping<'a>(
  walk_spec: &WalkSpec,
  transform_spec: Option<&TransformSpec>,
  node: &'a Mapping,
  options: &WalkOptions,
  ancestors: &[&'a Mapping],
) -> Vec<Record> {
  let mut output = Vec::new();
  for (key, sub_walk) in walk_spec.steps() {
    if let Some(child) = node.get(key) {
      let mut extended = ancestors.to_vec();
      extended.push(node);
      output.extend(walk_node(sub_walk, transform_spec, child, options, &extended));
    }
  }
  if !output.is_empty() {
    return output;
  }

  match transform_spec {
    Some(spec) => {
      let chain: Vec<&Mapping> = std::iter::once(node)
        .chain(ancestors.iter().rev().copied())
        .collect();
      transform(&chain, spec, options).into_record().into_iter().collect()
    }
    None => passthrough(node, options).into_iter().collect(),
  }
}

/// Without a transform spec the node itself is the record, kept only if it has every required
/// field.
fn passthrough(node: &Mapping, options: &WalkOptions) -> Option<Record> {
  match options.required.iter().find(|name| !node.contains_key(name)) {
    Some(missing) => {
      if options.debug {
        debug!(source = %node, missing = %missing, "passthrough suppressed");
      }
      None
    }
    None => Some(node.clone()),
  }
}

/// A configured walk: walk spec, optional transform spec and options.
#[derive(Debug, Clone, Default)]
pub struct Walker {
  walk_spec: WalkSpec,
  transform_spec: Option<TransformSpec>,
  options: WalkOptions,
}

impl Walker {
  pub fn new(
    walk_spec: WalkSpec,
    transform_spec: Option<TransformSpec>,
    options: WalkOptions,
  ) -> Self {
    Self {
      walk_spec,
      transform_spec,
      options,
    }
  }

  pub fn options(&self) -> &WalkOptions {
    &self.options
  }

  #[instrument(level = "debug", skip_all)]
  pub fn run(&self, source: &Document) -> Vec<Record> {
    let records = walk(
      &self.walk_spec,
      self.transform_spec.as_ref(),
      source,
      &self.options,
    );
    info!(records = records.len(), "walk completed");
    records
  }
}
