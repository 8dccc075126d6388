//! Turn one leaf node (plus its ancestors) into an output record.

use tracing::{debug, instrument};

use crate::resolver::resolve;
use crate::types::{Mapping, Record, TransformSpec};
use crate::walker::WalkOptions;

/// Outcome of transforming one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed {
  /// Every required field resolved.
  Record(Record),
  /// A required field did not resolve; the node produces no output.
  Suppressed { missing: String },
}

impl Transformed {
  pub fn into_record(self) -> Option<Record> {
    match self {
      Transformed::Record(r) => Some(r),
      Transformed::Suppressed { .. } => None,
    }
  }

  pub fn is_suppressed(&self) -> bool {
    matches!(self, Transformed::Suppressed { .. })
  }
}

/// Resolves every field of `spec` along `chain` (`chain[0]` is the node being transformed,
/// followed by its ancestors nearest-first) and checks the required fields.
#[instrument(level = "trace", skip_all)]
pub fn transform(chain: &[&Mapping], spec: &TransformSpec, options: &WalkOptions) -> Transformed {
  let mut output = Record::new();
  for field in spec.fields() {
    if let Some(value) = resolve(chain, &field.candidates, options.resolve_order) {
      output.insert(field.output.clone(), value.clone());
    }
  }

  let result = match options
    .required
    .iter()
    .find(|name| !output.contains_key(name))
  {
    Some(missing) => Transformed::Suppressed {
      missing: missing.clone(),
    },
    None => Transformed::Record(output),
  };

  if options.debug {
    trace_transform(chain, &result);
  }
  result
}

/// Debug trace of one transform decision: source node, ancestor keys, outcome.
fn trace_transform(chain: &[&Mapping], result: &Transformed) {
  let source = chain.first().map(|n| n.to_string()).unwrap_or_default();
  let ancestors: Vec<Vec<&str>> = chain
    .iter()
    .skip(1)
    .map(|m| m.keys().collect())
    .collect();
  match result {
    Transformed::Record(r) => {
      debug!(source = %source, ancestors = ?ancestors, output = %r, "transform");
    }
    Transformed::Suppressed { missing } => {
      debug!(source = %source, ancestors = ?ancestors, missing = %missing, "transform suppressed");
    }
  }
}
