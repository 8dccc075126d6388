//! Transform spec: output field name to one or more candidate input keys.

use crate::error::SpecError;

use super::{Document, Mapping};

/// One output field and the input keys that may supply it, tried in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformField {
  pub output: String,
  pub candidates: Vec<String>,
}

/// Ordered list of output fields; records list their fields in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSpec {
  fields: Vec<TransformField>,
}

impl TransformSpec {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an output field resolved from the given candidate keys.
  pub fn field<I, S>(mut self, output: impl Into<String>, candidates: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.fields.push(TransformField {
      output: output.into(),
      candidates: candidates.into_iter().map(Into::into).collect(),
    });
    self
  }

  pub fn fields(&self) -> &[TransformField] {
    &self.fields
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  /// Builds a transform spec from a decoded mapping document.
  pub fn from_document(doc: &Document) -> Result<Self, SpecError> {
    let mapping = doc.as_mapping().ok_or(SpecError::TransformShape { found: doc.kind() })?;
    parse_fields(mapping)
  }

  /// Like [TransformSpec::from_document], but null or an empty mapping means "no transform":
  /// leaves then pass through unchanged.
  pub fn optional_from_document(doc: &Document) -> Result<Option<Self>, SpecError> {
    if doc.is_null() {
      return Ok(None);
    }
    let spec = Self::from_document(doc)?;
    Ok(if spec.is_empty() { None } else { Some(spec) })
  }
}

impl TryFrom<&Document> for TransformSpec {
  type Error = SpecError;

  fn try_from(doc: &Document) -> Result<Self, Self::Error> {
    TransformSpec::from_document(doc)
  }
}

fn parse_fields(mapping: &Mapping) -> Result<TransformSpec, SpecError> {
  let mut spec = TransformSpec::new();
  for (output, value) in mapping.iter() {
    let candidates = match value {
      Document::Sequence(items) => items
        .iter()
        .map(|item| candidate_key(output, item))
        .collect::<Result<Vec<_>, _>>()?,
      single => vec![candidate_key(output, single)?],
    };
    spec = spec.field(output, candidates);
  }
  Ok(spec)
}

/// Scalar candidates are stringified the same way document keys are.
fn candidate_key(field: &str, doc: &Document) -> Result<String, SpecError> {
  match doc.as_scalar() {
    Some(s) if !doc.is_null() => Ok(s.to_string()),
    _ => Err(SpecError::TransformCandidate {
      field: field.to_string(),
      found: doc.kind(),
    }),
  }
}
