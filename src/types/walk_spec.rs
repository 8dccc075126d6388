//! Walk spec: ordered keys to descend into, each with its own nested walk spec.

use crate::error::SpecError;

use super::Document;

/// Ordered description of which keys hold children, level by level.
///
/// An empty walk spec means the walk is exhausted at this depth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkSpec {
  steps: Vec<(String, WalkSpec)>,
}

impl WalkSpec {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a descent step; keys are visited in the order they were added.
  pub fn step(mut self, key: impl Into<String>, sub: WalkSpec) -> Self {
    self.steps.push((key.into(), sub));
    self
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn steps(&self) -> impl Iterator<Item = (&str, &WalkSpec)> {
    self.steps.iter().map(|(k, w)| (k.as_str(), w))
  }

  /// Builds a walk spec from a decoded document.
  ///
  /// Mappings nest; null (or an empty mapping) ends the walk. Anything else is malformed.
  pub fn from_document(doc: &Document) -> Result<Self, SpecError> {
    parse_level(doc, "")
  }
}

impl TryFrom<&Document> for WalkSpec {
  type Error = SpecError;

  fn try_from(doc: &Document) -> Result<Self, Self::Error> {
    WalkSpec::from_document(doc)
  }
}

fn parse_level(doc: &Document, path: &str) -> Result<WalkSpec, SpecError> {
  match doc {
    Document::Mapping(m) => {
      let mut spec = WalkSpec::new();
      for (key, sub) in m.iter() {
        let sub_path = if path.is_empty() {
          key.to_string()
        } else {
          format!("{}.{}", path, key)
        };
        spec = spec.step(key, parse_level(sub, &sub_path)?);
      }
      Ok(spec)
    }
    d if d.is_null() => Ok(WalkSpec::new()),
    other => Err(SpecError::WalkShape {
      path: if path.is_empty() {
        "<root>".to_string()
      } else {
        path.to_string()
      },
      found: other.kind(),
    }),
  }
}
