//! Untyped source tree: every node is a mapping, a sequence, or a scalar.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Scalar leaf value of a [Document].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
}

impl Scalar {
  /// Falsy-as-absent policy: null, `false`, zero and the empty string are not truthy.
  ///
  /// A legitimately-zero numeric attribute is therefore treated as missing during
  /// attribute resolution.
  pub fn is_truthy(&self) -> bool {
    match self {
      Scalar::Null => false,
      Scalar::Bool(b) => *b,
      Scalar::Int(i) => *i != 0,
      Scalar::Float(f) => *f != 0.0,
      Scalar::String(s) => !s.is_empty(),
    }
  }
}

impl fmt::Display for Scalar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Scalar::Null => write!(f, "null"),
      Scalar::Bool(b) => write!(f, "{}", b),
      Scalar::Int(i) => write!(f, "{}", i),
      Scalar::Float(x) => write!(f, "{}", x),
      Scalar::String(s) => f.write_str(s),
    }
  }
}

/// A node of the source document (or of a walk/transform spec before it is typed).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
  Mapping(Mapping),
  Sequence(Vec<Document>),
  Scalar(Scalar),
}

impl Document {
  pub fn null() -> Self {
    Document::Scalar(Scalar::Null)
  }

  pub fn as_mapping(&self) -> Option<&Mapping> {
    match self {
      Document::Mapping(m) => Some(m),
      _ => None,
    }
  }

  pub fn as_sequence(&self) -> Option<&[Document]> {
    match self {
      Document::Sequence(items) => Some(items),
      _ => None,
    }
  }

  pub fn as_scalar(&self) -> Option<&Scalar> {
    match self {
      Document::Scalar(s) => Some(s),
      _ => None,
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Document::Scalar(Scalar::Null))
  }

  /// Truthiness used by attribute resolution; empty collections are falsy.
  pub fn is_truthy(&self) -> bool {
    match self {
      Document::Mapping(m) => !m.is_empty(),
      Document::Sequence(items) => !items.is_empty(),
      Document::Scalar(s) => s.is_truthy(),
    }
  }

  /// Short name of the node shape, for diagnostics.
  pub fn kind(&self) -> &'static str {
    match self {
      Document::Mapping(_) => "mapping",
      Document::Sequence(_) => "sequence",
      Document::Scalar(Scalar::Null) => "null",
      Document::Scalar(Scalar::Bool(_)) => "bool",
      Document::Scalar(Scalar::Int(_)) => "integer",
      Document::Scalar(Scalar::Float(_)) => "float",
      Document::Scalar(Scalar::String(_)) => "string",
    }
  }
}

impl fmt::Display for Document {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
    f.write_str(&json)
  }
}

impl From<Scalar> for Document {
  fn from(s: Scalar) -> Self {
    Document::Scalar(s)
  }
}

impl From<Mapping> for Document {
  fn from(m: Mapping) -> Self {
    Document::Mapping(m)
  }
}

impl From<Vec<Document>> for Document {
  fn from(items: Vec<Document>) -> Self {
    Document::Sequence(items)
  }
}

impl From<&str> for Document {
  fn from(s: &str) -> Self {
    Document::Scalar(Scalar::String(s.to_string()))
  }
}

impl From<String> for Document {
  fn from(s: String) -> Self {
    Document::Scalar(Scalar::String(s))
  }
}

impl From<i64> for Document {
  fn from(i: i64) -> Self {
    Document::Scalar(Scalar::Int(i))
  }
}

impl From<f64> for Document {
  fn from(x: f64) -> Self {
    Document::Scalar(Scalar::Float(x))
  }
}

impl From<bool> for Document {
  fn from(b: bool) -> Self {
    Document::Scalar(Scalar::Bool(b))
  }
}

/// Insertion-ordered string-keyed mapping.
///
/// Inserting an existing key replaces its value and keeps the key's position. Equality ignores
/// order, as for any map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Mapping {
  entries: IndexMap<String, Document>,
}

impl Mapping {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<&Document> {
    self.entries.get(key)
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  /// Inserts `value` under `key`, returning the replaced value if the key was present.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Document>) -> Option<Document> {
    self.entries.insert(key.into(), value.into())
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<K: Into<String>, V: Into<Document>> FromIterator<(K, V)> for Mapping {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}

impl fmt::Display for Mapping {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
    f.write_str(&json)
  }
}
