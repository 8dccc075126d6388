//! YAML loader for source documents and walk/transform specs.
//!
//! Non-string keys are stringified, tags are dropped (the tagged value is kept).

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::instrument;

use crate::error::LoadError;
use crate::types::{Document, Mapping, Scalar};

/// Parses YAML text into a [Document]. Empty input is a null document.
#[instrument(level = "trace", skip(source))]
pub fn parse_document(source: &str) -> Result<Document, LoadError> {
  if source.trim().is_empty() {
    return Ok(Document::null());
  }
  let value: Value = serde_yaml::from_str(source)?;
  from_yaml(value)
}

/// Reads and parses a YAML file.
#[instrument(level = "trace")]
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
  let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  parse_document(&text)
}

/// Converts a decoded YAML value into a [Document].
pub(crate) fn from_yaml(value: Value) -> Result<Document, LoadError> {
  Ok(match value {
    Value::Null => Document::null(),
    Value::Bool(b) => Document::from(b),
    Value::Number(n) => Document::Scalar(number_scalar(&n)),
    Value::String(s) => Document::from(s),
    Value::Sequence(items) => Document::Sequence(
      items
        .into_iter()
        .map(from_yaml)
        .collect::<Result<Vec<_>, _>>()?,
    ),
    Value::Mapping(m) => {
      let mut out = Mapping::new();
      for (k, v) in m {
        out.insert(key_string(k)?, from_yaml(v)?);
      }
      Document::Mapping(out)
    }
    Value::Tagged(tagged) => from_yaml(tagged.value)?,
  })
}

/// Integers that fit `i64` stay integers; everything else becomes a float.
pub(crate) fn number_scalar(n: &serde_yaml::Number) -> Scalar {
  match (n.as_i64(), n.as_f64()) {
    (Some(i), _) => Scalar::Int(i),
    (None, Some(x)) => Scalar::Float(x),
    (None, None) => Scalar::String(n.to_string()),
  }
}

/// Canonical string form of a scalar YAML key.
pub(crate) fn key_string(key: Value) -> Result<String, LoadError> {
  match key {
    Value::String(s) => Ok(s),
    Value::Null => Ok("null".to_string()),
    Value::Bool(b) => Ok(b.to_string()),
    Value::Number(n) => Ok(number_scalar(&n).to_string()),
    Value::Tagged(tagged) => key_string(tagged.value),
    Value::Sequence(_) => Err(LoadError::UnsupportedKey("sequence")),
    Value::Mapping(_) => Err(LoadError::UnsupportedKey("mapping")),
  }
}
