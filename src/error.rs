//! Error types for loading, spec validation and recording.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn YAML text or a file into a [crate::Document].
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("invalid YAML: {0}")]
  Yaml(#[from] serde_yaml::Error),
  #[error("unsupported mapping key ({0}): keys must be scalars")]
  UnsupportedKey(&'static str),
}

/// A walk or transform spec that does not have the expected shape.
#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
  #[error("walk spec at `{path}` must be a mapping or empty, found {found}")]
  WalkShape { path: String, found: &'static str },
  #[error("transform spec must be a mapping, found {found}")]
  TransformShape { found: &'static str },
  #[error(
    "transform field `{field}` must name an input key or a list of input keys, found {found}"
  )]
  TransformCandidate { field: String, found: &'static str },
}

/// Failure in the recording stage.
#[derive(Debug, Error)]
pub enum RecordError {
  #[error("record has no usable `filename` field")]
  MissingFilename,
  #[error("`{program}` failed: {reason}")]
  Command { program: String, reason: String },
  #[error("{} is only {size} bytes after {attempts} attempts", path.display())]
  TooSmall {
    path: PathBuf,
    size: u64,
    attempts: u32,
  },
  #[error("interrupted")]
  Interrupted,
  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Top-level error for a soundwalk run.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Load(#[from] LoadError),
  #[error(transparent)]
  Spec(#[from] SpecError),
  #[error(transparent)]
  Record(#[from] RecordError),
  #[error("failed to encode job: {0}")]
  Output(#[from] serde_json::Error),
  #[error("{} is not a readable directory", .0.display())]
  Directory(PathBuf),
}
