//! A walk output record, typed for the recording stage.

use crate::error::RecordError;

use super::{Document, Record};

/// Strips everything from the first `.` of the final path component.
///
/// `birds/owl.hoot.mp3` becomes `birds/owl`; a name without an extension is unchanged.
pub fn base_name(filename: &str) -> String {
  let filename = filename.trim_start_matches("./");
  let (dir, file) = match filename.rfind('/') {
    Some(i) => filename.split_at(i + 1),
    None => ("", filename),
  };
  let stem = file.split_once('.').map_or(file, |(stem, _)| stem);
  format!("{}{}", dir, stem)
}

/// One sound to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingJob {
  /// Target file name; only its base name is used on disk.
  pub filename: String,
  pub description: Option<String>,
  pub context: Option<String>,
  /// `sox` effect arguments overriding the configured default.
  pub trim: Option<String>,
  /// `arecord` arguments overriding the configured default.
  pub record: Option<String>,
}

impl RecordingJob {
  pub fn new(filename: impl Into<String>) -> Self {
    Self {
      filename: filename.into(),
      description: None,
      context: None,
      trim: None,
      record: None,
    }
  }

  pub fn base_name(&self) -> String {
    base_name(&self.filename)
  }

  /// Human-readable line announcing the recording.
  pub fn announcement(&self) -> String {
    let mut parts = vec![format!("Recording sound file '{}.mp3'", self.base_name())];
    if let Some(d) = &self.description {
      parts.push(format!("as in '{}'", d));
    }
    if let Some(c) = &self.context {
      parts.push(format!("with context '{}'", c));
    }
    parts.join(" ")
  }
}

/// `.hidden` and `birds/` have nothing left to name an artifact with.
fn has_stem(base: &str) -> bool {
  !base.is_empty() && !base.ends_with('/')
}

fn text_field(record: &Record, key: &str) -> Option<String> {
  record
    .get(key)
    .filter(|v| v.is_truthy())
    .and_then(Document::as_scalar)
    .map(|s| s.to_string())
}

impl TryFrom<&Record> for RecordingJob {
  type Error = RecordError;

  fn try_from(record: &Record) -> Result<Self, Self::Error> {
    let filename = text_field(record, "filename")
      .filter(|f| has_stem(&base_name(f)))
      .ok_or(RecordError::MissingFilename)?;
    Ok(Self {
      filename,
      description: text_field(record, "description"),
      context: text_field(record, "context"),
      trim: text_field(record, "trim"),
      record: text_field(record, "record"),
    })
  }
}
