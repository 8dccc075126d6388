//! Decide, per job, whether to record, recheck, or leave an existing sound alone.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, instrument};

use crate::types::{RecordingJob, base_name};

/// What the session does with one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  /// No artifact yet: capture, then confirm.
  Record,
  /// Artifact exists and rechecking was requested: confirm (and maybe re-record).
  Recheck,
  /// Artifact exists: leave it.
  Skip,
}

/// A job paired with its planned action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedJob {
  pub job: RecordingJob,
  pub action: Action,
}

/// Base names (relative to `dir`, `/`-separated) of every regular file under `dir`.
#[instrument(level = "trace")]
pub fn existing_artifacts(dir: &Path) -> io::Result<BTreeSet<String>> {
  let mut found = BTreeSet::new();
  collect_artifacts(dir, "", &mut found)?;
  Ok(found)
}

fn collect_artifacts(dir: &Path, prefix: &str, found: &mut BTreeSet<String>) -> io::Result<()> {
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let name = entry.file_name().to_string_lossy().into_owned();
    let file_type = entry.file_type()?;
    if file_type.is_dir() {
      collect_artifacts(&entry.path(), &format!("{}{}/", prefix, name), found)?;
    } else if file_type.is_file() {
      found.insert(base_name(&format!("{}{}", prefix, name)));
    }
  }
  Ok(())
}

/// Assigns an [Action] to every job, preserving job order.
pub fn plan(jobs: Vec<RecordingJob>, existing: &BTreeSet<String>, recheck: bool) -> Vec<PlannedJob> {
  jobs
    .into_iter()
    .map(|job| {
      let action = match (existing.contains(&job.base_name()), recheck) {
        (false, _) => Action::Record,
        (true, true) => Action::Recheck,
        (true, false) => Action::Skip,
      };
      debug!(filename = %job.filename, action = ?action, "planned");
      PlannedJob { job, action }
    })
    .collect()
}
