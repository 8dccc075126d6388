//! Recording stage: decide which jobs need recording, capture audio, ask the user to confirm.
//!
//! - [plan]: compare jobs with artifacts already in the destination directory.
//! - [Session]: run the plan, driving an [AudioPipeline] and a [Prompter].
//! - [SoxPipeline] / [TerminalPrompter]: the real `arecord`/`sox`/`lame` pipeline and terminal.

mod pipeline;
mod plan;
mod prompt;
mod session;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{instrument, warn};

use crate::error::RecordError;
use crate::types::{Record, RecordingJob};

pub use pipeline::{ArtifactPaths, AudioPipeline, AudioTools, SoxPipeline, split_params};
pub use plan::{Action, PlannedJob, existing_artifacts, plan};
pub use prompt::{Prompter, TerminalPrompter};
pub use session::{Session, SessionReport};

/// Default `arecord` arguments: five seconds of CD-quality audio.
pub const DEFAULT_RECORD_PARAMS: &str = "-d 5 -f cd";
/// Default `sox` effect: trim leading and trailing silence.
pub const DEFAULT_TRIM_PARAMS: &str = "silence -l 1 0.3 1% -1 0.5 5%";
/// Encoded files smaller than this are treated as failed captures.
pub const MIN_ARTIFACT_SIZE: u64 = 600;
/// Captures attempted per job before giving up on a too-small file.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Configuration for the recording stage.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
  /// Directory that receives the encoded sounds.
  pub destination: PathBuf,
  /// Re-confirm sounds that already exist instead of skipping them.
  pub recheck: bool,
  pub record_params: String,
  pub trim_params: String,
  pub max_attempts: u32,
  pub min_size: u64,
  pub tools: AudioTools,
}

impl Default for RecorderConfig {
  fn default() -> Self {
    Self {
      destination: PathBuf::from("."),
      recheck: false,
      record_params: DEFAULT_RECORD_PARAMS.to_string(),
      trim_params: DEFAULT_TRIM_PARAMS.to_string(),
      max_attempts: DEFAULT_MAX_ATTEMPTS,
      min_size: MIN_ARTIFACT_SIZE,
      tools: AudioTools::default(),
    }
  }
}

/// Converts walk records into jobs; records without a usable filename are skipped with a warning.
pub fn recording_jobs(records: &[Record]) -> Vec<RecordingJob> {
  records
    .iter()
    .filter_map(|record| match RecordingJob::try_from(record) {
      Ok(job) => Some(job),
      Err(e) => {
        warn!(record = %record, error = %e, "skipping record");
        None
      }
    })
    .collect()
}

/// Plans and records `jobs` interactively with the real audio pipeline and terminal.
///
/// Ctrl-C interrupts the current job and asks whether to stop, instead of killing the process.
#[instrument(level = "debug", skip(jobs, config), fields(jobs = jobs.len()))]
pub fn record_jobs(
  jobs: Vec<RecordingJob>,
  config: &RecorderConfig,
) -> Result<SessionReport, RecordError> {
  let existing = existing_artifacts(&config.destination)?;
  let planned = plan(jobs, &existing, config.recheck);

  let interrupt = Arc::new(AtomicBool::new(false));
  let flag = Arc::clone(&interrupt);
  if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
    warn!(error = %e, "Ctrl-C handler not installed");
  }

  let pipeline = SoxPipeline::from_config(config);
  let mut session =
    Session::new(config, pipeline, TerminalPrompter::stdio()).with_interrupt(interrupt);
  session.run(&planned)
}
