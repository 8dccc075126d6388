//! Interactive recording session: capture, play back, keep / retry / skip, optionally stop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, instrument, warn};

use super::pipeline::{ArtifactPaths, AudioPipeline};
use super::plan::{Action, PlannedJob};
use super::prompt::Prompter;
use super::RecorderConfig;
use crate::error::RecordError;
use crate::types::RecordingJob;

const CONFIRM_QUESTION: &str = "What should I do with this sound?";
const CONFIRM_OPTIONS: [&str; 3] = ["Keep it", "Try again", "Skip it"];
const STOP_QUESTION: &str = "Stop recording?";
const STOP_OPTIONS: [&str; 2] = ["yes", "no"];

/// Counts of what happened during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
  /// Captures performed (a retried job counts once per capture).
  pub captures: usize,
  /// Jobs whose sound was kept.
  pub kept: usize,
  /// Jobs the user skipped (their artifacts were removed).
  pub skipped: usize,
  /// Jobs abandoned by Ctrl-C during capture or playback.
  pub interrupted: usize,
  /// Jobs left alone because their sound already existed.
  pub untouched: usize,
  /// The user asked to stop before the plan was finished.
  pub stopped: bool,
}

/// How the confirm loop ended for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
  Kept,
  Skipped,
}

/// Runs a recording plan against an [AudioPipeline] and a [Prompter].
pub struct Session<'a, A, P> {
  config: &'a RecorderConfig,
  pipeline: A,
  prompter: P,
  interrupt: Arc<AtomicBool>,
}

impl<'a, A: AudioPipeline, P: Prompter> Session<'a, A, P> {
  pub fn new(config: &'a RecorderConfig, pipeline: A, prompter: P) -> Self {
    Self {
      config,
      pipeline,
      prompter,
      interrupt: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Uses `flag` (set by a Ctrl-C handler) to abandon the current job.
  pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
    self.interrupt = flag;
    self
  }

  pub fn into_parts(self) -> (A, P) {
    (self.pipeline, self.prompter)
  }

  /// Processes `planned` in order. Capture and prompt errors abort the session unless they were
  /// caused by an interrupt, which abandons the job and asks whether to stop.
  #[instrument(level = "debug", skip_all, fields(jobs = planned.len()))]
  pub fn run(&mut self, planned: &[PlannedJob]) -> Result<SessionReport, RecordError> {
    let mut report = SessionReport::default();
    for item in planned {
      let paths = ArtifactPaths::new(&self.config.destination, &item.job.base_name());
      let outcome = match item.action {
        Action::Skip => {
          report.untouched += 1;
          continue;
        }
        Action::Record => self
          .capture(&item.job, &paths, &mut report)
          .and_then(|()| self.confirm(&item.job, &paths, &mut report)),
        Action::Recheck => {
          info!(filename = %item.job.filename, "checking existing sound");
          self.confirm(&item.job, &paths, &mut report)
        }
      };
      let interrupted = self.interrupt.swap(false, Ordering::SeqCst);
      let ask_stop = match outcome {
        Ok(Verdict::Kept) => {
          report.kept += 1;
          interrupted
        }
        Ok(Verdict::Skipped) => {
          report.skipped += 1;
          true
        }
        Err(e) if interrupted => {
          warn!(filename = %item.job.filename, error = %e, "interrupted");
          if let Err(cleanup) = paths.remove_artifacts() {
            warn!(error = %cleanup, "could not remove partial capture");
          }
          report.interrupted += 1;
          true
        }
        Err(e) => return Err(e),
      };
      if ask_stop && self.prompter.choose(STOP_QUESTION, &STOP_OPTIONS)? == 0 {
        info!("recording stopped by user");
        report.stopped = true;
        break;
      }
    }
    Ok(report)
  }

  /// Fails with [RecordError::Interrupted] once Ctrl-C was pressed.
  fn check_interrupt(&self) -> Result<(), RecordError> {
    if self.interrupt.load(Ordering::SeqCst) {
      Err(RecordError::Interrupted)
    } else {
      Ok(())
    }
  }

  fn capture(
    &mut self,
    job: &RecordingJob,
    paths: &ArtifactPaths,
    report: &mut SessionReport,
  ) -> Result<(), RecordError> {
    info!("{}", job.announcement());
    let captured = self.pipeline.capture(job, paths);
    self.check_interrupt()?;
    captured?;
    report.captures += 1;
    Ok(())
  }

  /// Plays the sound and asks until the user keeps or skips it.
  fn confirm(
    &mut self,
    job: &RecordingJob,
    paths: &ArtifactPaths,
    report: &mut SessionReport,
  ) -> Result<Verdict, RecordError> {
    loop {
      info!(file = %paths.encoded.display(), "checking sound");
      if let Err(e) = self.pipeline.play(paths) {
        warn!(error = %e, "playback failed");
      }
      self.check_interrupt()?;
      match self.prompter.choose(CONFIRM_QUESTION, &CONFIRM_OPTIONS)? {
        0 => return Ok(Verdict::Kept),
        1 => {
          paths.remove_artifacts()?;
          self.capture(job, paths, report)?;
        }
        _ => {
          paths.remove_artifacts()?;
          return Ok(Verdict::Skipped);
        }
      }
    }
  }
}
