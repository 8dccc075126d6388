//! Audio capture and playback through external programs.
//!
//! Capture: `arecord` into `<base>.tmp.wav`, `sox` trims it into `<base>.trim.wav`, `lame`
//! encodes `<base>.mp3`. Repeated while the mp3 is smaller than the configured minimum.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, instrument, trace, warn};

use super::RecorderConfig;
use crate::error::RecordError;
use crate::types::RecordingJob;

/// Files produced while recording one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
  /// `<destination>/<base>` without extension.
  pub base: PathBuf,
  pub raw: PathBuf,
  pub trimmed: PathBuf,
  pub encoded: PathBuf,
}

impl ArtifactPaths {
  pub fn new(destination: &Path, base_name: &str) -> Self {
    let base = destination.join(base_name);
    let with_suffix = |suffix: &str| {
      let mut s = base.clone().into_os_string();
      s.push(suffix);
      PathBuf::from(s)
    };
    Self {
      raw: with_suffix(".tmp.wav"),
      trimmed: with_suffix(".trim.wav"),
      encoded: with_suffix(".mp3"),
      base,
    }
  }

  /// Removes every file named `<base>.*` next to the base path. Returns how many were removed.
  pub fn remove_artifacts(&self) -> io::Result<usize> {
    let (Some(dir), Some(stem)) = (self.base.parent(), self.base.file_name()) else {
      return Ok(0);
    };
    let prefix = format!("{}.", stem.to_string_lossy());
    let entries = match fs::read_dir(if dir.as_os_str().is_empty() { Path::new(".") } else { dir }) {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
      Err(e) => return Err(e),
    };
    let mut removed = 0;
    for entry in entries {
      let entry = entry?;
      if entry.file_type()?.is_file() && entry.file_name().to_string_lossy().starts_with(&prefix) {
        fs::remove_file(entry.path())?;
        removed += 1;
      }
    }
    trace!(base = %self.base.display(), removed, "removed artifacts");
    Ok(removed)
  }
}

/// Capture and playback backend used by a [super::Session].
pub trait AudioPipeline {
  /// Records `job` into `paths.encoded`.
  fn capture(&mut self, job: &RecordingJob, paths: &ArtifactPaths) -> Result<(), RecordError>;

  /// Plays back `paths.encoded`.
  fn play(&mut self, paths: &ArtifactPaths) -> Result<(), RecordError>;
}

/// Splits a parameter string on whitespace.
pub fn split_params(params: &str) -> Vec<OsString> {
  params.split_whitespace().map(OsString::from).collect()
}

/// Runs `program` with `args`, mapping spawn failures and non-zero exits to [RecordError::Command].
#[instrument(level = "trace", skip(args))]
pub(crate) fn run_command(program: &str, args: &[OsString], quiet: bool) -> Result<(), RecordError> {
  let mut cmd = Command::new(program);
  cmd.args(args).stdin(Stdio::null());
  if quiet {
    cmd.stdout(Stdio::null()).stderr(Stdio::null());
  }
  let status = cmd.status().map_err(|e| RecordError::Command {
    program: program.to_string(),
    reason: format!("spawn: {}", e),
  })?;
  if status.success() {
    Ok(())
  } else {
    Err(RecordError::Command {
      program: program.to_string(),
      reason: status
        .code()
        .map(|c| format!("exit {}", c))
        .unwrap_or_else(|| "terminated by signal".to_string()),
    })
  }
}

/// Programs run by [SoxPipeline]; names are looked up on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTools {
  pub arecord: String,
  pub sox: String,
  pub lame: String,
  pub mpg123: String,
}

impl Default for AudioTools {
  fn default() -> Self {
    Self {
      arecord: "arecord".to_string(),
      sox: "sox".to_string(),
      lame: "lame".to_string(),
      mpg123: "mpg123".to_string(),
    }
  }
}

/// `arecord` + `sox` + `lame` capture, `mpg123` playback.
#[derive(Debug, Clone)]
pub struct SoxPipeline {
  pub record_params: String,
  pub trim_params: String,
  pub max_attempts: u32,
  pub min_size: u64,
  pub tools: AudioTools,
}

impl SoxPipeline {
  pub fn from_config(config: &RecorderConfig) -> Self {
    Self {
      record_params: config.record_params.clone(),
      trim_params: config.trim_params.clone(),
      max_attempts: config.max_attempts,
      min_size: config.min_size,
      tools: config.tools.clone(),
    }
  }

  fn capture_once(&self, job: &RecordingJob, paths: &ArtifactPaths) -> Result<u64, RecordError> {
    let record = job.record.as_deref().unwrap_or(&self.record_params);
    let trim = job.trim.as_deref().unwrap_or(&self.trim_params);

    let mut arecord = split_params(record);
    arecord.push(paths.raw.clone().into_os_string());
    run_command(&self.tools.arecord, &arecord, false)?;

    let mut sox = vec![
      paths.raw.clone().into_os_string(),
      paths.trimmed.clone().into_os_string(),
    ];
    sox.extend(split_params(trim));
    run_command(&self.tools.sox, &sox, false)?;

    let lame = vec![
      OsString::from("-V"),
      OsString::from("1"),
      paths.trimmed.clone().into_os_string(),
      paths.encoded.clone().into_os_string(),
    ];
    run_command(&self.tools.lame, &lame, true)?;

    Ok(fs::metadata(&paths.encoded)?.len())
  }

  /// Captures until the encoded file reaches `min_size`; returns the attempts used.
  fn capture_until_large_enough(
    &self,
    job: &RecordingJob,
    paths: &ArtifactPaths,
  ) -> Result<u32, RecordError> {
    let mut size = 0;
    let mut attempts = 0;
    while size < self.min_size {
      if attempts >= self.max_attempts {
        return Err(RecordError::TooSmall {
          path: paths.encoded.clone(),
          size,
          attempts,
        });
      }
      attempts += 1;
      size = self.capture_once(job, paths)?;
      debug!(attempt = attempts, size, "captured");
    }
    Ok(attempts)
  }
}

/// Removes a file, ignoring one that does not exist.
fn remove_if_present(path: &Path) -> io::Result<()> {
  match fs::remove_file(path) {
    Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
    _ => Ok(()),
  }
}

impl AudioPipeline for SoxPipeline {
  /// A failed capture leaves no `<base>.*` file behind, so the job is planned again next run.
  #[instrument(level = "debug", skip(self, job), fields(encoded = %paths.encoded.display()))]
  fn capture(&mut self, job: &RecordingJob, paths: &ArtifactPaths) -> Result<(), RecordError> {
    if let Some(parent) = paths.encoded.parent() {
      fs::create_dir_all(parent)?;
    }
    match self.capture_until_large_enough(job, paths) {
      Ok(_) => {
        remove_if_present(&paths.raw)?;
        remove_if_present(&paths.trimmed)?;
        Ok(())
      }
      Err(e) => {
        if let Err(cleanup) = paths.remove_artifacts() {
          warn!(error = %cleanup, "could not remove partial capture");
        }
        Err(e)
      }
    }
  }

  fn play(&mut self, paths: &ArtifactPaths) -> Result<(), RecordError> {
    run_command(
      &self.tools.mpg123,
      &[paths.encoded.clone().into_os_string()],
      true,
    )
  }
}
