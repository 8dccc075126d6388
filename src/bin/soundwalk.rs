//! CLI: walk a YAML sound catalogue into recording jobs and record them.
//!
//! Usage: `soundwalk [OPTIONS] <source.yaml>`
//! Example: soundwalk animals.yaml -w '{groups: {sounds: {}}}' -t '{filename: name, description: [say, name]}'
//!
//! Set RUST_LOG=soundwalk=trace for TRACE-level events.

use clap::Parser;
use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use soundwalk::{
  Document, Error, Record, RecorderConfig, ResolutionOrder, TransformSpec, WalkOptions, WalkSpec,
  Walker, load_document, parse_document, record_jobs, recording_jobs,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Walk a YAML sound catalogue into recording jobs and record them.
#[derive(Parser, Debug)]
#[command(name = "soundwalk")]
#[command(
  after_help = r#"Walk and transform specs:
  --walk      {<input key>: {...}}   keys to descend into, visited in order, depth first
  --transform {<output field>: <input key> | [<input key>, ...]}
              Fields are resolved on the leaf first, then on each ancestor.
              Leaves missing a --require'd field are dropped.
              A walked node whose children produce nothing is transformed itself.

Environment variables (override --record-params and --trim-params when set):
  SOUNDWALK_RECORD_PARAMS   arecord arguments (default: -d 5 -f cd)
  SOUNDWALK_TRIM_PARAMS     sox effect arguments (default: silence -l 1 0.3 1% -1 0.5 5%)

Examples:
  soundwalk animals.yaml --dry-run -w '{groups: {sounds: {}}}' -t '{filename: name}'
  soundwalk animals.yaml -d sounds/ --check -w '{groups: {}}' -t '{filename: [file, name]}'"#
)]
struct Args {
  /// Source file describing the sounds to record
  #[arg(value_name = "source.yaml")]
  source: PathBuf,

  /// Walk spec (inline YAML): which keys to descend into
  #[arg(short, long, value_name = "YAML")]
  walk: Option<String>,

  /// Transform spec (inline YAML): output field to input key(s). Without it leaves pass through.
  #[arg(short, long, value_name = "YAML")]
  transform: Option<String>,

  /// Output field every job must have (repeatable). An empty value disables the requirement.
  #[arg(long = "require", value_name = "FIELD", default_value = "filename")]
  required: Vec<String>,

  /// How candidate keys and ancestors nest when resolving a field
  #[arg(long, value_name = "ORDER", default_value_t = ResolutionOrder::NearestNode)]
  resolve_order: ResolutionOrder,

  /// Re-check sounds that already exist in the destination directory
  #[arg(short, long)]
  check: bool,

  /// Directory to record sounds to
  #[arg(short, long, value_name = "DIR", default_value = ".")]
  directory: PathBuf,

  /// Print every transform decision and the resulting jobs
  #[arg(long)]
  debug: bool,

  /// Don't record anything, just print the jobs (one JSON object per line)
  #[arg(long)]
  dry_run: bool,

  /// arecord arguments. Overridden by SOUNDWALK_RECORD_PARAMS if set.
  #[arg(long, value_name = "PARAMS", default_value = soundwalk::recorder::DEFAULT_RECORD_PARAMS)]
  record_params: String,

  /// sox effect arguments. Overridden by SOUNDWALK_TRIM_PARAMS if set.
  #[arg(long, value_name = "PARAMS", default_value = soundwalk::recorder::DEFAULT_TRIM_PARAMS)]
  trim_params: String,

  /// Captures per sound before giving up on a too-small file
  #[arg(long, value_name = "N", default_value_t = soundwalk::recorder::DEFAULT_MAX_ATTEMPTS)]
  max_attempts: u32,
}

fn main() {
  let args = Args::parse();

  let default_filter = if args.debug || args.dry_run {
    "soundwalk=debug"
  } else {
    "info"
  };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
    )
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .init();

  if let Err(e) = run(args) {
    eprintln!("Error: {}", e);
    process::exit(1);
  }
}

/// Parses an optional inline YAML spec; absent means a null document.
fn inline_spec(yaml: Option<&str>) -> Result<Document, Error> {
  Ok(match yaml {
    Some(text) => parse_document(text)?,
    None => Document::null(),
  })
}

fn print_jobs(records: &[Record]) -> Result<(), Error> {
  for record in records {
    println!("{}", serde_json::to_string(record)?);
  }
  Ok(())
}

fn run(args: Args) -> Result<(), Error> {
  if !args.dry_run && !args.directory.is_dir() {
    return Err(Error::Directory(args.directory));
  }

  let source = load_document(&args.source)?;
  let walk_spec = WalkSpec::from_document(&inline_spec(args.walk.as_deref())?)?;
  let transform_spec = TransformSpec::optional_from_document(&inline_spec(args.transform.as_deref())?)?;

  let options = WalkOptions::new()
    .with_required(args.required.iter().filter(|f| !f.is_empty()).cloned())
    .resolve_order(args.resolve_order)
    .debug(args.debug || args.dry_run);
  info!(source = %args.source.display(), required = ?options.required, order = %options.resolve_order, "walking");

  let records = Walker::new(walk_spec, transform_spec, options).run(&source);

  if args.debug || args.dry_run {
    print_jobs(&records)?;
  }
  if args.dry_run {
    return Ok(());
  }

  // Env vars override flags.
  let config = RecorderConfig {
    destination: args.directory,
    recheck: args.check,
    record_params: env::var("SOUNDWALK_RECORD_PARAMS").unwrap_or(args.record_params),
    trim_params: env::var("SOUNDWALK_TRIM_PARAMS").unwrap_or(args.trim_params),
    max_attempts: args.max_attempts,
    ..RecorderConfig::default()
  };

  let report = record_jobs(recording_jobs(&records), &config)?;
  info!(?report, "recording finished");
  println!(
    "Recording finished. Captured: {}, kept: {}, skipped: {}, interrupted: {}, already present: {}{}",
    report.captures,
    report.kept,
    report.skipped,
    report.interrupted,
    report.untouched,
    if report.stopped { " (stopped)" } else { "" }
  );
  Ok(())
}
