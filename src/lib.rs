//! # soundwalk
//!
//! Turns a nested YAML catalogue of sounds into a flat list of recording jobs, then records them.
//!
//! ## Architecture
//!
//! The core is a recursive accumulating walk (see [walker]):
//!
//! - a *walk spec* ([WalkSpec]) says which keys hold children and in what order to visit them;
//! - a *transform spec* ([TransformSpec]) maps output fields to candidate input keys, resolved
//!   against the leaf and then its ancestors ([resolver]);
//! - leaves lacking a required field are dropped ([transformer]).
//!
//! The resulting records feed the [recorder], which captures audio with external programs.

pub mod document_loader;
pub mod error;
pub mod recorder;
pub mod resolver;
pub mod transformer;
pub mod types;
pub mod walker;
#[cfg(test)]
mod walker_test;

pub use document_loader::{load_document, parse_document};
pub use error::{Error, LoadError, RecordError, SpecError};
pub use recorder::{RecorderConfig, SessionReport, record_jobs, recording_jobs};
pub use resolver::{ResolutionOrder, resolve};
pub use transformer::{Transformed, transform};
pub use types::{Document, Mapping, Record, RecordingJob, Scalar, TransformSpec, WalkSpec};
pub use walker::{WalkOptions, Walker, walk};
