//! Data model: the untyped source tree, the typed walk/transform specs, and recording jobs.

mod document;
mod recording_job;
mod transform_spec;
mod walk_spec;

pub use document::{Document, Mapping, Scalar};
pub use recording_job::{RecordingJob, base_name};
pub use transform_spec::{TransformField, TransformSpec};
pub use walk_spec::WalkSpec;

/// Flat output of the walk: output field name to resolved value.
pub type Record = Mapping;
