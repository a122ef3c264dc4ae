//! Shared run state for the codemend pipeline
//!
//! One [`SharedState`] record is created per pipeline run and moved through
//! the stages by exclusive ownership. The append-only fields are modeled as
//! [`AppendLog`]s so they can grow but never shrink during a run.

mod error;
mod fix;
mod issue;
mod log;
mod result;
mod state;

pub use error::StateError;
pub use fix::{Fix, FixKind};
pub use issue::{Issue, Severity};
pub use log::AppendLog;
pub use result::PipelineResult;
pub use state::{SharedState, TestResults};
