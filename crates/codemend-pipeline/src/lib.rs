//! codemend pipeline engine
//!
//! A fixed-topology sequence of stages that threads one [`SharedState`]
//! record through itself: synchronize, scan, analyze, generate fixes, apply
//! fixes, validate. Stages run strictly one after another; a stage that
//! fails is recorded and skipped rather than aborting the run, and the final
//! [`PipelineResult`] is derived from whatever state the run accumulated.
//!
//! The concrete issue detection, fix generation, version-control sync and
//! program execution live behind the narrow collaborator traits in
//! [`collab`]; the engine itself only orchestrates.

pub mod collab;
pub mod config;
pub mod pipeline;
pub mod stage;
pub mod stages;

pub use codemend_state::{
    AppendLog, Fix, FixKind, Issue, PipelineResult, Severity, SharedState, StateError, TestResults,
};
pub use collab::{Analyzer, CollabError, ExecStatus, Execution, Fixer, Runner, Scm};
pub use config::PipelineConfig;
pub use pipeline::Pipeline;
pub use stage::{Stage, StageError};
