//! Concrete collaborators for the codemend pipeline
//!
//! Real implementations of the boundary traits the engine consumes:
//! - [`GitScm`]: repository sync through the `git` binary
//! - [`PatternAnalyzer`]: regex rule table for deprecation/security issues
//! - [`RuleFixer`]: substring-replacement fix generation and application
//! - [`ProcessRunner`]: interpreter execution with a wall-clock timeout

mod analyzer;
mod fixer;
mod runner;
pub mod rules;
mod scm;

pub use analyzer::PatternAnalyzer;
pub use fixer::{OutputPolicy, RuleFixer};
pub use runner::ProcessRunner;
pub use scm::GitScm;
