//! State construction errors

use std::path::PathBuf;

/// Errors raised while building the initial run state.
///
/// These are the fatal/setup failures of a run: if the state cannot be
/// constructed there is nothing for the pipeline to do, and the run
/// short-circuits into a failed result.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The repository path does not exist.
    #[error("repository path does not exist: {}", .0.display())]
    RepositoryNotFound(PathBuf),

    /// The repository path exists but is not a directory.
    #[error("repository path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}
