use std::path::PathBuf;
use thiserror::Error;

/// A path-setting operation targeted an existing entry that is not a directory.
///
/// Non-fatal: the controller is left unchanged and the caller may retry with
/// a corrected path.
#[derive(Debug, Error)]
#[error("file/directory error occurs ({})", .path.display())]
pub struct PathError {
    pub path: PathBuf,
}

/// Dispatch and launch failures raised by `run`/`plan`.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Dispatch was attempted while the mode is unset or unrecognized.
    #[error("unknown command \"{0}\"")]
    UnknownMode(&'static str),
    /// The OS refused to start the child process.
    #[error("failed to launch {}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
