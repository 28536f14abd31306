//! Fire-and-forget process launch.
//!
//! The launcher spawns the child and returns immediately; it never waits on
//! the child or inspects its exit status.

use crate::error::ExecutionError;
use crate::model::CommandVector;
use std::path::PathBuf;
use std::process::Command;

/// Spawn the command's program with its argument tokens.
///
/// The child inherits the parent's environment and stdio and keeps running
/// after this function returns. Failure to even start the process surfaces
/// as [`ExecutionError::Spawn`].
pub(crate) fn spawn(cmd: &CommandVector) -> Result<(), ExecutionError> {
    let child = Command::new(cmd.program())
        .args(cmd.args())
        .spawn()
        .map_err(|source| ExecutionError::Spawn {
            program: PathBuf::from(cmd.program()),
            source,
        })?;
    tracing::info!(pid = child.id(), "launched {}", cmd);
    Ok(())
}
