//! Run lifecycle controller.
//!
//! Owns the run configuration, validates path updates at set-time, and
//! dispatches composed commands to the launcher.

use crate::composer;
use crate::error::{ExecutionError, PathError};
use crate::launcher;
use crate::model::{CommandVector, ExecutionMode, RunConfig, RunOverrides};
use std::path::{Path, PathBuf};

/// Controller owning the run configuration for one external executable.
///
/// Mutate freely through the setters, then call [`run`](Self::run); the
/// configuration is read-only for the duration of a dispatch.
#[derive(Debug, Default)]
pub struct RunController {
    cfg: RunConfig,
}

impl RunController {
    /// Controller with default parameters and the given execution mode.
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            cfg: RunConfig {
                mode,
                ..RunConfig::default()
            },
        }
    }

    /// Controller over a fully formed configuration.
    pub fn with_config(cfg: RunConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RunConfig {
        &self.cfg
    }

    pub fn mode(&self) -> ExecutionMode {
        self.cfg.mode
    }

    /// Human-readable label of the current mode.
    pub fn mode_label(&self) -> &'static str {
        self.cfg.mode.label()
    }

    pub fn set_mode(&mut self, mode: ExecutionMode) {
        self.cfg.mode = mode;
    }

    pub fn set_program_path(&mut self, path: impl Into<PathBuf>) {
        self.cfg.program_path = path.into();
    }

    pub fn batch_size(&self) -> u32 {
        self.cfg.batch_size
    }

    pub fn set_batch_size(&mut self, batch_size: u32) {
        self.cfg.batch_size = batch_size;
    }

    pub fn max_steps(&self) -> u64 {
        self.cfg.max_steps
    }

    pub fn set_max_steps(&mut self, max_steps: u64) {
        self.cfg.max_steps = max_steps;
    }

    pub fn num_gpus(&self) -> u32 {
        self.cfg.num_gpus
    }

    pub fn set_num_gpus(&mut self, num_gpus: u32) {
        self.cfg.num_gpus = num_gpus;
    }

    pub fn fine_tune(&self) -> bool {
        self.cfg.fine_tune
    }

    pub fn set_fine_tune(&mut self, fine_tune: bool) {
        self.cfg.fine_tune = fine_tune;
    }

    /// Update the training data and checkpoint paths.
    ///
    /// Every argument that already exists on disk must be a directory. All
    /// arguments are validated before any field is assigned; on error the
    /// configuration is unchanged.
    pub fn set_training_paths(
        &mut self,
        train: impl Into<PathBuf>,
        checkpoint: impl Into<PathBuf>,
    ) -> Result<(), PathError> {
        let train = train.into();
        let checkpoint = checkpoint.into();
        ensure_directory(&train)?;
        ensure_directory(&checkpoint)?;
        self.cfg.train_data_path = train;
        self.cfg.checkpoint_path = checkpoint;
        Ok(())
    }

    /// Update the validation data, checkpoint, and result paths.
    ///
    /// Same validate-all-then-assign-all contract as
    /// [`set_training_paths`](Self::set_training_paths).
    pub fn set_evaluation_paths(
        &mut self,
        valid: impl Into<PathBuf>,
        checkpoint: impl Into<PathBuf>,
        result: impl Into<PathBuf>,
    ) -> Result<(), PathError> {
        let valid = valid.into();
        let checkpoint = checkpoint.into();
        let result = result.into();
        ensure_directory(&valid)?;
        ensure_directory(&checkpoint)?;
        ensure_directory(&result)?;
        self.cfg.valid_data_path = valid;
        self.cfg.checkpoint_path = checkpoint;
        self.cfg.result_data_path = result;
        Ok(())
    }

    /// Update all four data paths in one atomic operation.
    pub fn set_data_paths(
        &mut self,
        train: impl Into<PathBuf>,
        valid: impl Into<PathBuf>,
        checkpoint: impl Into<PathBuf>,
        result: impl Into<PathBuf>,
    ) -> Result<(), PathError> {
        let train = train.into();
        let valid = valid.into();
        let checkpoint = checkpoint.into();
        let result = result.into();
        ensure_directory(&train)?;
        ensure_directory(&valid)?;
        ensure_directory(&checkpoint)?;
        ensure_directory(&result)?;
        self.cfg.train_data_path = train;
        self.cfg.valid_data_path = valid;
        self.cfg.checkpoint_path = checkpoint;
        self.cfg.result_data_path = result;
        Ok(())
    }

    /// Compose the command vector(s) for the current mode without launching.
    pub fn plan(&self, overrides: &RunOverrides) -> Result<Vec<CommandVector>, ExecutionError> {
        composer::compose(&self.cfg, overrides)
    }

    /// Compose and launch per the current mode.
    ///
    /// `TrainAndEval` launches the evaluation command immediately after the
    /// training command; the second spawn does not wait on the first child.
    pub fn run(&self, overrides: &RunOverrides) -> Result<(), ExecutionError> {
        let commands = composer::compose(&self.cfg, overrides)?;
        tracing::debug!(mode = self.mode_label(), launches = commands.len(), "dispatching");
        for cmd in &commands {
            launcher::spawn(cmd)?;
        }
        Ok(())
    }
}

/// A path that exists on disk must be a directory.
fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() && !path.is_dir() {
        return Err(PathError {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn existing_directory_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctl = RunController::default();
        ctl.set_training_paths(dir.path(), dir.path().join("checkpoint"))
            .unwrap();
        assert_eq!(ctl.config().train_data_path, dir.path());
    }

    #[test]
    fn nonexistent_path_is_accepted() {
        let mut ctl = RunController::default();
        ctl.set_training_paths("./no-such-dir-yet", "./no-such-checkpoint")
            .unwrap();
        assert_eq!(
            ctl.config().train_data_path,
            PathBuf::from("./no-such-dir-yet")
        );
    }

    #[test]
    fn plain_file_is_rejected_and_named() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.bin");
        fs::write(&file, b"x").unwrap();

        let mut ctl = RunController::default();
        let err = ctl.set_training_paths(&file, dir.path()).unwrap_err();
        assert_eq!(err.path, file);
        assert!(err.to_string().contains(&file.display().to_string()));
    }

    #[test]
    fn failed_setter_leaves_configuration_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("result.bin");
        fs::write(&file, b"x").unwrap();

        let mut ctl = RunController::default();
        // The result path fails last; the earlier arguments must not stick.
        ctl.set_evaluation_paths(dir.path(), dir.path(), &file)
            .unwrap_err();
        assert_eq!(ctl.config().valid_data_path, PathBuf::from("./valid"));
        assert_eq!(
            ctl.config().checkpoint_path,
            PathBuf::from("./checkpoint")
        );
        assert_eq!(ctl.config().result_data_path, PathBuf::from("./result"));
    }

    #[test]
    fn set_data_paths_updates_all_four() {
        let mut ctl = RunController::default();
        ctl.set_data_paths("./t", "./v", "./c", "./r").unwrap();
        let cfg = ctl.config();
        assert_eq!(cfg.train_data_path, PathBuf::from("./t"));
        assert_eq!(cfg.valid_data_path, PathBuf::from("./v"));
        assert_eq!(cfg.checkpoint_path, PathBuf::from("./c"));
        assert_eq!(cfg.result_data_path, PathBuf::from("./r"));
    }

    #[test]
    fn run_with_unset_mode_fails_without_launching() {
        let ctl = RunController::default();
        let err = ctl.run(&RunOverrides::default()).unwrap_err();
        assert!(matches!(err, ExecutionError::UnknownMode("nothing to be set")));
    }

    #[test]
    fn plan_matches_mode() {
        let mut ctl = RunController::new(ExecutionMode::TrainAndEval);
        ctl.set_fine_tune(true);
        let plan = ctl.plan(&RunOverrides::default()).unwrap();
        assert_eq!(plan.len(), 2);

        ctl.set_mode(ExecutionMode::EvalOnly);
        let plan = ctl.plan(&RunOverrides::default()).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].tokens().last().unwrap(), "--run_once");
    }

    #[test]
    fn mode_label_mirrors_the_mode() {
        let ctl = RunController::new(ExecutionMode::TrainOnly);
        assert_eq!(ctl.mode_label(), "train_only");
    }
}
