use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Caller-selected behavior governing which command(s) are composed and launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    TrainOnly,
    EvalOnly,
    TrainAndEval,
    /// Uninitialized; never a valid dispatch target.
    None,
}

impl ExecutionMode {
    /// Stable label used in dispatch error messages.
    pub fn label(self) -> &'static str {
        match self {
            ExecutionMode::TrainOnly => "train_only",
            ExecutionMode::EvalOnly => "evaluation_only",
            ExecutionMode::TrainAndEval => "evaluation with additional train",
            ExecutionMode::None => "nothing to be set",
        }
    }
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::None
    }
}

/// Run parameters for the external training/evaluation executable.
///
/// Any path field naming an existing filesystem entry must be a directory;
/// the controller's setters enforce this at set-time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub program_path: PathBuf,
    pub train_data_path: PathBuf,
    pub valid_data_path: PathBuf,
    pub checkpoint_path: PathBuf,
    pub result_data_path: PathBuf,
    pub batch_size: u32,
    pub max_steps: u64,
    pub num_gpus: u32,
    pub fine_tune: bool,
    pub mode: ExecutionMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            program_path: PathBuf::from("./class"),
            train_data_path: PathBuf::from("./train"),
            valid_data_path: PathBuf::from("./valid"),
            checkpoint_path: PathBuf::from("./checkpoint"),
            result_data_path: PathBuf::from("./result"),
            batch_size: 32,
            max_steps: 1_000_000,
            num_gpus: 0,
            fine_tune: false,
            mode: ExecutionMode::None,
        }
    }
}

/// Per-invocation parameter overrides for `run`/`plan`.
///
/// A `None` field falls back to the stored configuration value. Overrides
/// never mutate the stored configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunOverrides {
    pub max_steps: Option<u64>,
    pub batch_size: Option<u32>,
    pub num_gpus: Option<u32>,
    pub fine_tune: Option<bool>,
}

/// Ordered argv for one child process: program path first, then arguments.
///
/// Built fresh per invocation and discarded after launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandVector(Vec<String>);

impl CommandVector {
    /// `tokens` must start with the program path.
    pub(crate) fn new(tokens: Vec<String>) -> Self {
        debug_assert!(!tokens.is_empty());
        Self(tokens)
    }

    /// Program path (first token).
    pub fn program(&self) -> &str {
        &self.0[0]
    }

    /// Arguments passed to the program (every token after the first).
    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CommandVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_external_contract() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.program_path, PathBuf::from("./class"));
        assert_eq!(cfg.train_data_path, PathBuf::from("./train"));
        assert_eq!(cfg.valid_data_path, PathBuf::from("./valid"));
        assert_eq!(cfg.checkpoint_path, PathBuf::from("./checkpoint"));
        assert_eq!(cfg.result_data_path, PathBuf::from("./result"));
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.max_steps, 1_000_000);
        assert_eq!(cfg.num_gpus, 0);
        assert!(!cfg.fine_tune);
        assert_eq!(cfg.mode, ExecutionMode::None);
    }

    #[test]
    fn mode_labels_are_stable() {
        assert_eq!(ExecutionMode::TrainOnly.label(), "train_only");
        assert_eq!(ExecutionMode::EvalOnly.label(), "evaluation_only");
        assert_eq!(
            ExecutionMode::TrainAndEval.label(),
            "evaluation with additional train"
        );
        assert_eq!(ExecutionMode::None.label(), "nothing to be set");
    }

    #[test]
    fn command_vector_splits_program_and_args() {
        let cmd = CommandVector::new(vec![
            "./class".to_string(),
            "--batch_size=32".to_string(),
            "--run_once".to_string(),
        ]);
        assert_eq!(cmd.program(), "./class");
        assert_eq!(cmd.args(), ["--batch_size=32", "--run_once"]);
        assert_eq!(cmd.to_string(), "./class --batch_size=32 --run_once");
    }
}
