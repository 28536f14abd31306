//! Deterministic argument composition for the external executable.
//!
//! Flag spellings and ordering are fixed by the child's CLI contract and must
//! not drift; `--data_dir <path>` style flags are single argv tokens with an
//! embedded space, exactly as the external program expects them.

use crate::error::ExecutionError;
use crate::model::{CommandVector, ExecutionMode, RunConfig, RunOverrides};

/// Configuration values with per-invocation overrides resolved.
#[derive(Debug, Clone, Copy)]
struct EffectiveParams {
    batch_size: u32,
    max_steps: u64,
    num_gpus: u32,
    fine_tune: bool,
}

impl EffectiveParams {
    fn resolve(cfg: &RunConfig, overrides: &RunOverrides) -> Self {
        Self {
            batch_size: overrides.batch_size.unwrap_or(cfg.batch_size),
            max_steps: overrides.max_steps.unwrap_or(cfg.max_steps),
            num_gpus: overrides.num_gpus.unwrap_or(cfg.num_gpus),
            fine_tune: overrides.fine_tune.unwrap_or(cfg.fine_tune),
        }
    }
}

/// Compose the command vector(s) for the configured mode.
///
/// `TrainAndEval` yields the training command first, then the evaluation
/// command without `--run_once`. Mode `None` is a dispatch error.
pub(crate) fn compose(
    cfg: &RunConfig,
    overrides: &RunOverrides,
) -> Result<Vec<CommandVector>, ExecutionError> {
    let params = EffectiveParams::resolve(cfg, overrides);
    match cfg.mode {
        ExecutionMode::TrainOnly => Ok(vec![training_command(cfg, &params)]),
        ExecutionMode::EvalOnly => Ok(vec![evaluation_command(cfg, &params, true)]),
        ExecutionMode::TrainAndEval => Ok(vec![
            training_command(cfg, &params),
            evaluation_command(cfg, &params, false),
        ]),
        ExecutionMode::None => Err(ExecutionError::UnknownMode(cfg.mode.label())),
    }
}

/// Shared prefix for every command: program path, batch size, step budget.
fn base_tokens(cfg: &RunConfig, params: &EffectiveParams) -> Vec<String> {
    vec![
        cfg.program_path.display().to_string(),
        format!("--batch_size={}", params.batch_size),
        format!("--max_steps={}", params.max_steps),
    ]
}

fn training_command(cfg: &RunConfig, params: &EffectiveParams) -> CommandVector {
    let mut tokens = base_tokens(cfg, params);
    tokens.push(format!("--data_dir {}", cfg.train_data_path.display()));
    tokens.push(format!("--train_dir {}", cfg.checkpoint_path.display()));
    if params.fine_tune {
        tokens.push("--fine_tune True".to_string());
    }
    if params.num_gpus != 0 {
        tokens.push(format!("--num_gpus={}", params.num_gpus));
    }
    CommandVector::new(tokens)
}

fn evaluation_command(cfg: &RunConfig, params: &EffectiveParams, run_once: bool) -> CommandVector {
    let mut tokens = base_tokens(cfg, params);
    tokens.push(format!("--data_dir {}", cfg.valid_data_path.display()));
    tokens.push(format!("--checkpoint_dir {}", cfg.checkpoint_path.display()));
    tokens.push(format!("--eval_dir {}", cfg.result_data_path.display()));
    if run_once {
        tokens.push("--run_once".to_string());
    }
    CommandVector::new(tokens)
}
