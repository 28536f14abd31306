use crate::controller::RunController;
use crate::error::PathError;
use crate::model::{ExecutionMode, RunOverrides};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Execution mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Launch one training run
    Train,
    /// Launch one evaluation run (with --run_once)
    Eval,
    /// Launch a training run, then an evaluation run
    TrainEval,
}

impl From<ModeArg> for ExecutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Train => ExecutionMode::TrainOnly,
            ModeArg::Eval => ExecutionMode::EvalOnly,
            ModeArg::TrainEval => ExecutionMode::TrainAndEval,
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "trainctl",
    version,
    about = "Compose and launch external training/evaluation runs"
)]
pub struct Cli {
    /// Execution mode (omitting it leaves the controller unset and `run` refuses)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Path to the external training/evaluation executable
    #[arg(long, default_value = "./class")]
    pub program: PathBuf,

    /// Training data directory
    #[arg(long, default_value = "./train")]
    pub train_dir: PathBuf,

    /// Validation data directory
    #[arg(long, default_value = "./valid")]
    pub valid_dir: PathBuf,

    /// Checkpoint directory read/written by the trainer
    #[arg(long, default_value = "./checkpoint")]
    pub checkpoint_dir: PathBuf,

    /// Evaluation result directory
    #[arg(long, default_value = "./result")]
    pub result_dir: PathBuf,

    /// Batch size passed to the executable
    #[arg(long, default_value_t = 32)]
    pub batch_size: u32,

    /// Step budget passed to the executable
    #[arg(long, default_value_t = 1_000_000)]
    pub max_steps: u64,

    /// GPU count; 0 omits the flag entirely
    #[arg(long, default_value_t = 0)]
    pub num_gpus: u32,

    /// Enable fine-tuning in the external trainer
    #[arg(long)]
    pub fine_tune: bool,

    /// Print the composed command vectors and launch nothing
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Build a configured controller from CLI arguments.
///
/// Paths flow through the controller's validating setters, so a path that
/// exists as a plain file is rejected here, before anything launches.
pub fn build_controller(args: &Cli) -> Result<RunController, PathError> {
    let mode = args
        .mode
        .map(ExecutionMode::from)
        .unwrap_or(ExecutionMode::None);
    let mut controller = RunController::new(mode);
    controller.set_program_path(&args.program);
    controller.set_batch_size(args.batch_size);
    controller.set_max_steps(args.max_steps);
    controller.set_num_gpus(args.num_gpus);
    controller.set_fine_tune(args.fine_tune);
    controller.set_data_paths(
        &args.train_dir,
        &args.valid_dir,
        &args.checkpoint_dir,
        &args.result_dir,
    )?;
    Ok(controller)
}

pub fn run(args: Cli) -> Result<()> {
    // Validate that --json can only be used with --dry-run
    if args.json && !args.dry_run {
        return Err(anyhow::anyhow!(
            "--json can only be used with --dry-run. Use --dry-run --json together."
        ));
    }

    let controller = build_controller(&args).context("invalid run configuration")?;

    if args.dry_run {
        let plan = controller.plan(&RunOverrides::default())?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            for cmd in &plan {
                println!("{cmd}");
            }
        }
        return Ok(());
    }

    controller.run(&RunOverrides::default())?;
    Ok(())
}
