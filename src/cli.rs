use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_BASE;
use crate::model::ModelRef;

#[derive(Parser, Debug)]
#[command(
    name = "model-run",
    version,
    about = "Run hosted model inference jobs from the terminal",
    long_about = None
)]
pub struct Cli {
  /// API base URL (default: https://api.modelrun.dev, or MODEL_RUN_API_BASE)
  #[arg(long)]
  pub api_base: Option<String>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  #[command(subcommand)]
  pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Submit a job built from an optional input file and --key=value flags
  Run {
    /// Model reference: owner/name or owner/name:version
    model: String,

    /// Block until the job reaches a terminal state
    #[arg(long)]
    wait: bool,

    /// Print raw job JSON instead of the human rendering
    #[arg(long)]
    json: bool,

    /// Poll interval for --wait in milliseconds (hidden; tests only)
    #[arg(long = "poll-ms", hide = true)]
    poll_ms: Option<u64>,

    /// Input tokens: --input-file <path>, --input-file=<path>, --key=value
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    inputs: Vec<String>,
  },

  /// Show one job
  Status {
    id: String,

    /// Print raw job JSON
    #[arg(long)]
    json: bool,
  },

  /// Request cancellation of a running job
  Cancel { id: String },

  /// List recent jobs
  List {
    /// Print the raw listing JSON
    #[arg(long)]
    json: bool,
  },
}

/// The run command after normalization.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunSpec {
  pub model: ModelRef,
  pub raw_inputs: Vec<String>,
  pub wait: bool,
  pub json: bool,
  pub poll_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Action {
  Run(RunSpec),
  Status { id: String, json: bool },
  Cancel { id: String },
  List { json: bool },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub api_base: String,
  pub action: Action,
}

const DEFAULT_POLL_MS: u64 = 1000;

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let api_base = cli
    .api_base
    .or_else(|| std::env::var("MODEL_RUN_API_BASE").ok().filter(|s| !s.trim().is_empty()))
    .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

  let Some(command) = cli.command else {
    bail!("Provide a command: run, status, cancel, or list (see --help)")
  };

  let action = match command {
    Command::Run {
      model,
      wait,
      json,
      poll_ms,
      inputs,
    } => {
      let Some(model) = ModelRef::parse(&model) else {
        bail!("invalid model reference '{model}': expected owner/name or owner/name:version")
      };

      Action::Run(RunSpec {
        model,
        raw_inputs: inputs,
        wait,
        json,
        poll_ms: poll_ms.unwrap_or(DEFAULT_POLL_MS),
      })
    }
    Command::Status { id, json } => Action::Status { id, json },
    Command::Cancel { id } => Action::Cancel { id },
    Command::List { json } => Action::List { json },
  };

  Ok(EffectiveConfig { api_base, action })
}
