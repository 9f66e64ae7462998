// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive each command against the remote service: resolve inputs, validate, create, poll, render
// role: processing/orchestrator
// inputs: EffectiveConfig from CLI normalization; MR_TEST_*/token env indirectly via the API context
// outputs: Terminal output (human or JSON); process exit code via the returned Result
// side_effects: Remote calls; wait mode sleeps between polls
// invariants:
// - Validation failures stop the command before any job is created
// - Job states are read from the service, never assigned locally
// - Wait mode polls until a terminal state with no ceiling; the interval is fixed per invocation
// - failed exits non-zero with the remote message; canceled reports distinctly and exits zero
// errors: Input errors surface locally; remote errors propagate through the auth recovery wrapper
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::args;
use crate::auth::{ApiContext, CredentialStore, with_auth_recovery};
use crate::cli::{Action, EffectiveConfig, RunSpec};
use crate::input;
use crate::model::{Job, JobState, ModelRef};
use crate::render;
use crate::schema;

pub fn execute(cfg: &EffectiveConfig) -> Result<()> {
  let store = CredentialStore::resolve();
  let mut ctx = ApiContext::new(cfg.api_base.clone(), store);

  match &cfg.action {
    Action::Run(spec) => run_job(&mut ctx, spec),
    Action::Status { id, json } => show_status(&mut ctx, id, *json),
    Action::Cancel { id } => cancel_job(&mut ctx, id),
    Action::List { json } => list_jobs(&mut ctx, *json),
  }
}

/// Resolve the two input sources into one canonical object: file first, CLI on top.
pub fn resolve_input(raw_tokens: &[String]) -> Result<Map<String, Value>> {
  let file_path = args::detect_input_file(raw_tokens);
  let cli_fields = args::collect_fields(raw_tokens);
  let file_fields = input::load_input_file(file_path.as_deref())?;

  Ok(input::merge_inputs(file_fields, cli_fields))
}

fn create_body(model: &ModelRef, merged: Map<String, Value>) -> Value {
  let mut body = serde_json::json!({
    "model": format!("{}/{}", model.owner, model.name),
    "input": Value::Object(merged),
  });

  if let Some(version) = &model.version {
    body["version"] = Value::String(version.clone());
  }

  body
}

fn parse_job(v: &Value) -> Result<Job> {
  serde_json::from_value::<Job>(v.clone()).context("unexpected job payload from service")
}

fn run_job(ctx: &mut ApiContext, spec: &RunSpec) -> Result<()> {
  // Phase 1: resolve inputs from the file and the ad-hoc flags
  let merged = resolve_input(&spec.raw_inputs)?;

  // Phase 2: fetch the model's declared schema and validate before creating anything
  let model_json = with_auth_recovery(ctx, |api| api.get_model(&spec.model))?;
  let descriptor = schema::from_model_json(&model_json);
  let report = schema::validate(&merged, &descriptor);

  if !report.valid {
    bail!("input validation failed:\n{}", report.joined());
  }

  // Phase 3: create the job
  let body = create_body(&spec.model, merged);
  let created = with_auth_recovery(ctx, |api| api.create_job(&body))?;
  let job = parse_job(&created)?;

  if !spec.wait {
    if spec.json {
      println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
      println!("{}", render::created_summary(&job));
    }
    return Ok(());
  }

  // Phase 4: poll until the service reports a terminal state
  let (final_json, final_job) = wait_for_terminal(ctx, created, job, Duration::from_millis(spec.poll_ms))?;
  finish(&final_json, &final_job, spec.json)
}

fn wait_for_terminal(ctx: &mut ApiContext, first_json: Value, first: Job, interval: Duration) -> Result<(Value, Job)> {
  let id = first.id.clone();
  let mut current_json = first_json;
  let mut current = first;

  loop {
    if current.status.is_terminal() {
      return Ok((current_json, current));
    }

    std::thread::sleep(interval);
    current_json = with_auth_recovery(ctx, |api| api.get_job(&id))?;
    current = parse_job(&current_json)?;
  }
}

fn finish(raw: &Value, job: &Job, as_json: bool) -> Result<()> {
  if as_json {
    println!("{}", serde_json::to_string_pretty(raw)?);
  }

  match job.status {
    JobState::Succeeded => {
      if !as_json {
        if let Some(text) = render::output_text(job) {
          println!("{text}");
        }
      }

      if let Some(note) = render::elapsed_note(job) {
        eprintln!("{note}");
      }

      Ok(())
    }
    JobState::Failed => {
      let detail = job.error.as_deref().unwrap_or("no error message");
      bail!("job {} failed: {detail}", job.id)
    }
    JobState::Canceled => {
      eprintln!("job {} was canceled", job.id);
      Ok(())
    }
    JobState::Starting | JobState::Processing => {
      bail!("job {} left the wait loop in non-terminal state {}", job.id, job.status)
    }
  }
}

fn show_status(ctx: &mut ApiContext, id: &str, as_json: bool) -> Result<()> {
  let v = with_auth_recovery(ctx, |api| api.get_job(id))?;

  if as_json {
    println!("{}", serde_json::to_string_pretty(&v)?);
    return Ok(());
  }

  let job = parse_job(&v)?;
  println!("{}", render::status_summary(&job));

  if job.status == JobState::Succeeded {
    if let Some(text) = render::output_text(&job) {
      println!("{text}");
    }
  }

  Ok(())
}

fn cancel_job(ctx: &mut ApiContext, id: &str) -> Result<()> {
  let v = with_auth_recovery(ctx, |api| api.cancel_job(id))?;
  let job = parse_job(&v)?;

  println!("job {} cancel requested (status: {})", job.id, job.status);
  Ok(())
}

fn list_jobs(ctx: &mut ApiContext, as_json: bool) -> Result<()> {
  let v = with_auth_recovery(ctx, |api| api.list_jobs())?;

  if as_json {
    println!("{}", serde_json::to_string_pretty(&v)?);
    return Ok(());
  }

  for line in render::listing_lines(&v) {
    println!("{line}");
  }

  Ok(())
}
