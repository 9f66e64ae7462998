// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Format jobs and listings for the terminal; no I/O and no exit-code policy here
// role: output/rendering
// inputs: Job snapshots and raw listing JSON
// outputs: Display strings; callers decide where they go and what the exit code is
// invariants:
// - A string output is printed raw; any other output shape is pretty JSON
// - Elapsed time is reported only when both endpoint timestamps parse
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde_json::Value;

use crate::ext::serde_json::JsonFetch;
use crate::model::Job;
use crate::util::diff_seconds;

/// One-line confirmation for fire-and-return mode.
pub fn created_summary(job: &Job) -> String {
  format!("job {} created (status: {})", job.id, job.status)
}

/// One-line status for the status command.
pub fn status_summary(job: &Job) -> String {
  match (&job.status, &job.error) {
    (crate::model::JobState::Failed, Some(err)) => format!("job {} {}: {}", job.id, job.status, err),
    _ => format!("job {} status: {}", job.id, job.status),
  }
}

/// The job's output rendered for display: raw text for string outputs,
/// pretty JSON for everything else.
pub fn output_text(job: &Job) -> Option<String> {
  match job.output.as_ref()? {
    Value::String(s) => Some(s.clone()),
    other => Some(serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string())),
  }
}

/// "completed in Ns" when both endpoint timestamps are present and parse.
pub fn elapsed_note(job: &Job) -> Option<String> {
  let start = job.started_at.as_deref().or(job.created_at.as_deref())?;
  let end = job.completed_at.as_deref()?;
  let secs = diff_seconds(start, end)?;

  Some(format!("completed in {secs}s"))
}

/// One line per job for the list command.
///
/// Accepts either a bare array or an object with a `jobs` array.
pub fn listing_lines(v: &Value) -> Vec<String> {
  let items = match v {
    Value::Array(items) => items.as_slice(),
    _ => match v.fetch("jobs").value().and_then(|j| j.as_array()) {
      Some(items) => items.as_slice(),
      None => return Vec::new(),
    },
  };

  items
    .iter()
    .map(|item| {
      let id = item.fetch("id").to_or_default::<String>();
      let status = item.fetch("status").to_or_default::<String>();
      let model = item.fetch("model").to_or_default::<String>();
      let created = item.fetch("created_at").to_or_default::<String>();

      if created.is_empty() {
        format!("{id:<24} {status:<11} {model}")
      } else {
        format!("{id:<24} {status:<11} {model:<32} {created}")
      }
    })
    .collect()
}
