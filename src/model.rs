// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the wire model (model references, job states, job snapshots) shared by the API layer and rendering
// role: model/types
// outputs: Serializable structs and enums matching the remote JSON shapes
// invariants: Job status strings are the five lowercase states, case-sensitive; optional fields are additive
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A reference to a hosted model: `owner/name` with an optional pinned version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
  pub owner: String,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

impl ModelRef {
  /// Parse `owner/name` or `owner/name:version`.
  pub fn parse(s: &str) -> Option<ModelRef> {
    static RE_MODEL: Lazy<regex::Regex> =
      Lazy::new(|| regex::Regex::new(r"^([A-Za-z0-9][A-Za-z0-9_.-]*)/([A-Za-z0-9][A-Za-z0-9_.-]*)(?::([A-Za-z0-9_.-]+))?$").unwrap());

    let caps = RE_MODEL.captures(s)?;
    let owner = caps.get(1)?.as_str().to_string();
    let name = caps.get(2)?.as_str().to_string();
    let version = caps.get(3).map(|m| m.as_str().to_string());

    Some(ModelRef { owner, name, version })
  }
}

impl fmt::Display for ModelRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(v) => write!(f, "{}/{}:{}", self.owner, self.name, v),
      None => write!(f, "{}/{}", self.owner, self.name),
    }
  }
}

/// Lifecycle states owned by the remote service; the client only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
  Starting,
  Processing,
  Succeeded,
  Failed,
  Canceled,
}

impl JobState {
  /// A terminal state admits no further transition.
  pub fn is_terminal(self) -> bool {
    matches!(self, JobState::Succeeded | JobState::Failed | JobState::Canceled)
  }
}

impl fmt::Display for JobState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      JobState::Starting => "starting",
      JobState::Processing => "processing",
      JobState::Succeeded => "succeeded",
      JobState::Failed => "failed",
      JobState::Canceled => "canceled",
    };
    f.write_str(s)
  }
}

/// One job snapshot as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
  pub id: String,
  pub model: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  pub status: JobState,
  #[serde(default)]
  pub input: serde_json::Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub started_at: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub completed_at: Option<String>,
}
