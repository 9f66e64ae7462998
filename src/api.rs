// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Isolated inference-service client (trait seam, HTTP backend, env-var mock backend)
// role: remote/api
// inputs: API base URL; bearer token; env MR_TEST_* fixtures for the mock backend
// outputs: Raw JSON documents for models and jobs; ApiError on any failure
// side_effects: Network calls to the inference service (HTTP backend only)
// invariants:
// - Never panic; every failure is an ApiError carrying status (when HTTP) and a message
// - Mock backend is selected whenever any MR_TEST_ fixture variable is present
// - Non-2xx responses surface the response body's error detail when one exists
// errors: Returned to callers; auth classification happens above this layer
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::cell::RefCell;

use serde_json::Value;
use thiserror::Error;

use crate::ext::serde_json::JsonFetch;
use crate::model::ModelRef;

pub const DEFAULT_API_BASE: &str = "https://api.modelrun.dev";
const USER_AGENT: &str = "model-run";

/// Failure of one remote call. `status` is present for HTTP-level failures.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
  pub status: Option<u16>,
  pub message: String,
}

impl ApiError {
  pub fn transport(detail: impl std::fmt::Display) -> ApiError {
    ApiError {
      status: None,
      message: detail.to_string(),
    }
  }

  pub fn http(status: u16, body: &Value) -> ApiError {
    let detail = body
      .fetch("error")
      .to::<String>()
      .or_else(|| body.fetch("detail").to::<String>())
      .unwrap_or_default();

    let message = if detail.is_empty() {
      format!("HTTP {status}")
    } else {
      format!("HTTP {status}: {detail}")
    };

    ApiError {
      status: Some(status),
      message,
    }
  }
}

// --- Trait seam for the inference service ---
pub trait InferenceApi {
  fn get_model(&self, model: &ModelRef) -> Result<Value, ApiError>;
  fn create_job(&self, body: &Value) -> Result<Value, ApiError>;
  fn get_job(&self, id: &str) -> Result<Value, ApiError>;
  fn cancel_job(&self, id: &str) -> Result<Value, ApiError>;
  fn list_jobs(&self) -> Result<Value, ApiError>;
}

struct HttpApi {
  agent: ureq::Agent,
  base: String,
  token: String,
}

impl HttpApi {
  fn new(base: String, token: String) -> Self {
    // Statuses are handled manually so error bodies stay readable for diagnostics.
    let agent: ureq::Agent = ureq::Agent::config_builder().http_status_as_error(false).build().into();

    Self { agent, base, token }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base.trim_end_matches('/'), path)
  }

  fn get_json(&self, path: &str) -> Result<Value, ApiError> {
    let resp = self
      .agent
      .get(&self.url(path))
      .header("Accept", "application/json")
      .header("User-Agent", USER_AGENT)
      .header("Authorization", &format!("Bearer {}", self.token))
      .call();

    Self::finish(resp)
  }

  fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
    let resp = self
      .agent
      .post(&self.url(path))
      .header("Accept", "application/json")
      .header("User-Agent", USER_AGENT)
      .header("Authorization", &format!("Bearer {}", self.token))
      .send_json(body);

    Self::finish(resp)
  }

  fn finish(resp: Result<ureq::http::Response<ureq::Body>, ureq::Error>) -> Result<Value, ApiError> {
    let mut resp = resp.map_err(ApiError::transport)?;
    let status = resp.status().as_u16();
    let body = resp.body_mut().read_json::<Value>().unwrap_or(Value::Null);

    if (200..300).contains(&status) {
      Ok(body)
    } else {
      Err(ApiError::http(status, &body))
    }
  }
}

impl InferenceApi for HttpApi {
  fn get_model(&self, model: &ModelRef) -> Result<Value, ApiError> {
    self.get_json(&format!("/v1/models/{}/{}", model.owner, model.name))
  }

  fn create_job(&self, body: &Value) -> Result<Value, ApiError> {
    self.post_json("/v1/jobs", body)
  }

  fn get_job(&self, id: &str) -> Result<Value, ApiError> {
    self.get_json(&format!("/v1/jobs/{id}"))
  }

  fn cancel_job(&self, id: &str) -> Result<Value, ApiError> {
    self.post_json(&format!("/v1/jobs/{id}/cancel"), &serde_json::json!({}))
  }

  fn list_jobs(&self) -> Result<Value, ApiError> {
    self.get_json("/v1/jobs")
  }
}

// --- Env-var mock backend ---
// Serves fixtures from MR_TEST_* variables so unit and CLI tests run without a network.
struct EnvApi {
  token: String,
  poll_cursor: RefCell<usize>,
}

impl EnvApi {
  fn new(token: String) -> Self {
    Self {
      token,
      poll_cursor: RefCell::new(0),
    }
  }

  /// Simulate an expired credential: while the current token matches
  /// MR_TEST_REJECT_TOKEN, every call fails like the service's 401.
  fn gate(&self) -> Result<(), ApiError> {
    if let Ok(bad) = std::env::var("MR_TEST_REJECT_TOKEN") {
      if self.token == bad {
        return Err(ApiError {
          status: Some(401),
          message: "HTTP 401: unauthorized (invalid token)".into(),
        });
      }
    }
    Ok(())
  }

  fn env_json(key: &str) -> Option<Value> {
    let s = std::env::var(key).ok()?;
    serde_json::from_str::<Value>(&s).ok()
  }

  fn fixture(key: &str) -> Result<Value, ApiError> {
    Self::env_json(key).ok_or_else(|| ApiError::transport(format!("no test fixture in {key}")))
  }
}

impl InferenceApi for EnvApi {
  fn get_model(&self, _model: &ModelRef) -> Result<Value, ApiError> {
    self.gate()?;
    Self::fixture("MR_TEST_MODEL_JSON")
  }

  fn create_job(&self, _body: &Value) -> Result<Value, ApiError> {
    self.gate()?;
    Self::fixture("MR_TEST_CREATE_JOB_JSON")
  }

  fn get_job(&self, _id: &str) -> Result<Value, ApiError> {
    self.gate()?;

    // A sequence fixture replays successive snapshots; the last one repeats.
    if let Some(states) = Self::env_json("MR_TEST_JOB_STATES") {
      if let Some(arr) = states.as_array() {
        if !arr.is_empty() {
          let mut cursor = self.poll_cursor.borrow_mut();
          let idx = (*cursor).min(arr.len() - 1);
          *cursor += 1;
          return Ok(arr[idx].clone());
        }
      }
    }

    Self::fixture("MR_TEST_JOB_JSON")
  }

  fn cancel_job(&self, _id: &str) -> Result<Value, ApiError> {
    self.gate()?;
    Self::fixture("MR_TEST_CANCEL_JSON")
  }

  fn list_jobs(&self) -> Result<Value, ApiError> {
    self.gate()?;
    Self::fixture("MR_TEST_LIST_JSON")
  }
}

fn env_wants_mock() -> bool {
  for (k, _) in std::env::vars() {
    if k.starts_with("MR_TEST_") {
      return true;
    }
  }
  false
}

/// Construct the backend for one command invocation.
pub fn build_api(base: &str, token: &str) -> Box<dyn InferenceApi> {
  if env_wants_mock() {
    Box::new(EnvApi::new(token.to_string()))
  } else {
    Box::new(HttpApi::new(base.to_string(), token.to_string()))
  }
}

// Public constructors for dependency injection in higher layers/tests.
#[cfg(any(test, feature = "testutil"))]
pub fn make_env_api(token: String) -> Box<dyn InferenceApi> {
  Box::new(EnvApi::new(token))
}
#[cfg(any(test, feature = "testutil"))]
pub fn make_http_api(base: String, token: String) -> Box<dyn InferenceApi> {
  Box::new(HttpApi::new(base, token))
}
