// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Credential discovery/storage and the one-shot authentication recovery wrapper
// role: remote/auth
// inputs: Env MODEL_RUN_API_TOKEN and MODEL_RUN_TOKEN_FILE; the token file; stdin when re-prompting
// outputs: Bearer tokens; a rebuilt client handle after recovery
// side_effects: Reads/writes/removes the token file; prompts on stderr/stdin during recovery
// invariants:
// - Token discovery prefers the environment variable, then the token file; blank values count as absent
// - Auth classification: HTTP 401/403, or a message naming unauthorized/authentication/invalid token
// - At most one recovery per command invocation, tracked on the context, never recursive
// errors: Non-auth errors propagate unchanged; a second auth failure after recovery also propagates
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::api::{ApiError, InferenceApi, build_api};

const TOKEN_ENV: &str = "MODEL_RUN_API_TOKEN";
const TOKEN_FILE_ENV: &str = "MODEL_RUN_TOKEN_FILE";

/// File-backed credential storage.
pub struct CredentialStore {
  path: PathBuf,
}

impl CredentialStore {
  /// Resolve the token file location: env override first, then the home config dir.
  pub fn resolve() -> CredentialStore {
    if let Ok(p) = std::env::var(TOKEN_FILE_ENV) {
      if !p.trim().is_empty() {
        return CredentialStore { path: PathBuf::from(p) };
      }
    }

    let home = std::env::var("HOME").map(PathBuf::from).unwrap_or_default();

    CredentialStore {
      path: home.join(".config").join("model-run").join("token"),
    }
  }

  pub fn at(path: PathBuf) -> CredentialStore {
    CredentialStore { path }
  }

  pub fn load(&self) -> Option<String> {
    let text = std::fs::read_to_string(&self.path).ok()?;
    let token = text.trim();

    if token.is_empty() { None } else { Some(token.to_string()) }
  }

  pub fn save(&self, token: &str) -> Result<()> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    std::fs::write(&self.path, token).with_context(|| format!("writing {}", self.path.display()))
  }

  pub fn clear(&self) -> Result<()> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
    }
  }
}

/// Discover a token: env var first, then the token file.
pub fn discover_token(store: &CredentialStore) -> Option<String> {
  if let Ok(t) = std::env::var(TOKEN_ENV) {
    if !t.trim().is_empty() {
      return Some(t.trim().to_string());
    }
  }

  store.load()
}

/// Classify a remote failure as authentication-class.
pub fn is_auth_error(err: &ApiError) -> bool {
  if matches!(err.status, Some(401) | Some(403)) {
    return true;
  }

  let msg = err.message.to_ascii_lowercase();
  msg.contains("unauthorized") || msg.contains("authentication") || msg.contains("invalid token")
}

/// Read a replacement token from the terminal.
fn prompt_for_token() -> Result<String> {
  eprint!("Enter your API token: ");
  std::io::stderr().flush().ok();

  let mut line = String::new();
  std::io::stdin().read_line(&mut line).context("reading token from stdin")?;
  let token = line.trim().to_string();

  if token.is_empty() {
    bail!("no token entered");
  }

  Ok(token)
}

/// Caller-owned client handle plus the recovery budget for one command invocation.
pub struct ApiContext {
  base: String,
  token: String,
  api: Box<dyn InferenceApi>,
  store: CredentialStore,
  recovered: bool,
  prompt: Box<dyn Fn() -> Result<String>>,
}

impl ApiContext {
  pub fn new(base: String, store: CredentialStore) -> ApiContext {
    let token = discover_token(&store).unwrap_or_default();
    let api = build_api(&base, &token);

    ApiContext {
      base,
      token,
      api,
      store,
      recovered: false,
      prompt: Box::new(prompt_for_token),
    }
  }

  /// "Reset" is construction of a new handle, never mutation of a global.
  fn adopt(&mut self, token: String) {
    self.token = token;
    self.api = build_api(&self.base, &self.token);
  }

  #[cfg(any(test, feature = "testutil"))]
  pub fn with_prompt(mut self, prompt: Box<dyn Fn() -> Result<String>>) -> ApiContext {
    self.prompt = prompt;
    self
  }

  #[cfg(any(test, feature = "testutil"))]
  pub fn with_token(mut self, token: String) -> ApiContext {
    self.adopt(token);
    self
  }
}

/// Run one remote operation with at most one authentication recovery.
///
/// On an authentication-class failure the stored credential is discarded, the
/// user is re-prompted, the fresh token is persisted, the client handle is
/// rebuilt, and the operation runs once more. Whatever the second attempt
/// returns is final; non-auth errors propagate unchanged on the first attempt.
pub fn with_auth_recovery<T, F>(ctx: &mut ApiContext, op: F) -> Result<T>
where
  F: Fn(&dyn InferenceApi) -> Result<T, ApiError>,
{
  match op(ctx.api.as_ref()) {
    Ok(v) => Ok(v),
    Err(err) if is_auth_error(&err) && !ctx.recovered => {
      ctx.recovered = true;
      ctx.store.clear()?;

      let fresh = (ctx.prompt)()?;
      ctx.store.save(&fresh)?;
      ctx.adopt(fresh);

      op(ctx.api.as_ref()).map_err(anyhow::Error::from)
    }
    Err(err) => Err(err.into()),
  }
}
