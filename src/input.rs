// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Load the optional JSON input file and merge it with CLI-supplied fields
// role: input/resolution
// inputs: Optional input file path; field maps from the file and from the argument collector
// outputs: One ParsedInput map ready for schema validation
// side_effects: Reads the input file from disk
// invariants:
// - No path given ⇒ empty map, no file access
// - Missing file and malformed JSON are distinct error classes; malformed carries the parser detail
// - Merge precedence is file-then-CLI; a CLI key always overwrites the file's value
// errors: InputError enumerates the file taxonomy; callers surface and stop before any remote call
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::util::canonicalize_lossy;

#[derive(Debug, Error)]
pub enum InputError {
  #[error("input file not found: {0}")]
  FileNotFound(String),

  #[error("input file {path} is not valid JSON: {detail}")]
  MalformedInput { path: String, detail: String },

  #[error("input file {0} must contain a JSON object at the root")]
  NotAnObject(String),
}

/// Read and parse the optional input file into a field map.
pub fn load_input_file(path: Option<&Path>) -> Result<Map<String, Value>, InputError> {
  let Some(path) = path else {
    return Ok(Map::new());
  };

  let abs = canonicalize_lossy(path);

  if !Path::new(&abs).is_file() {
    return Err(InputError::FileNotFound(abs));
  }

  let text = std::fs::read_to_string(&abs).map_err(|e| InputError::MalformedInput {
    path: abs.clone(),
    detail: e.to_string(),
  })?;

  let parsed: Value = serde_json::from_str(&text).map_err(|e| InputError::MalformedInput {
    path: abs.clone(),
    detail: e.to_string(),
  })?;

  match parsed {
    Value::Object(map) => Ok(map),
    _ => Err(InputError::NotAnObject(abs)),
  }
}

/// Merge file-sourced fields with CLI-sourced fields.
///
/// Starts from the file object and applies every CLI key on top. The order is
/// fixed: CLI wins on any key collision.
pub fn merge_inputs(file_fields: Map<String, Value>, cli_fields: Map<String, Value>) -> Map<String, Value> {
  let mut merged = file_fields;

  for (key, value) in cli_fields {
    merged.insert(key, value);
  }

  merged
}
