// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Check a merged input map against the model's declared input schema
// role: input/validation
// inputs: ParsedInput map; SchemaDescriptor extracted from the model JSON
// outputs: ValidationReport listing every violation in one pass
// invariants:
// - No short-circuit: all violations for all fields are collected before valid is decided
// - Fields absent from properties pass silently (vendor schemas evolve faster than the client)
// - integer and number both accept any numeric value; range checks apply to numerics only
// - An unrecognized type string disables the type check for that field, nothing else
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ext::serde_json::{json_type_name, JsonFetch};

/// Declared constraints for a single input field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldSchema {
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,
  #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
  pub allowed: Option<Vec<Value>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub minimum: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub maximum: Option<f64>,
}

/// The input contract a model declares for its jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDescriptor {
  #[serde(default)]
  pub properties: BTreeMap<String, FieldSchema>,
  #[serde(default)]
  pub required: Vec<String>,
}

/// Outcome of one validation pass; errors carry every violation found.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
  pub valid: bool,
  pub errors: Vec<String>,
}

impl ValidationReport {
  /// All violations as one newline-joined block for terminal display.
  pub fn joined(&self) -> String {
    self.errors.join("\n")
  }
}

/// Field types the validator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
  Text,
  Number,
  Integer,
  Boolean,
  Array,
}

impl FieldType {
  fn parse(s: &str) -> Option<FieldType> {
    match s {
      "string" => Some(FieldType::Text),
      "number" => Some(FieldType::Number),
      "integer" => Some(FieldType::Integer),
      "boolean" => Some(FieldType::Boolean),
      "array" => Some(FieldType::Array),
      _ => None,
    }
  }

  fn name(self) -> &'static str {
    match self {
      FieldType::Text => "string",
      FieldType::Number => "number",
      FieldType::Integer => "integer",
      FieldType::Boolean => "boolean",
      FieldType::Array => "array",
    }
  }

  fn matches(self, value: &Value) -> bool {
    match self {
      FieldType::Text => value.is_string(),
      FieldType::Number | FieldType::Integer => value.is_number(),
      FieldType::Boolean => value.is_boolean(),
      FieldType::Array => value.is_array(),
    }
  }
}

/// Extract the input schema from a model JSON document.
///
/// A model that declares no schema validates everything as permitted.
pub fn from_model_json(model: &Value) -> SchemaDescriptor {
  model.fetch("latest_version.input_schema").to_or_default::<SchemaDescriptor>()
}

/// Validate a merged input map against the schema.
///
/// Collect-everything design: users see all problems in one pass rather than
/// fixing one flag at a time through repeated invocations.
pub fn validate(input: &Map<String, Value>, schema: &SchemaDescriptor) -> ValidationReport {
  let mut errors: Vec<String> = Vec::new();

  // Phase 1: required fields must be present and non-null
  for name in &schema.required {
    let missing = match input.get(name) {
      None => true,
      Some(Value::Null) => true,
      Some(_) => false,
    };

    if missing {
      errors.push(format!("missing required field: {name}"));
    }
  }

  // Phase 2: declared fields present in the input are checked; unknown fields pass
  for (name, value) in input {
    let Some(field) = schema.properties.get(name) else { continue };

    if value.is_null() {
      // Null presence is handled by the required pass; constraints don't apply.
      continue;
    }

    let declared = field.kind.as_deref().and_then(FieldType::parse);

    if let Some(ty) = declared {
      if !ty.matches(value) {
        errors.push(format!(
          "field {name}: expected {expected}, got {actual}",
          expected = ty.name(),
          actual = json_type_name(value)
        ));
      }
    }

    if let Some(n) = value.as_f64() {
      if let Some(min) = field.minimum {
        if n < min {
          errors.push(format!("field {name}: value {n} is below the minimum of {min}"));
        }
      }

      if let Some(max) = field.maximum {
        if n > max {
          errors.push(format!("field {name}: value {n} is above the maximum of {max}"));
        }
      }
    }

    if let (Some(allowed), Some(s)) = (field.allowed.as_ref(), value.as_str()) {
      let is_member = allowed.iter().any(|a| a.as_str() == Some(s));

      if !is_member {
        let list = allowed
          .iter()
          .map(|a| a.as_str().map(|s| s.to_string()).unwrap_or_else(|| a.to_string()))
          .collect::<Vec<_>>()
          .join(", ");
        errors.push(format!("field {name}: {s:?} is not one of [{list}]"));
      }
    }
  }

  ValidationReport {
    valid: errors.is_empty(),
    errors,
  }
}
