// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Coerce raw CLI value text into its most specific typed JSON representation
// role: input/coercion
// inputs: One raw string token per call
// outputs: serde_json::Value (number, bool, null, array, object, or string fallback)
// invariants:
// - Total function: every input maps to a value, no errors, no panics
// - JSON interpretation always wins over keyword and numeric fallbacks
// - Unquoted free text survives unchanged as a string
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde_json::Value;

/// Convert one raw `--key=value` value into a typed JSON value.
///
/// Precedence, in order:
/// 1. Full JSON parse (numbers, booleans, null, arrays, objects, quoted strings).
/// 2. Bare keyword match on the trimmed text: `true`, `false`, `null`.
/// 3. Numeric literal parse of the trimmed text.
/// 4. The original string, unchanged.
pub fn coerce_value(raw: &str) -> Value {
  if let Ok(v) = serde_json::from_str::<Value>(raw) {
    return v;
  }

  let trimmed = raw.trim();

  match trimmed {
    "true" => return Value::Bool(true),
    "false" => return Value::Bool(false),
    "null" => return Value::Null,
    _ => {}
  }

  if !trimmed.is_empty() {
    if let Ok(n) = trimmed.parse::<f64>() {
      // Non-finite parses (inf, NaN) have no JSON number form; keep the text.
      if let Some(num) = serde_json::Number::from_f64(n) {
        return Value::Number(num);
      }
    }
  }

  Value::String(raw.to_string())
}
