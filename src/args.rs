// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Collect ad-hoc --key=value input tokens and detect the input-file flag
// role: input/collection
// inputs: Ordered raw token list left over after command-level flags are consumed
// outputs: Field-name → typed value map; optional input file path
// invariants:
// - --input-file=<path> and --input-file <path> are both recognized; the first occurrence wins
// - --key=value splits on the first '=' only; values may contain '='
// - Tokens that match neither form are dropped silently (kept for product clarification, not an error)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::coerce::coerce_value;

const FILE_FLAG: &str = "--input-file";

/// Find the input file path among raw tokens; scanning stops at the first match.
pub fn detect_input_file(tokens: &[String]) -> Option<PathBuf> {
  let mut iter = tokens.iter().enumerate();

  while let Some((idx, tok)) = iter.next() {
    if let Some(rest) = tok.strip_prefix(FILE_FLAG) {
      if let Some(path) = rest.strip_prefix('=') {
        return Some(PathBuf::from(path));
      }

      if rest.is_empty() {
        return tokens.get(idx + 1).map(PathBuf::from);
      }
    }
  }

  None
}

/// Collect every `--key=value` token into a typed field map.
///
/// Input-file flags (either spelling, including the path token of the
/// two-token form) are skipped here; `detect_input_file` owns them. Each
/// value is coerced independently.
pub fn collect_fields(tokens: &[String]) -> Map<String, Value> {
  let mut fields = Map::new();
  let mut skip_next = false;

  for tok in tokens {
    if skip_next {
      skip_next = false;
      continue;
    }

    if let Some(rest) = tok.strip_prefix(FILE_FLAG) {
      if rest.is_empty() {
        skip_next = true;
        continue;
      }

      if rest.starts_with('=') {
        continue;
      }
    }

    let Some(body) = tok.strip_prefix("--") else { continue };

    let Some((key, raw_value)) = body.split_once('=') else { continue };

    if key.is_empty() {
      continue;
    }

    fields.insert(key.to_string(), coerce_value(raw_value));
  }

  fields
}
