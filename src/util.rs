// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, timestamp arithmetic, and man page rendering
// role: utilities/helpers
// inputs: Paths; RFC3339 timestamp strings; clap CommandFactory
// outputs: Canonicalized paths, elapsed seconds, man page text
// invariants:
// - canonicalize_lossy always returns a usable string, even for paths that do not exist
// - diff_seconds returns None rather than guessing when a timestamp does not parse
// errors: Man page rendering bubbles IO errors; the rest are total
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use clap::CommandFactory;

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}

/// Compute the difference in seconds between two RFC3339 timestamps.
/// Returns None when either timestamp cannot be parsed.
pub fn diff_seconds(start_iso: &str, end_iso: &str) -> Option<i64> {
  let ps = chrono::DateTime::parse_from_rfc3339(start_iso).ok()?;
  let pe = chrono::DateTime::parse_from_rfc3339(end_iso).ok()?;
  Some((pe - ps).num_seconds())
}
