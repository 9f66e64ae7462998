use assert_cmd::Command;

#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test-token";

/// A command for the binary with ambient MODEL_RUN_* configuration scrubbed,
/// so the invoking developer's environment never leaks into a test.
#[allow(dead_code)]
pub fn bin() -> Command {
  let mut cmd = Command::cargo_bin("model-run").unwrap();
  cmd.env_remove("MODEL_RUN_API_TOKEN");
  cmd.env_remove("MODEL_RUN_API_BASE");
  cmd.env_remove("MODEL_RUN_TOKEN_FILE");
  // Keep error output stable for snapshot assertions.
  cmd.env_remove("RUST_BACKTRACE");
  cmd.env_remove("RUST_LIB_BACKTRACE");
  cmd
}

/// Like `bin()` but with a token present, which every mocked happy path wants.
#[allow(dead_code)]
pub fn bin_with_token() -> Command {
  let mut cmd = bin();
  cmd.env("MODEL_RUN_API_TOKEN", TEST_TOKEN);
  cmd
}

/// The acme/upscaler model document used across tests.
#[allow(dead_code)]
pub fn model_fixture() -> String {
  test_support::read_fixture_text("model.json")
}

/// A minimal job snapshot as the service would return it.
#[allow(dead_code)]
pub fn job_json(id: &str, status: &str) -> String {
  serde_json::json!({
    "id": id,
    "model": "acme/upscaler",
    "status": status
  })
  .to_string()
}
