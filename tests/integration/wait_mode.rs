use predicates::prelude::*;

use crate::common;

fn terminal_job(status: &str, extra: serde_json::Value) -> serde_json::Value {
  let mut v = serde_json::json!({
    "id": "job-9",
    "model": "acme/upscaler",
    "status": status,
    "created_at": "2026-08-01T12:00:00Z",
    "completed_at": "2026-08-01T12:00:42Z"
  });

  if let (Some(obj), Some(extra_obj)) = (v.as_object_mut(), extra.as_object()) {
    for (k, val) in extra_obj {
      obj.insert(k.clone(), val.clone());
    }
  }

  v
}

#[test]
fn wait_follows_states_and_prints_output() {
  let states = serde_json::json!([
    {"id": "job-9", "model": "acme/upscaler", "status": "processing"},
    terminal_job("succeeded", serde_json::json!({"output": "a painting of a cat"}))
  ]);

  common::bin_with_token()
    .env("MR_TEST_MODEL_JSON", common::model_fixture())
    .env("MR_TEST_CREATE_JOB_JSON", common::job_json("job-9", "starting"))
    .env("MR_TEST_JOB_STATES", states.to_string())
    .args(["run", "--wait", "--poll-ms", "0", "acme/upscaler", "--prompt=a cat"])
    .assert()
    .success()
    .stdout(predicate::str::contains("a painting of a cat"))
    .stderr(predicate::str::contains("completed in 42s"));
}

#[test]
fn wait_surfaces_the_remote_failure() {
  let states = serde_json::json!([
    terminal_job("failed", serde_json::json!({"error": "out of memory"}))
  ]);

  common::bin_with_token()
    .env("MR_TEST_MODEL_JSON", common::model_fixture())
    .env("MR_TEST_CREATE_JOB_JSON", common::job_json("job-9", "starting"))
    .env("MR_TEST_JOB_STATES", states.to_string())
    .args(["run", "--wait", "--poll-ms", "0", "acme/upscaler", "--prompt=a cat"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("job job-9 failed: out of memory"));
}

#[test]
fn wait_reports_cancellation_without_failing() {
  let states = serde_json::json!([terminal_job("canceled", serde_json::json!({}))]);

  common::bin_with_token()
    .env("MR_TEST_MODEL_JSON", common::model_fixture())
    .env("MR_TEST_CREATE_JOB_JSON", common::job_json("job-9", "starting"))
    .env("MR_TEST_JOB_STATES", states.to_string())
    .args(["run", "--wait", "--poll-ms", "0", "acme/upscaler", "--prompt=a cat"])
    .assert()
    .success()
    .stderr(predicate::str::contains("job job-9 was canceled"));
}

#[test]
fn wait_json_prints_the_terminal_snapshot() {
  let states = serde_json::json!([
    terminal_job("succeeded", serde_json::json!({"output": {"url": "https://cdn.example/1.png"}}))
  ]);

  let out = common::bin_with_token()
    .env("MR_TEST_MODEL_JSON", common::model_fixture())
    .env("MR_TEST_CREATE_JOB_JSON", common::job_json("job-9", "starting"))
    .env("MR_TEST_JOB_STATES", states.to_string())
    .args(["run", "--wait", "--poll-ms", "0", "--json", "acme/upscaler", "--prompt=a cat"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["status"], serde_json::json!("succeeded"));
  assert_eq!(v["output"]["url"], serde_json::json!("https://cdn.example/1.png"));
}

#[test]
fn already_terminal_create_skips_polling() {
  // The service can answer create with a finished job; no MR_TEST_JOB_STATES
  // fixture exists, so any poll would fail the test.
  let created = terminal_job("succeeded", serde_json::json!({"output": "instant"}));

  common::bin_with_token()
    .env("MR_TEST_MODEL_JSON", common::model_fixture())
    .env("MR_TEST_CREATE_JOB_JSON", created.to_string())
    .args(["run", "--wait", "--poll-ms", "0", "acme/upscaler", "--prompt=a cat"])
    .assert()
    .success()
    .stdout(predicate::str::contains("instant"));
}
