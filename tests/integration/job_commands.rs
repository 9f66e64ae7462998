use predicates::prelude::*;

use crate::common;

#[test]
fn status_renders_one_line() {
  common::bin_with_token()
    .env("MR_TEST_JOB_JSON", common::job_json("job-5", "processing"))
    .args(["status", "job-5"])
    .assert()
    .success()
    .stdout(predicate::str::contains("job job-5 status: processing"));
}

#[test]
fn status_json_round_trips() {
  let out = common::bin_with_token()
    .env("MR_TEST_JOB_JSON", common::job_json("job-5", "succeeded"))
    .args(["status", "--json", "job-5"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["id"], serde_json::json!("job-5"));
}

#[test]
fn cancel_reports_the_resulting_state() {
  common::bin_with_token()
    .env("MR_TEST_CANCEL_JSON", common::job_json("job-5", "canceled"))
    .args(["cancel", "job-5"])
    .assert()
    .success()
    .stdout(predicate::str::contains("job job-5 cancel requested (status: canceled)"));
}

#[test]
fn list_prints_one_line_per_job() {
  let listing = serde_json::json!({"jobs": [
    {"id": "job-a", "model": "acme/upscaler", "status": "succeeded", "created_at": "2026-08-01T12:00:00Z"},
    {"id": "job-b", "model": "acme/upscaler", "status": "failed", "created_at": "2026-08-02T08:30:00Z"}
  ]});

  common::bin_with_token()
    .env("MR_TEST_LIST_JSON", listing.to_string())
    .args(["list"])
    .assert()
    .success()
    .stdout(predicate::str::contains("job-a"))
    .stdout(predicate::str::contains("job-b"))
    .stdout(predicate::str::contains("failed"));
}

#[test]
fn no_command_is_an_error() {
  common::bin().assert().failure().stderr(predicate::str::contains("Provide a command"));
}

#[test]
fn malformed_model_reference_is_rejected() {
  common::bin_with_token()
    .env("MR_TEST_MODEL_JSON", common::model_fixture())
    .args(["run", "not-a-model-ref"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid model reference"));
}
