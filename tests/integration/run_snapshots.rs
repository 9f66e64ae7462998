use crate::common;

#[test]
fn validation_errors_snapshot() {
  test_support::init_insta();

  let out = common::bin_with_token()
    .env("MR_TEST_MODEL_JSON", common::model_fixture())
    .args(["run", "acme/upscaler", "--width=2048"])
    .output()
    .unwrap();

  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  insta::assert_snapshot!("run_validation_errors", stderr.trim_end());
}

#[test]
fn created_job_json_snapshot() {
  test_support::init_insta();

  let out = common::bin_with_token()
    .env("MR_TEST_MODEL_JSON", common::model_fixture())
    .env("MR_TEST_CREATE_JOB_JSON", common::job_json("job-1", "starting"))
    .args(["run", "--json", "acme/upscaler", "--prompt=a cat"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let stdout = String::from_utf8_lossy(&out.stdout);
  insta::assert_snapshot!("created_job_json", stdout.trim_end());
}
