use std::path::Path;
use std::process::{Command, Output};

fn action() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_zai-review"));
    cmd.env_clear();
    cmd
}

/// Run against a pull_request event with an unreachable GitHub API, so the
/// run gets as far as listing files and then fails.
fn run_on_pull_request(dir: &Path, env: &[(&str, &str)]) -> Output {
    let event_path = dir.join("event.json");
    std::fs::write(&event_path, r#"{"action":"opened","pull_request":{"number":5}}"#).unwrap();

    let mut cmd = action();
    cmd.env("GITHUB_REPOSITORY", "octocat/hello-world")
        .env("GITHUB_EVENT_PATH", &event_path)
        .env("GITHUB_API_URL", "http://127.0.0.1:1");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

#[test]
fn missing_api_key_fails_the_run() {
    let output = action()
        .env("GITHUB_REPOSITORY", "octocat/hello-world")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("::error::Input required and not supplied: ZAI_API_KEY"),
        "stdout: {stdout}"
    );
}

#[test]
fn push_event_fails_without_network_calls() {
    let dir = tempfile::tempdir().unwrap();
    let event_path = dir.path().join("event.json");
    std::fs::write(&event_path, r#"{"ref":"refs/heads/main","commits":[]}"#).unwrap();

    let output = action()
        .env("INPUT_ZAI_API_KEY", "zai-key")
        .env("GITHUB_TOKEN", "ghs_token")
        .env("GITHUB_REPOSITORY", "octocat/hello-world")
        .env("GITHUB_EVENT_PATH", &event_path)
        // Unroutable endpoint: reaching it would be a bug.
        .env("GITHUB_API_URL", "http://127.0.0.1:1")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("::error::This action only runs on pull_request events."),
        "stdout: {stdout}"
    );
    assert!(!stdout.contains("Fetching changed files"));
}

#[test]
fn flags_override_environment() {
    let output = action()
        .env("INPUT_ZAI_API_KEY", "zai-key")
        .env("GITHUB_REPOSITORY", "not-a-repo")
        .args(["--repository", "also-not-a-repo"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("also-not-a-repo"), "stdout: {stdout}");
}

#[test]
fn help_lists_action_inputs() {
    let output = action().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("INPUT_ZAI_API_KEY"));
    assert!(stdout.contains("INPUT_ZAI_MODEL"));
    assert!(stdout.contains("GITHUB_EVENT_PATH"));
}

#[test]
fn empty_token_input_falls_back_to_github_token_env() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_on_pull_request(
        dir.path(),
        &[
            ("INPUT_ZAI_API_KEY", "zai-key"),
            ("INPUT_GITHUB_TOKEN", ""),
            ("GITHUB_TOKEN", "ghs_env"),
        ],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("GITHUB_TOKEN not set"), "stdout: {stdout}");
    assert!(stdout.contains("Fetching changed files for PR #5"), "stdout: {stdout}");
}

#[test]
fn token_input_is_used_without_github_token_env() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_on_pull_request(
        dir.path(),
        &[
            ("INPUT_ZAI_API_KEY", "zai-key"),
            ("INPUT_GITHUB_TOKEN", "ghs_input"),
        ],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("GITHUB_TOKEN not set"), "stdout: {stdout}");
    assert!(stdout.contains("Fetching changed files for PR #5"), "stdout: {stdout}");
}

#[test]
fn empty_token_everywhere_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_on_pull_request(
        dir.path(),
        &[
            ("INPUT_ZAI_API_KEY", "zai-key"),
            ("INPUT_GITHUB_TOKEN", ""),
            ("GITHUB_TOKEN", ""),
        ],
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("::error::GITHUB_TOKEN not set"), "stdout: {stdout}");
    assert!(!stdout.contains("Fetching changed files"));
}

#[test]
fn empty_api_key_input_counts_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_on_pull_request(
        dir.path(),
        &[
            ("INPUT_ZAI_API_KEY", ""),
            ("INPUT_ZAI_MODEL", ""),
            ("GITHUB_TOKEN", "ghs_env"),
        ],
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("::error::Input required and not supplied: ZAI_API_KEY"),
        "stdout: {stdout}"
    );
}

#[test]
fn pull_request_payload_without_number_is_not_a_pull_request() {
    let dir = tempfile::tempdir().unwrap();
    let event_path = dir.path().join("event.json");
    std::fs::write(&event_path, r#"{"pull_request":{"number":null}}"#).unwrap();

    let output = action()
        .env("INPUT_ZAI_API_KEY", "zai-key")
        .env("GITHUB_TOKEN", "ghs_token")
        .env("GITHUB_REPOSITORY", "octocat/hello-world")
        .env("GITHUB_EVENT_PATH", &event_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("::error::This action only runs on pull_request events."),
        "stdout: {stdout}"
    );
}
