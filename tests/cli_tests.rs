//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn trl() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("trl"));
    cmd.env_remove("TRL_ACCELERATE_BIN")
        .env_remove("TRL_PYTHON_BIN")
        .env_remove("TRL_SFT_SCRIPT")
        .env_remove("TRL_DPO_SCRIPT")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path.to_str().expect("utf8 path").to_string()
}

fn dry_run_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("dry run prints JSON")
}

#[test]
fn test_cli_version() {
    trl().arg("--version").assert().success().stdout(predicate::str::contains("trl"));
}

#[test]
fn test_cli_help() {
    trl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Launch SFT and DPO"))
        .stdout(predicate::str::contains("sft"))
        .stdout(predicate::str::contains("dpo"))
        .stdout(predicate::str::contains("env"));
}

#[test]
fn test_cli_value_overrides_yaml() {
    let tmp = TempDir::new().expect("tmp");
    let script = write(tmp.path(), "sft.py", "");
    let config = write(
        tmp.path(),
        "sft.yaml",
        "model_name_or_path: facebook/opt-350m\n\
         dataset_name: timdettmers/openassistant-guanaco\n\
         dataset_text_field: prompt\n\
         report_to: none\n\
         learning_rate: 0.0001\n\
         lr_scheduler_type: cosine\n",
    );

    let output = trl()
        .args(["sft", "--dry-run", "--script", &script, "--config", &config])
        .args(["--output_dir", "sft-out", "--lr_scheduler_type", "cosine_with_restarts"])
        .output()
        .expect("run trl");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report = dry_run_json(&output.stdout);
    let training = &report["config"]["groups"]["TrainingArguments"];
    assert_eq!(training["lr_scheduler_type"]["value"], "cosine_with_restarts");
    assert_eq!(training["lr_scheduler_type"]["source"], "cli");
    assert_eq!(training["learning_rate"]["value"], 0.0001);
    assert_eq!(training["learning_rate"]["source"], "file");
    assert_eq!(training["output_dir"]["value"], "sft-out");
    assert_eq!(report["config"]["groups"]["SftScriptArguments"]["dataset_text_field"]["value"], "prompt");

    let command = report["command"].as_str().expect("command string");
    assert!(command.starts_with("accelerate launch"));
    assert!(command.contains("--lr_scheduler_type cosine_with_restarts"));
    assert!(!command.contains("--config "));
}

#[test]
fn test_dpo_uses_defaults_for_unset_options() {
    let tmp = TempDir::new().expect("tmp");
    let script = write(tmp.path(), "dpo.py", "");

    let output = trl()
        .args(["dpo", "--dry-run", "--script", &script])
        .args(["--model_name_or_path", "gpt2", "--output_dir", "dpo-out", "beta=0.25"])
        .output()
        .expect("run trl");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report = dry_run_json(&output.stdout);
    let script_args = &report["config"]["groups"]["DpoScriptArguments"];
    assert_eq!(script_args["beta"]["value"], 0.25);
    assert_eq!(script_args["max_prompt_length"]["value"], 128);
    assert_eq!(script_args["max_prompt_length"]["source"], "default");
    assert_eq!(report["config"]["mode"], "dpo");
}

#[test]
fn test_missing_output_dir_fails_before_launch() {
    let tmp = TempDir::new().expect("tmp");
    let script = write(tmp.path(), "sft.py", "");
    let config = write(tmp.path(), "sft.yaml", "model_name_or_path: facebook/opt-350m\n");

    trl()
        .args(["sft", "--script", &script, "--config", &config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required option `output_dir`"));
}

#[test]
fn test_unknown_training_option_is_rejected() {
    trl()
        .args(["sft", "--dry-run", "--output_dir", "o", "--not_an_option", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized argument 'not_an_option'"));
}

#[test]
fn test_invalid_choice_is_rejected() {
    trl()
        .args(["sft", "--dry-run", "--lr_scheduler_type", "stepwise"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for --lr_scheduler_type"));
}

#[test]
fn test_env_field_must_be_mapping() {
    let tmp = TempDir::new().expect("tmp");
    let config = write(tmp.path(), "sft.yaml", "env: WANDB_MODE=offline\n");

    trl()
        .args(["sft", "--dry-run", "--config", &config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("`env` field should be a mapping"));
}

#[test]
fn test_config_passed_twice_is_rejected() {
    trl()
        .args(["sft", "--dry-run", "--config", "a.yaml", "--config", "b.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You passed the `config` field twice!"));
}

#[test]
fn test_missing_launcher_binary_is_reported() {
    let tmp = TempDir::new().expect("tmp");
    let script = write(tmp.path(), "sft.py", "");
    let missing = tmp.path().join("bin").join("accelerate");

    trl()
        .args(["sft", "--script", &script, "--accelerate-bin", missing.to_str().expect("utf8")])
        .args(["--output_dir", "o", "--model_name_or_path", "gpt2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to start"));
}

#[cfg(unix)]
#[test]
fn test_python_launcher_runs_script_with_env() {
    let tmp = TempDir::new().expect("tmp");
    let script = write(
        tmp.path(),
        "train.sh",
        "[ \"$WANDB_MODE\" = offline ] || exit 5\n\
         [ \"$1\" = --output_dir ] || exit 6\n\
         exit 0\n",
    );
    let config = write(
        tmp.path(),
        "sft.yaml",
        "model_name_or_path: gpt2\noutput_dir: out\nenv:\n  WANDB_MODE: offline\n",
    );

    trl()
        .args(["sft", "--launcher", "python", "--python-bin", "sh", "--script", &script])
        .args(["--config", &config])
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn test_training_exit_code_is_propagated() {
    let tmp = TempDir::new().expect("tmp");
    let script = write(tmp.path(), "fail.sh", "exit 4\n");

    trl()
        .args(["dpo", "--launcher", "python", "--python-bin", "sh", "--script", &script])
        .args(["--output_dir", "o", "--model_name_or_path", "gpt2"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("exited with status 4"));
}

#[test]
fn test_env_command_reports_platform() {
    trl()
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains("Platform:"))
        .stdout(predicate::str::contains("TRL_SFT_SCRIPT"));
}

#[test]
fn test_env_command_reports_launcher_overrides() {
    trl()
        .args(["env", "--accelerate-bin", "/opt/venv/bin/accelerate"])
        .env("TRL_PYTHON_BIN", "python3.11")
        .assert()
        .success()
        .stdout(predicate::str::contains("accelerate: /opt/venv/bin/accelerate"))
        .stdout(predicate::str::contains("python: python3.11"));
}

#[test]
fn test_completions_generate_script() {
    trl().args(["completions", "bash"]).assert().success().stdout(predicate::str::contains("trl"));
}
