use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

const RECORD: &str = r#"{
    "confidence_score": {
        "source": { "type": "primary", "year": 2025, "authority": "academic" }
    },
    "decision_rule": {
        "query": { "keywords": ["algorithm"], "domain": "science", "urgency": "high" }
    },
    "consensus_eval": {
        "claim": "prices rise",
        "sources": [
            { "type": "primary", "year": 2025, "authority": "government",
              "content": "Official figures: prices rise across sectors." }
        ]
    },
    "hybrid_reasoning": {
        "problem": "Will oil prices rise?",
        "data": [
            { "domain": "economics", "observation": "Demand increase" },
            { "domain": "economics", "observation": "Supply increase lagging" },
            { "domain": "economics", "observation": "Refinery outage" }
        ]
    }
}"#;

fn cmd() -> Command {
    Command::cargo_bin("verity").unwrap()
}

fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("input.json"), RECORD).unwrap();
    fs::write(
        dir.path().join("verity.toml"),
        "[scoring]\nreference_year = 2025\n",
    )
    .unwrap();
    dir
}

#[test]
fn reports_all_four_outcomes_for_default_input() {
    let dir = workspace();
    cmd()
        .current_dir(dir.path())
        .args(["--config", "verity.toml"])
        .assert()
        .success()
        .stdout(contains("Confidence Score: 0.93"))
        .stdout(contains("Analysis Mode: moderate"))
        .stdout(contains("Consensus Status: supported"))
        .stdout(contains(
            "Conclusion: Supply and demand govern prices. Data suggests will oil prices rise? likely increases.",
        ));
}

#[test]
fn missing_input_reports_file_not_found_for_every_component() {
    let dir = tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .arg("absent.json")
        .assert()
        .failure()
        .stdout(contains("Confidence Score: File not found"))
        .stdout(contains("Conclusion: File not found"));
}

#[test]
fn malformed_input_reports_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    cmd()
        .arg(&path)
        .assert()
        .failure()
        .stdout(contains("Analysis Mode: Invalid JSON format"));
}

#[test]
fn empty_sections_report_missing_data_and_succeed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, "{}").unwrap();
    cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("Confidence Score: No source data provided"))
        .stdout(contains("Analysis Mode: No query data provided"))
        .stdout(contains("Consensus Status: No claim or sources provided"))
        .stdout(contains("Conclusion: No problem provided"));
}

#[test]
fn json_format_and_log_file() {
    let dir = workspace();
    let log = dir.path().join("logs").join("run.jsonl");
    cmd()
        .current_dir(dir.path())
        .args(["input.json", "--config", "verity.toml", "--format", "json", "--log-path"])
        .arg(&log)
        .assert()
        .success()
        .stdout(contains("\"consensus_status\"").and(contains("\"ok\": \"supported\"")));
    let content = fs::read_to_string(&log).unwrap();
    assert!(content.contains("appraisal.consensus.evaluated"));
    assert!(content.contains("appraisal.run.finished"));
}

#[cfg(target_os = "linux")]
#[test]
fn failing_log_sink_keeps_exit_status() {
    let dir = workspace();
    cmd()
        .current_dir(dir.path())
        .args(["input.json", "--config", "verity.toml", "--log-path", "/dev/full"])
        .assert()
        .success()
        .stdout(contains("Consensus Status: supported"))
        .stdout(contains("Conclusion: Supply and demand govern prices."));
}
