//! Integration tests for the volta CLI

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A volta command rooted at `temp`, with exports landing there too.
fn volta(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("volta"));
    cmd.current_dir(temp.path())
        .arg("--data-dir")
        .arg(temp.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    Command::new(cargo::cargo_bin!("volta"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("lit"));
}

#[test]
fn test_completions_need_no_data_dir() {
    Command::new(cargo::cargo_bin!("volta"))
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("volta"));
}

#[test]
fn test_first_run_seeds_sample_data() {
    let temp = TempDir::new().unwrap();

    volta(&temp)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Problem Definition & Literature Review"));

    assert!(temp.path().join("data/projectVoltaTasks.json").exists());

    volta(&temp)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase progress:"))
        .stdout(predicate::str::contains("3 total"));
}

#[test]
fn test_task_add_complete_and_view() {
    let temp = TempDir::new().unwrap();

    volta(&temp)
        .args(["task", "add", "Draft policy section", "--phase", "III", "--due", "in 5d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task created successfully! (#4)"));

    volta(&temp)
        .args(["task", "complete", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task marked as complete! (#4)"));

    volta(&temp)
        .args(["task", "view", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status:       Complete"))
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("III - "));
}

#[test]
fn test_task_add_requires_name() {
    let temp = TempDir::new().unwrap();

    volta(&temp)
        .args(["task", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please fill in all required fields"));
}

#[test]
fn test_task_list_filter_expressions() {
    let temp = TempDir::new().unwrap();

    volta(&temp)
        .args(["task", "list", "--filter", "phase:II"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found").not());

    volta(&temp)
        .args(["task", "list", "--filter", "colour:red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown filter key"));
}

#[test]
fn test_task_board_skips_empty_phases() {
    let temp = TempDir::new().unwrap();

    volta(&temp)
        .args(["task", "list", "--view", "board"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase I - "))
        .stdout(predicate::str::contains("Phase II - "))
        .stdout(predicate::str::contains("Phase III - ").not())
        .stdout(predicate::str::contains("Phase V - ").not());

    volta(&temp)
        .args(["task", "list", "--view", "board", "--filter", "phase:II"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase II - "))
        .stdout(predicate::str::contains("Phase I - ").not());
}

#[test]
fn test_task_delete_with_yes() {
    let temp = TempDir::new().unwrap();

    volta(&temp)
        .args(["task", "delete", "2", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task deleted successfully! (#2)"));

    volta(&temp)
        .args(["task", "view", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_task_export_import_round_trip() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("tasks.json");

    volta(&temp)
        .args(["task", "export", "-o"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 tasks"));

    let raw = std::fs::read_to_string(&file).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["taskCount"], 3);
    assert_eq!(json["tasks"].as_array().unwrap().len(), 3);

    volta(&temp).args(["task", "delete", "1", "-y"]).assert().success();

    volta(&temp)
        .args(["task", "import", "-y"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Tasks imported successfully! (3 tasks)"));
}

#[test]
fn test_task_import_rejects_files_without_tasks() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("bad.json");
    std::fs::write(&file, r#"{"literature": []}"#).unwrap();

    volta(&temp)
        .args(["task", "import", "-y"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file format"));
}

#[test]
fn test_dashboard_export_writes_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("dash.json");

    volta(&temp)
        .args(["dashboard", "--export"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard data exported"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(json["statistics"]["totalTasks"], 3);
    assert_eq!(json["phases"].as_array().unwrap().len(), 5);
}

#[test]
fn test_lit_add_requires_fields() {
    let temp = TempDir::new().unwrap();

    volta(&temp)
        .args(["lit", "add", "--title", "Only a title"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please fill in all required fields"));
}

#[test]
fn test_lit_add_save_and_cite() {
    let temp = TempDir::new().unwrap();

    volta(&temp)
        .args([
            "lit",
            "add",
            "--title",
            "Cobalt supply risk",
            "--authors",
            "Doe, J.; Roe, R.",
            "--year",
            "2024",
            "--journal",
            "Resources Policy",
            "--abstract",
            "Supply risk assessment.",
            "--tag",
            "cobalt, supply",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Literature added successfully! (#3)"));

    volta(&temp)
        .args(["lit", "save", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added to saved items (#3)"));

    volta(&temp)
        .args(["lit", "list", "--filter", "saved", "--view", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 1-3 of 3"))
        .stdout(predicate::str::contains("Cobalt supply risk"));

    volta(&temp)
        .args(["lit", "cite", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2024)"))
        .stdout(predicate::str::contains("Resources Policy"));
}

#[test]
fn test_lit_list_clamps_page() {
    let temp = TempDir::new().unwrap();

    volta(&temp)
        .args(["lit", "list", "--page", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1 of 1"));
}

#[test]
fn test_lit_import_accepts_bare_array() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("lit.json");
    std::fs::write(
        &file,
        r#"[{"id": 7, "title": "T", "authors": "A, B.", "year": 2023, "journal": "J",
            "abstract": "x", "tags": ["t"], "addedDate": "2025-01-01"}]"#,
    )
    .unwrap();

    volta(&temp)
        .args(["lit", "import", "-y"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 entries)"));

    volta(&temp)
        .args(["lit", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:    1"));
}
