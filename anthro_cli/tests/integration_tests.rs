//! Integration tests for the anthro binary.
//!
//! Each test runs with `XDG_CONFIG_HOME` pointed at a temp dir so a user's
//! config file never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("anthro"));
    cmd.env("XDG_CONFIG_HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

fn navy_male(cmd: &mut Command) -> &mut Command {
    cmd.args([
        "body-fat", "--sex", "male", "--age", "30", "--weight", "80", "--height", "180",
        "--neck", "40", "--waist", "90",
    ])
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout is not JSON")
}

#[test]
fn test_cli_help() {
    let home = setup_test_dir();
    cli(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("body-fat"))
        .stdout(predicate::str::contains("readiness"));
}

#[test]
fn test_body_fat_navy_male() {
    let home = setup_test_dir();
    navy_male(&mut cli(&home))
        .assert()
        .success()
        .stdout(predicate::str::contains("18.4%"))
        .stdout(predicate::str::contains("Average"));
}

#[test]
fn test_body_fat_json() {
    let home = setup_test_dir();
    let value = stdout_json(navy_male(&mut cli(&home)).arg("--json"));

    let pct = value["body_fat_percent"].as_f64().unwrap();
    assert!((pct - 18.367).abs() < 0.01);
    assert_eq!(value["category"], "average");
    assert_eq!(value["method"], "navy");
    let fat = value["fat_mass_kg"].as_f64().unwrap();
    let lean = value["lean_mass_kg"].as_f64().unwrap();
    assert!((fat + lean - 80.0).abs() < 1e-9);
}

#[test]
fn test_body_fat_waist_below_neck_fails() {
    let home = setup_test_dir();
    cli(&home)
        .args([
            "body-fat", "--sex", "male", "--age", "30", "--weight", "80", "--height", "180",
            "--neck", "40", "--waist", "38",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidMeasurement"));
}

#[test]
fn test_body_fat_malformed_number_is_parse_error() {
    let home = setup_test_dir();
    cli(&home)
        .args([
            "body-fat", "--sex", "male", "--age", "30", "--weight", "80", "--height", "180",
            "--neck", "40", "--waist", "abc",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse"))
        .stderr(predicate::str::contains("abc"));
}

#[test]
fn test_body_fat_skinfolds() {
    let home = setup_test_dir();
    cli(&home)
        .args([
            "body-fat", "--sex", "male", "--age", "30", "--weight", "80", "--height", "180",
            "--method", "jp3", "--chest", "20", "--abdomen", "20", "--thigh", "20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("17.9%"))
        .stdout(predicate::str::contains("Fitness"));
}

#[test]
fn test_body_fat_missing_site_fails() {
    let home = setup_test_dir();
    cli(&home)
        .args([
            "body-fat", "--sex", "female", "--age", "30", "--weight", "60", "--height", "165",
            "--neck", "32", "--waist", "75",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hip"));
}

#[test]
fn test_energy_json() {
    let home = setup_test_dir();
    let value = stdout_json(cli(&home).args([
        "energy", "--sex", "male", "--age", "30", "--weight", "80", "--height", "180",
        "--activity", "moderate", "--goal", "cut", "--ladder", "--split", "keto", "--json",
    ]));

    let estimate = &value["estimate"];
    assert_eq!(estimate["bmr"].as_f64().unwrap(), 1780.0);
    assert!((estimate["tdee"].as_f64().unwrap() - 2759.0).abs() < 1e-9);
    assert!((estimate["target_calories"].as_f64().unwrap() - 2259.0).abs() < 1e-9);
    assert!((estimate["macros"]["protein_g"].as_f64().unwrap() - 176.0).abs() < 1e-9);
    assert!((estimate["macros"]["carbs_g"].as_f64().unwrap() - 244.75).abs() < 1e-9);

    assert_eq!(value["ladder"].as_array().unwrap().len(), 7);
    assert_eq!(value["split"]["preset"], "keto");
}

#[test]
fn test_energy_macro_budget_exceeded() {
    let home = setup_test_dir();
    cli(&home)
        .args([
            "energy", "--sex", "female", "--age", "80", "--weight", "150", "--height", "150",
            "--activity", "sedentary", "--goal", "cut",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MacroBudgetExceeded"));
}

#[test]
fn test_energy_unknown_goal() {
    let home = setup_test_dir();
    cli(&home)
        .args([
            "energy", "--sex", "male", "--age", "30", "--weight", "80", "--height", "180",
            "--goal", "shred",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("goal"));
}

#[test]
fn test_readiness_without_history() {
    let home = setup_test_dir();
    cli(&home)
        .args([
            "readiness", "--sleep-hours", "7", "--sleep-quality", "4", "--soreness", "2",
            "--stress", "2", "--nutrition", "4", "--hydration", "4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("72/100"))
        .stdout(predicate::str::contains("Moderate"))
        .stdout(predicate::str::contains("not enough history"));
}

#[test]
fn test_readiness_with_history() {
    let home = setup_test_dir();
    let history = home.path().join("readiness.csv");
    fs::write(
        &history,
        "date,score\n2024-03-01,50\n2024-03-02,52\n2024-03-03,54\n2024-03-04,70\n2024-03-05,71\n",
    )
    .unwrap();

    let value = stdout_json(
        cli(&home)
            .args([
                "readiness", "--sleep-hours", "7", "--sleep-quality", "4", "--soreness", "2",
                "--stress", "2", "--nutrition", "4", "--hydration", "4", "--json", "--history",
            ])
            .arg(&history),
    );

    // Recent window 72, 71, 70 against 54, 52, 50
    assert_eq!(value["score"], 72);
    assert_eq!(value["trend"], "improving");
    assert_eq!(value["average"], 62);
}

#[test]
fn test_readiness_rating_out_of_range() {
    let home = setup_test_dir();
    cli(&home)
        .args([
            "readiness", "--sleep-hours", "7", "--sleep-quality", "6", "--soreness", "2",
            "--stress", "2", "--nutrition", "4", "--hydration", "4",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidInput"));
}

#[test]
fn test_rpe_with_history() {
    let home = setup_test_dir();
    let history = home.path().join("rpe.csv");
    fs::write(
        &history,
        "date,exercise,rpe\n2024-03-01,squat,6\n2024-03-04,bench,10\n2024-03-05,squat,6.5\n",
    )
    .unwrap();

    cli(&home)
        .args(["rpe", "--exercise", "squat", "--rpe", "7", "--history"])
        .arg(&history)
        .assert()
        .success()
        .stdout(predicate::str::contains("Increase"))
        .stdout(predicate::str::contains("3 reps in reserve"));
}

#[test]
fn test_rpe_single_entry_is_insufficient() {
    let home = setup_test_dir();
    cli(&home)
        .args(["rpe", "--exercise", "squat", "--rpe", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InsufficientHistory"));
}

#[test]
fn test_rpe_off_scale() {
    let home = setup_test_dir();
    cli(&home)
        .args(["rpe", "--exercise", "squat", "--rpe", "5.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not on the scale"));
}

#[test]
fn test_one_rm() {
    let home = setup_test_dir();
    cli(&home)
        .args(["one-rm", "--weight", "100", "--reps", "5", "--formula", "brzycki"])
        .assert()
        .success()
        .stdout(predicate::str::contains("112.5 kg"));
}

#[test]
fn test_one_rm_training_loads() {
    let home = setup_test_dir();
    cli(&home)
        .args(["one-rm", "--weight", "100", "--reps", "5", "--formula", "brzycki", "--loads"])
        .assert()
        .success()
        .stdout(predicate::str::contains("112.5 kg"))
        .stdout(predicate::str::contains(" 60%"))
        .stdout(predicate::str::contains("67.5 kg"));

    let value = stdout_json(cli(&home).args([
        "one-rm", "--weight", "100", "--reps", "5", "--formula", "brzycki", "--loads", "--json",
    ]));
    let loads = value["loads"].as_array().unwrap();
    assert_eq!(loads.len(), 9);
    assert_eq!(loads[0]["percent"].as_f64().unwrap(), 100.0);
    assert_eq!(loads[0]["load_kg"].as_f64().unwrap(), 112.5);
    // 85% of 112.5 is 95.625
    assert_eq!(loads[3]["load_kg"].as_f64().unwrap(), 95.0);
}

#[test]
fn test_config_inconsistent_tables_rejected() {
    let home = setup_test_dir();
    let path = home.path().join("tables.toml");
    fs::write(&path, "[autoregulation]\nwindow = 0\nmin_entries = 1\n").unwrap();

    cli(&home)
        .arg("--config")
        .arg(&path)
        .args(["rpe", "--exercise", "squat", "--rpe", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("window"));
}

#[test]
fn test_config_init_and_use() {
    let home = setup_test_dir();
    let path = home.path().join("tables.toml");

    cli(&home)
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default configuration"));
    assert!(fs::read_to_string(&path).unwrap().contains("[readiness"));

    // Refuses to overwrite without --force
    cli(&home)
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .failure();

    navy_male(cli(&home).arg("--config").arg(&path))
        .assert()
        .success()
        .stdout(predicate::str::contains("18.4%"));
}

#[test]
fn test_config_overrides_tables() {
    let home = setup_test_dir();
    let path = home.path().join("tables.toml");
    fs::write(&path, "[autoregulation]\nmin_entries = 1\nwindow = 1\n").unwrap();

    cli(&home)
        .arg("--config")
        .arg(&path)
        .args(["rpe", "--exercise", "squat", "--rpe", "9.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Decrease"));
}

#[test]
fn test_config_show_defaults() {
    let home = setup_test_dir();
    cli(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("low_threshold = 7.5"));
}
