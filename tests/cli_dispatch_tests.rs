use std::process::Command;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_garrison")
}

#[test]
fn missing_command_prints_usage_and_exits_2() {
    let output = Command::new(bin()).output().expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: garrison"));
}

#[test]
fn unknown_command_prints_usage_and_exits_2() {
    let output = Command::new(bin())
        .arg("conquer")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn simulate_command_prints_rounds_and_outcome() {
    let output = Command::new(bin())
        .arg("simulate")
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("round 1"));
    assert!(stdout.contains("casualties"));
    assert!(stdout.contains("winner:") || stdout.contains("draw after"));
}

#[test]
fn simulate_command_emits_csv_with_flag() {
    let output = Command::new(bin())
        .args(["simulate", "--csv"])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let header = stdout.lines().next().expect("csv should have a header");
    assert_eq!(
        header,
        "round,attacker_army_id,defender_army_id,unit_type,target_type,damage,casualties"
    );
    assert!(stdout.lines().count() > 1, "demo battle should log actions");
}

#[test]
fn validate_command_succeeds_on_clean_or_missing_datasets() {
    let temp_dir = std::env::temp_dir().join("garrison-validate-empty");
    std::fs::create_dir_all(&temp_dir).expect("temp dir should be creatable");

    let output = Command::new(bin())
        .arg("validate")
        .current_dir(&temp_dir)
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("all datasets clean"));
}
