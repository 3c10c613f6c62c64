#![forbid(unsafe_code)]

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn temp_dir(test_name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("sv_cli_{test_name}_"))
        .tempdir()
        .expect("create temp dir")
}

fn svamitva(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svamitva"))
        .arg("--data-dir")
        .arg(dir)
        .args(args)
        .env_remove("SVAMITVA_DATA_DIR")
        .env_remove("SVAMITVA_LOG")
        .output()
        .expect("run svamitva")
}

fn json_ok(dir: &Path, args: &[&str]) -> Value {
    let output = svamitva(dir, args);
    assert!(
        output.status.success(),
        "{args:?} failed (stderr={})",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

#[test]
fn version_includes_pkg_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_svamitva"))
        .arg("--version")
        .output()
        .expect("run svamitva --version");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn first_run_seeds_sample_data_and_reports_overview() {
    let dir = temp_dir("first_run_seeds_sample_data");
    let overview = json_ok(dir.path(), &["overview"]);

    assert!(dir.path().join("villages_data.csv").exists());
    assert!(dir.path().join("remarks_data.csv").exists());
    assert!(dir.path().join("responsibility_data.csv").exists());

    assert_eq!(overview["metrics"]["total_villages"], 15);
    assert_eq!(overview["metrics"]["map2_awaited"], 2);
    assert_eq!(overview["metrics"]["last_updated"], "2024-01-15");
    assert_eq!(overview["zones"]["A"], 4);
    assert_eq!(overview["statuses"]["Behind Schedule"], 3);
    assert_eq!(overview["zone_status"]["D"]["Completed"], 0);
    assert_eq!(overview["phases"][0]["phase"], "Notification");
    assert_eq!(overview["programme"].as_array().map(Vec::len), Some(9));
}

#[test]
fn no_seed_leaves_directory_empty() {
    let dir = temp_dir("no_seed_leaves_directory_empty");
    let overview = json_ok(dir.path(), &["--no-seed", "overview"]);
    assert_eq!(overview["metrics"]["total_villages"], 0);
    assert_eq!(overview["diagnostics"].as_array().map(Vec::len), Some(1));
    assert!(!dir.path().join("villages_data.csv").exists());
}

#[test]
fn village_add_update_and_show() {
    let dir = temp_dir("village_add_update_and_show");
    let added = json_ok(
        dir.path(),
        &[
            "village", "add", "--name", "Village P", "--zone", "B", "--phase", "Pasting",
            "--status", "on track", "--atp", "Ms. Reddy", "--properties", "95",
        ],
    );
    assert_eq!(added["id"], "VIL-0016");
    assert_eq!(added["total_properties"], 95);

    let updated = json_ok(
        dir.path(),
        &[
            "village", "update", "VIL-0016", "--phase", "Objections Hearing",
            "--milestone", "pasting_start=2024-02-10",
        ],
    );
    assert_eq!(updated["current_phase"], "Objections Hearing");
    assert_eq!(updated["milestones"]["pasting_start"], "2024-02-10");

    let shown = json_ok(dir.path(), &["village", "show", "Village P"]);
    assert_eq!(shown["responsibility"]["responsible_department"], "ARRO");
    assert_eq!(shown["responsibility"]["remaining_days"], 120);
    assert_eq!(shown["responsibility"]["official"], Value::Null);
}

#[test]
fn updating_an_unknown_village_fails_without_writing() {
    let dir = temp_dir("updating_an_unknown_village_fails");
    json_ok(dir.path(), &["init"]);
    let before = std::fs::read(dir.path().join("villages_data.csv")).expect("read");

    let output = svamitva(dir.path(), &["village", "update", "Village Z", "--status", "completed"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no village matches 'Village Z'"));
    assert_eq!(std::fs::read(dir.path().join("villages_data.csv")).expect("read"), before);
}

#[test]
fn import_without_status_column_is_rejected() {
    let dir = temp_dir("import_without_status_column");
    json_ok(dir.path(), &["init"]);
    let upload = dir.path().join("upload.csv");
    std::fs::write(&upload, "Village_Name,Municipal_Zone,Current_Phase\nVillage X,A,Pasting\n")
        .expect("write upload");

    let output = svamitva(dir.path(), &["import", upload.to_str().expect("utf8 path")]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing required columns: Status"));

    let listed = json_ok(dir.path(), &["village", "list"]);
    assert_eq!(listed.as_array().map(Vec::len), Some(15));
}

#[test]
fn strict_import_reports_rows_and_lenient_import_applies() {
    let dir = temp_dir("strict_import_reports_rows");
    json_ok(dir.path(), &["init"]);
    let upload = dir.path().join("upload.csv");
    std::fs::write(
        &upload,
        "Village_Name,Municipal_Zone,Current_Phase,Status\n\
         Village X,A,Pasting,On Track\n\
         Village Y,B,Survey Started,On Track\n",
    )
    .expect("write upload");
    let upload = upload.to_str().expect("utf8 path");

    let output = svamitva(dir.path(), &["import", upload, "--strict"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("row 2: Current_Phase"));

    let summary = json_ok(dir.path(), &["import", upload]);
    assert_eq!(summary["imported"], 2);
    let listed = json_ok(dir.path(), &["village", "list", "--zone", "B"]);
    assert_eq!(listed[0]["current_phase"], "Survey Started");
}

#[test]
fn remark_submit_respond_and_pending() {
    let dir = temp_dir("remark_submit_respond_and_pending");
    let first = json_ok(
        dir.path(),
        &[
            "remark", "submit", "--official", "Mr. Rao", "--department", "ARRO",
            "--text", "Hearing venue not available", "--help-required", "Administrative Support",
        ],
    );
    assert_eq!(first["status"], "Pending");
    assert_eq!(first["response"], "");
    json_ok(
        dir.path(),
        &[
            "remark", "submit", "--official", "Ms. Iyer", "--department", "ATP/MTP",
            "--text", "Need printed maps",
        ],
    );

    let responded = json_ok(
        dir.path(),
        &["remark", "respond", "REM-0001", "--status", "resolved", "--response", "Venue booked"],
    );
    assert_eq!(responded["status"], "Resolved");

    let pending = json_ok(dir.path(), &["remark", "pending"]);
    assert_eq!(pending.as_array().map(Vec::len), Some(1));
    assert_eq!(pending[0]["official_name"], "Ms. Iyer");

    let listed = json_ok(dir.path(), &["remark", "list", "--department", "All"]);
    assert_eq!(listed.as_array().map(Vec::len), Some(2));

    let output = svamitva(
        dir.path(),
        &["remark", "respond", "REM-0009", "--status", "resolved", "--response", "x"],
    );
    assert!(!output.status.success());
}

#[test]
fn contacts_matrix_lists_field_work_phases_unless_asked() {
    let dir = temp_dir("contacts_matrix_lists_field_work_phases");
    let contacts = json_ok(dir.path(), &["contacts"]);
    let matrix = contacts["responsibility"].as_array().expect("matrix");
    assert_eq!(matrix.len(), 7);
    assert_eq!(matrix[0]["phase"], "Drone Survey Pending");
    assert_eq!(matrix[0]["contact_info"], "soi.ludhiana@nic.in");
    assert_eq!(contacts["zones"]["A"]["property_tax"][0], "Mr. Sharma");

    let everything = json_ok(dir.path(), &["contacts", "--all-phases"]);
    assert_eq!(everything["responsibility"].as_array().map(Vec::len), Some(9));
    assert_eq!(everything["responsibility"][8]["phase"], "Card Issuance");
}

#[test]
fn export_writes_csv_in_schema_order() {
    let dir = temp_dir("export_writes_csv_in_schema_order");
    let output = svamitva(dir.path(), &["export", "remarks"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Date,Official_Name,Department,Phase,Village,Remarks,Help_Required,Status,Response\n"
    );

    let target = dir.path().join("out.csv");
    let target_arg = target.to_str().expect("utf8 path");
    let output = svamitva(dir.path(), &["export", "villages", "--output", target_arg]);
    assert!(output.status.success());
    let text = std::fs::read_to_string(&target).expect("read export");
    assert!(text.starts_with("Village_Name,Municipal_Zone,Current_Phase,Status,Last_Updated,"));
    assert_eq!(text.lines().count(), 16);
}

#[test]
fn malformed_config_is_a_hard_error() {
    let dir = temp_dir("malformed_config_is_a_hard_error");
    std::fs::write(dir.path().join("svamitva.toml"), "seed_sample_data = [").expect("write config");
    let output = svamitva(dir.path(), &["overview"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("svamitva.toml"));
}
