#![forbid(unsafe_code)]

use sv_core::aggregate::{MatrixScope, responsibility_matrix};
use sv_core::PhaseCatalog;
use sv_storage::{
    CsvFilePort, DataFiles, RowPort, RowSet, StoreError, initialize_data_files,
    load_responsibilities,
};
use tempfile::TempDir;

fn temp_dir(test_name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("sv_storage_{test_name}_"))
        .tempdir()
        .expect("create temp dir")
}

fn leftovers(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}

#[test]
fn reading_a_missing_file_is_a_missing_error() {
    let dir = temp_dir("reading_a_missing_file_is_a_missing_error");
    let port = CsvFilePort::new(dir.path().join("absent.csv"));
    assert!(matches!(port.read(), Err(StoreError::Missing { .. })));
}

#[test]
fn write_replaces_contents_without_leaving_temp_files() {
    let dir = temp_dir("write_replaces_contents_without_leaving_temp_files");
    let path = dir.path().join("villages_data.csv");
    std::fs::write(&path, "old,contents\n1,2\n").expect("seed");

    let mut rows = RowSet::with_columns(&["Village_Name", "Status"]);
    rows.push(vec!["Village A".to_string(), "On Track".to_string()]);
    CsvFilePort::new(&path).write(&rows).expect("write");

    assert_eq!(
        std::fs::read_to_string(&path).expect("read"),
        "Village_Name,Status\nVillage A,On Track\n"
    );
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn failed_write_leaves_destination_and_no_temp_file() {
    let dir = temp_dir("failed_write_leaves_destination_and_no_temp_file");
    // A directory in the destination's place makes the rename fail.
    let path = dir.path().join("villages_data.csv");
    std::fs::create_dir(&path).expect("mkdir");
    std::fs::write(path.join("keep.txt"), "x").expect("keep");

    let err = CsvFilePort::new(&path)
        .write(&RowSet::with_columns(&["Village_Name"]))
        .unwrap_err();
    assert!(!err.is_locked() || cfg!(windows));
    assert!(path.join("keep.txt").exists());
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn header_whitespace_and_bom_are_ignored_on_read() {
    let dir = temp_dir("header_whitespace_and_bom_are_ignored_on_read");
    let path = dir.path().join("remarks_data.csv");
    std::fs::write(&path, "\u{feff}Date , Official_Name\n2024-01-01,Mr. Rao\n").expect("seed");
    let rows = CsvFilePort::new(&path).read().expect("read");
    assert_eq!(rows.columns(), ["Date", "Official_Name"]);
    assert_eq!(rows.rows().next().expect("row").get("Official_Name"), "Mr. Rao");
}

#[test]
fn initialization_seeds_missing_files_only() {
    let dir = temp_dir("initialization_seeds_missing_files_only");
    let files = DataFiles::in_dir(dir.path().join("data"));
    std::fs::create_dir_all(dir.path().join("data")).expect("mkdir");
    std::fs::write(&files.remarks, "Date,Official_Name,Department,Remarks\n").expect("seed");

    let created = initialize_data_files(&files).expect("initialize");
    assert_eq!(created, vec![files.villages.clone(), files.responsibility.clone()]);
    assert_eq!(
        std::fs::read_to_string(&files.remarks).expect("read"),
        "Date,Official_Name,Department,Remarks\n"
    );

    let mut villages = files.village_store();
    assert_eq!(villages.load().len(), 15);

    let (reference, diagnostics) = load_responsibilities(&files.responsibility_port());
    assert!(diagnostics.is_empty());
    assert_eq!(reference.len(), 9);
    let matrix =
        responsibility_matrix(&PhaseCatalog::svamitva(), &reference, MatrixScope::AllPhases);
    assert_eq!(matrix.len(), 9);
    assert_eq!(matrix[3].contact_info, "proptax.ludhiana@punjab.gov.in");

    assert!(initialize_data_files(&files).expect("second run").is_empty());
}

#[test]
fn seeded_remarks_file_is_empty_with_headers() {
    let dir = temp_dir("seeded_remarks_file_is_empty_with_headers");
    let files = DataFiles::in_dir(dir.path());
    initialize_data_files(&files).expect("initialize");
    assert_eq!(
        std::fs::read_to_string(&files.remarks).expect("read"),
        "Date,Official_Name,Department,Phase,Village,Remarks,Help_Required,Status,Response\n"
    );
    let mut log = files.remark_log();
    assert!(log.load().is_empty());
    assert!(log.diagnostics().is_empty());
}
