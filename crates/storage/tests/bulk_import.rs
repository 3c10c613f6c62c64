#![forbid(unsafe_code)]

use std::sync::Arc;
use sv_core::{FixedClock, Timestamp, VillageStatus};
use sv_storage::seed::sample_villages;
use sv_storage::{ImportMode, MemoryPort, RowSet, StoreError, VillageStore};

fn now() -> Timestamp {
    "2024-03-01 10:00:00".parse().expect("timestamp")
}

fn store() -> (Arc<MemoryPort>, VillageStore<Arc<MemoryPort>, FixedClock>) {
    let port = Arc::new(MemoryPort::with_rows("villages", sample_villages()));
    let store = VillageStore::with_clock(port.clone(), FixedClock(now()));
    (port, store)
}

fn rows(text: &str) -> RowSet {
    RowSet::from_csv_reader(text.as_bytes()).expect("rows")
}

#[test]
fn import_without_status_column_is_rejected_and_prior_data_kept() {
    let (port, mut store) = store();
    let before = store.load().to_vec();

    let upload = rows("Village_Name,Municipal_Zone,Current_Phase\nVillage X,A,Pasting\n");
    let err = store.replace_all(&upload, ImportMode::Lenient).unwrap_err();
    match &err {
        StoreError::Schema { missing } => assert_eq!(missing, &vec!["Status".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Status"));
    assert_eq!(store.snapshot(), before.as_slice());
    assert_eq!(port.write_count(), 0);
}

#[test]
fn schema_error_names_every_missing_column() {
    let (_, mut store) = store();
    let err = store
        .replace_all(&rows("Village_Name\nVillage X\n"), ImportMode::Lenient)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing required columns: Municipal_Zone, Current_Phase, Status"
    );
}

#[test]
fn lenient_import_replaces_everything_and_reissues_ids() {
    let (port, mut store) = store();
    let upload = rows(
        "Status,Village_Name,Municipal_Zone,Current_Phase,Legacy_Notes,Last_Updated\n\
         On Track,Village X,E,Legacy Step,call back later,\n\
         completed,Village Y,E,Card Issuance,,2024-02-02\n",
    );
    let summary = store.replace_all(&upload, ImportMode::Lenient).expect("import");
    assert_eq!(summary.imported, 2);
    assert!(summary.warnings.is_empty());

    let records = store.snapshot().to_vec();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id.to_string(), "VIL-0001");
    assert_eq!(records[0].current_phase, "Legacy Step");
    assert_eq!(records[0].last_updated, Some(now()));
    assert_eq!(records[1].status, VillageStatus::Completed);
    assert_eq!(records[1].last_updated, Some("2024-02-02".parse().unwrap()));

    let durable = port.contents().expect("rows");
    assert!(durable.column_index("Legacy_Notes").is_none());
    assert!(durable.column_index("Cards_Issued_Date").is_some());
}

#[test]
fn lenient_import_reports_dropped_cells() {
    let (_, mut store) = store();
    let upload = rows(
        "Village_Name,Municipal_Zone,Current_Phase,Status,Map1_Date\n\
         Village X,E,Pasting,On Track,sometime in May\n",
    );
    let summary = store.replace_all(&upload, ImportMode::Lenient).expect("import");
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(summary.warnings[0].column.as_deref(), Some("Map1_Date"));
}

#[test]
fn unrepresentable_rows_reject_the_whole_import() {
    let (port, mut store) = store();
    let upload = rows(
        "Village_Name,Municipal_Zone,Current_Phase,Status\n\
         Village X,E,Pasting,On Track\n\
         Village Y,,Pasting,On Track\n\
         Village Z,E,Pasting,Paused\n",
    );
    let err = store.replace_all(&upload, ImportMode::Lenient).unwrap_err();
    let StoreError::InvalidRows { issues } = &err else {
        panic!("unexpected error: {err}");
    };
    let rows: Vec<_> = issues.iter().map(|issue| issue.row).collect();
    assert_eq!(rows, vec![Some(2), Some(3)]);
    assert!(err.to_string().starts_with("2 row(s) rejected"));
    assert_eq!(store.snapshot().len(), 15);
    assert_eq!(port.write_count(), 0);
}

#[test]
fn strict_import_rejects_unknown_phases_and_backwards_dates() {
    let (_, mut store) = store();
    let upload = rows(
        "Village_Name,Municipal_Zone,Current_Phase,Status,Notification_Date,Survey_Date\n\
         Village X,E,Pasting,On Track,2023-01-01,2023-02-01\n\
         Village Y,E,Legacy Step,On Track,,\n\
         Village Z,E,Pasting,On Track,2023-05-01,2023-04-01\n",
    );
    let err = store.replace_all(&upload, ImportMode::Strict).unwrap_err();
    let StoreError::InvalidRows { issues } = err else {
        panic!("expected row issues");
    };
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].row, Some(2));
    assert_eq!(issues[0].column.as_deref(), Some("Current_Phase"));
    assert_eq!(issues[1].row, Some(3));
    assert!(issues[1].message.contains("survey"));

    let summary = store.replace_all(&upload, ImportMode::Lenient).expect("lenient import");
    assert_eq!(summary.imported, 3);
}

#[test]
fn strict_import_treats_unreadable_dates_as_errors() {
    let (_, mut store) = store();
    let upload = rows(
        "Village_Name,Municipal_Zone,Current_Phase,Status,Map1_Date\n\
         Village X,E,Pasting,On Track,sometime in May\n",
    );
    let err = store.replace_all(&upload, ImportMode::Strict).unwrap_err();
    assert!(matches!(err, StoreError::InvalidRows { ref issues } if issues.len() == 1));
}

#[test]
fn strict_import_flags_sample_village_with_backwards_survey() {
    let (_, mut store) = store();
    let err = store
        .replace_all(&sample_villages(), ImportMode::Strict)
        .unwrap_err();
    let StoreError::InvalidRows { issues } = err else {
        panic!("expected row issues");
    };
    assert!(issues.iter().all(|issue| issue.row == Some(13)));
    assert_eq!(issues.len(), 2);
}
