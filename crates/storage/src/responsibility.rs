#![forbid(unsafe_code)]

use crate::schema::{
    CONTACT_INFO, PHASE, PRIMARY_CONTACT, RESPONSIBILITY_COLUMNS, RESPONSIBLE_DEPARTMENT,
};
use crate::{Diagnostic, RowPort, RowSet};
use sv_core::ResponsibilityEntry;

/// Reads the static phase-responsibility table. Like the stores, a missing or
/// unreadable file gives no rows plus a diagnostic. Rows with a blank phase
/// are dropped.
pub fn load_responsibilities<P: RowPort>(
    port: &P,
) -> (Vec<ResponsibilityEntry>, Vec<Diagnostic>) {
    let set = match port.read() {
        Ok(set) => set,
        Err(err) => {
            tracing::warn!(source = %port.describe(), "responsibility table unavailable: {err}");
            return (Vec::new(), vec![Diagnostic::file(err.to_string())]);
        }
    };
    if set.column_index(PHASE).is_none() {
        let message = format!("missing required columns: {PHASE}");
        tracing::warn!(source = %port.describe(), "responsibility table unreadable: {message}");
        return (Vec::new(), vec![Diagnostic::file(message)]);
    }

    let entries = set
        .rows()
        .filter(|row| !row.get(PHASE).trim().is_empty())
        .map(|row| ResponsibilityEntry {
            phase: row.get(PHASE).trim().to_string(),
            responsible_department: row.get(RESPONSIBLE_DEPARTMENT).trim().to_string(),
            primary_contact: row.get(PRIMARY_CONTACT).trim().to_string(),
            contact_info: row.get(CONTACT_INFO).trim().to_string(),
        })
        .collect();
    (entries, Vec::new())
}

pub fn encode_responsibilities(entries: &[ResponsibilityEntry]) -> RowSet {
    let mut set = RowSet::with_columns(RESPONSIBILITY_COLUMNS);
    for entry in entries {
        set.push(vec![
            entry.phase.clone(),
            entry.responsible_department.clone(),
            entry.primary_contact.clone(),
            entry.contact_info.clone(),
        ]);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPort;

    #[test]
    fn blank_phases_are_dropped() {
        let text = "Phase,Responsible_Department,Primary_Contact,Contact_Info\n\
                    Pasting,ATP/MTP,ATP Coordinator,atp@example.org\n\
                    ,Nobody,Nobody,\n";
        let set = RowSet::from_csv_reader(text.as_bytes()).expect("rows");
        let port = MemoryPort::with_rows("responsibility", set);
        let (entries, diagnostics) = load_responsibilities(&port);
        assert!(diagnostics.is_empty());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].contact_info, "atp@example.org");
    }

    #[test]
    fn missing_table_degrades_to_empty() {
        let (entries, diagnostics) = load_responsibilities(&MemoryPort::new("responsibility"));
        assert!(entries.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }
}
