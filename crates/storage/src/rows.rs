#![forbid(unsafe_code)]

use crate::StoreError;
use std::io::{Read, Write};

/// Named columns plus string cells; the shape every data file takes on the
/// way in and out. Column lookup is by name, so column order on read does not
/// matter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_columns(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|column| column.to_string()).collect())
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Required columns absent from this set, in the order given.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|column| self.column_index(column).is_none())
            .map(|column| column.to_string())
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        self.rows.iter().enumerate().map(|(index, cells)| RowView {
            set: self,
            cells,
            number: index + 1,
        })
    }

    /// Parses delimited text with a header line. Header names are trimmed,
    /// a UTF-8 byte-order mark is dropped and fully blank rows are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let columns = reader
            .headers()?
            .iter()
            .map(|column| column.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let mut set = Self::new(columns);
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            set.push(record.iter().map(str::to_string).collect());
        }
        Ok(set)
    }

    /// Writes the header and every row in column order, without an index column.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<W, StoreError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|err| StoreError::Io(err.into_error()))
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, StoreError> {
        self.write_csv(Vec::new())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RowView<'a> {
    set: &'a RowSet,
    cells: &'a [String],
    number: usize,
}

impl<'a> RowView<'a> {
    /// Cell under `column`; empty when the column or the cell is absent.
    pub fn get(&self, column: &str) -> &'a str {
        self.set
            .column_index(column)
            .and_then(|index| self.cells.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 1-based position among the data rows.
    pub fn number(&self) -> usize {
        self.number
    }
}
