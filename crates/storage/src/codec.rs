#![forbid(unsafe_code)]

use crate::rows::RowView;
use crate::schema::*;
use crate::{Diagnostic, RowSet};
use sv_core::{
    MilestoneDates, MilestoneField, NewRemark, RemarkEntry, RemarkId, RemarkStatus, Timestamp,
    VillageId, VillageRecord, VillageStatus,
};

/// Mapping between a record type and one row of its data file.
///
/// `decode` fails with the diagnostic that made the row unusable; softer
/// problems (a bad optional date, say) are pushed to `warnings` and the row
/// is kept.
pub(crate) trait RowCodec: Sized + Clone {
    const KIND: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Columns without which no row of the file can be decoded.
    const REQUIRED: &'static [&'static str];

    fn decode(
        row: &RowView<'_>,
        seq: u32,
        warnings: &mut Vec<Diagnostic>,
    ) -> Result<Self, Diagnostic>;
    fn encode(&self) -> Vec<String>;
    fn seq(&self) -> u32;
}

pub(crate) fn encode_all<T: RowCodec>(items: &[T]) -> RowSet {
    let mut set = RowSet::with_columns(T::COLUMNS);
    for item in items {
        set.push(item.encode());
    }
    set
}

fn cell<'a>(row: &RowView<'a>, column: &str) -> Option<&'a str> {
    Some(row.get(column).trim()).filter(|value| !value.is_empty())
}

fn required(row: &RowView<'_>, column: &str) -> Result<String, Diagnostic> {
    cell(row, column)
        .map(str::to_string)
        .ok_or_else(|| Diagnostic::cell(row.number(), column, "value is required"))
}

fn optional_date(
    row: &RowView<'_>,
    column: &str,
    warnings: &mut Vec<Diagnostic>,
) -> Option<Timestamp> {
    match Timestamp::parse_flexible(row.get(column)) {
        Ok(value) => value,
        Err(err) => {
            warnings.push(Diagnostic::cell(
                row.number(),
                column,
                format!("{err}; left empty"),
            ));
            None
        }
    }
}

/// Whole non-negative counts; spreadsheet exports sometimes write `250.0`.
fn parse_count(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0);
    }
    if let Ok(count) = value.parse::<u32>() {
        return Some(count);
    }
    let float = value.parse::<f64>().ok()?;
    if float.is_nan() {
        return Some(0);
    }
    (float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= f64::from(u32::MAX))
        .then_some(float as u32)
}

fn render(value: Option<Timestamp>) -> String {
    value.map(Timestamp::render).unwrap_or_default()
}

impl RowCodec for VillageRecord {
    const KIND: &'static str = "village";
    const COLUMNS: &'static [&'static str] = VILLAGE_COLUMNS;
    const REQUIRED: &'static [&'static str] = VILLAGE_REQUIRED;

    fn decode(
        row: &RowView<'_>,
        seq: u32,
        warnings: &mut Vec<Diagnostic>,
    ) -> Result<Self, Diagnostic> {
        let village_name = required(row, VILLAGE_NAME)?;
        let municipal_zone = required(row, MUNICIPAL_ZONE)?;
        let current_phase = required(row, CURRENT_PHASE)?;
        let status = required(row, STATUS)?
            .parse::<VillageStatus>()
            .map_err(|err| Diagnostic::cell(row.number(), STATUS, err.to_string()))?;

        let total_properties = match parse_count(row.get(TOTAL_PROPERTIES)) {
            Some(count) => count,
            None => {
                warnings.push(Diagnostic::cell(
                    row.number(),
                    TOTAL_PROPERTIES,
                    format!("'{}' is not a property count; using 0", row.get(TOTAL_PROPERTIES)),
                ));
                0
            }
        };

        let mut milestones = MilestoneDates::default();
        for field in MilestoneField::ALL {
            milestones.set(field, optional_date(row, milestone_column(field), warnings));
        }

        Ok(VillageRecord {
            id: VillageId::from_seq(seq),
            village_name,
            municipal_zone,
            current_phase,
            status,
            last_updated: optional_date(row, LAST_UPDATED, warnings),
            hdm_jdm: cell(row, HDM_JDM).map(str::to_string),
            atp_mtp: cell(row, ATP_MTP).map(str::to_string),
            arro_officer: cell(row, ARRO_OFFICER).map(str::to_string),
            total_properties,
            milestones,
        })
    }

    fn encode(&self) -> Vec<String> {
        let mut out = vec![
            self.village_name.clone(),
            self.municipal_zone.clone(),
            self.current_phase.clone(),
            self.status.as_str().to_string(),
            render(self.last_updated),
            self.hdm_jdm.clone().unwrap_or_default(),
            self.atp_mtp.clone().unwrap_or_default(),
            self.arro_officer.clone().unwrap_or_default(),
            self.total_properties.to_string(),
        ];
        out.extend(
            VILLAGE_COLUMNS[out.len()..]
                .iter()
                .map(|column| {
                    MilestoneField::ALL
                        .into_iter()
                        .find(|field| milestone_column(*field) == *column)
                        .and_then(|field| self.milestones.get(field))
                })
                .map(render),
        );
        out
    }

    fn seq(&self) -> u32 {
        self.id.seq()
    }
}

impl RowCodec for RemarkEntry {
    const KIND: &'static str = "remark";
    const COLUMNS: &'static [&'static str] = REMARK_COLUMNS;
    const REQUIRED: &'static [&'static str] = REMARK_REQUIRED;

    fn decode(
        row: &RowView<'_>,
        seq: u32,
        _warnings: &mut Vec<Diagnostic>,
    ) -> Result<Self, Diagnostic> {
        let date = Timestamp::parse_flexible(row.get(DATE))
            .map_err(|err| Diagnostic::cell(row.number(), DATE, err.to_string()))?
            .ok_or_else(|| Diagnostic::cell(row.number(), DATE, "value is required"))?;
        let submission = NewRemark {
            official_name: required(row, OFFICIAL_NAME)?,
            department: required(row, DEPARTMENT)?,
            phase: cell(row, PHASE).map(str::to_string),
            village: cell(row, VILLAGE).map(str::to_string),
            remarks: required(row, REMARKS)?,
            help_required: row.get(HELP_REQUIRED).to_string(),
        };
        let status = match cell(row, STATUS) {
            None => RemarkStatus::Pending,
            Some(value) => value
                .parse::<RemarkStatus>()
                .map_err(|err| Diagnostic::cell(row.number(), STATUS, err.to_string()))?,
        };
        Ok(RemarkEntry::restore(
            RemarkId::from_seq(seq),
            date,
            submission,
            status,
            row.get(RESPONSE).to_string(),
        ))
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.date().render(),
            self.official_name().to_string(),
            self.department().to_string(),
            self.phase().unwrap_or_default().to_string(),
            self.village().unwrap_or_default().to_string(),
            self.remarks().to_string(),
            self.help_required().to_string(),
            self.status().as_str().to_string(),
            self.response().to_string(),
        ]
    }

    fn seq(&self) -> u32 {
        self.id().seq()
    }
}
