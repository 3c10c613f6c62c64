#![forbid(unsafe_code)]

//! Column names of the three data files, in export order.

use sv_core::MilestoneField;

pub const VILLAGE_NAME: &str = "Village_Name";
pub const MUNICIPAL_ZONE: &str = "Municipal_Zone";
pub const CURRENT_PHASE: &str = "Current_Phase";
pub const STATUS: &str = "Status";
pub const LAST_UPDATED: &str = "Last_Updated";
pub const HDM_JDM: &str = "HDM_JDM";
pub const ATP_MTP: &str = "ATP_MTP";
pub const ARRO_OFFICER: &str = "ARRO_Officer";
pub const TOTAL_PROPERTIES: &str = "Total_Properties";

pub const VILLAGE_COLUMNS: &[&str] = &[
    VILLAGE_NAME,
    MUNICIPAL_ZONE,
    CURRENT_PHASE,
    STATUS,
    LAST_UPDATED,
    HDM_JDM,
    ATP_MTP,
    ARRO_OFFICER,
    TOTAL_PROPERTIES,
    "Survey_Date",
    "Notification_Date",
    "Drone_Survey_Date",
    "Map1_Date",
    "Ground_Truthing_Date",
    "Map2_Date",
    "Pasting_Start_Date",
    "Objections_Date",
    "Map3_Date",
    "Cards_Issued_Date",
];

/// Minimum columns a bulk import must carry.
pub const VILLAGE_REQUIRED: &[&str] = &[VILLAGE_NAME, MUNICIPAL_ZONE, CURRENT_PHASE, STATUS];

pub fn milestone_column(field: MilestoneField) -> &'static str {
    match field {
        MilestoneField::Notification => "Notification_Date",
        MilestoneField::Survey => "Survey_Date",
        MilestoneField::DroneSurvey => "Drone_Survey_Date",
        MilestoneField::Map1 => "Map1_Date",
        MilestoneField::GroundTruthing => "Ground_Truthing_Date",
        MilestoneField::Map2 => "Map2_Date",
        MilestoneField::PastingStart => "Pasting_Start_Date",
        MilestoneField::Objections => "Objections_Date",
        MilestoneField::Map3 => "Map3_Date",
        MilestoneField::CardsIssued => "Cards_Issued_Date",
    }
}

pub const DATE: &str = "Date";
pub const OFFICIAL_NAME: &str = "Official_Name";
pub const DEPARTMENT: &str = "Department";
pub const PHASE: &str = "Phase";
pub const VILLAGE: &str = "Village";
pub const REMARKS: &str = "Remarks";
pub const HELP_REQUIRED: &str = "Help_Required";
pub const RESPONSE: &str = "Response";

pub const REMARK_COLUMNS: &[&str] = &[
    DATE,
    OFFICIAL_NAME,
    DEPARTMENT,
    PHASE,
    VILLAGE,
    REMARKS,
    HELP_REQUIRED,
    STATUS,
    RESPONSE,
];

pub const REMARK_REQUIRED: &[&str] = &[DATE, OFFICIAL_NAME, DEPARTMENT, REMARKS];

pub const RESPONSIBLE_DEPARTMENT: &str = "Responsible_Department";
pub const PRIMARY_CONTACT: &str = "Primary_Contact";
pub const CONTACT_INFO: &str = "Contact_Info";

pub const RESPONSIBILITY_COLUMNS: &[&str] =
    &[PHASE, RESPONSIBLE_DEPARTMENT, PRIMARY_CONTACT, CONTACT_INFO];
