#![forbid(unsafe_code)]

pub mod aggregate;
pub mod catalog;
pub mod clock;
pub mod ids;
pub mod milestones;
pub mod remark;
pub mod timestamp;
pub mod village;

pub use catalog::{PhaseCatalog, PhaseInfo, ResponsibilityEntry};
pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{IdParseError, RemarkId, VillageId};
pub use milestones::{MilestoneDates, MilestoneField, OrderViolation};
pub use remark::{NewRemark, RemarkEntry, RemarkFilter, RemarkStatus};
pub use timestamp::{Timestamp, TimestampParseError};
pub use village::{
    NewVillage, RequiredFieldError, StatusParseError, Track, VillageChanges, VillageRecord,
    VillageStatus,
};
