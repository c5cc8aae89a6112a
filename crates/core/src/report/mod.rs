//! Reports: categories, submission payloads, status lifecycle and tracking codes.

pub mod details;
pub mod error;
pub mod kind;
pub mod status;
pub mod tracking;

pub use details::{
    BusinessReputationDetails, DeviceDetails, HackedAccountDetails, HouseholdItemDetails,
    PersonDetails, PersonalBelongingDetails, ReportDetails, VehicleDetails,
};
pub use error::ReportError;
pub use kind::ReportKind;
pub use status::{ReportStatus, ReportWorkflow};
