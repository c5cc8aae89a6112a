//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod asset;
pub mod geography;
pub mod payment;
pub mod profile;
pub mod report;
pub mod roi;
pub mod support;

pub use asset::{AssetRepository, CreateAssetInput, UpdateAssetInput};
pub use geography::GeographyRepository;
pub use payment::{NewPayment, PaymentRepoError, PaymentRepository, SettledPayment};
pub use profile::{CreateProfileInput, ProfileRepository, UpdateProfileInput, to_access_profile};
pub use report::{CreatedReport, NewReport, ReportRepository, ReportRow};
pub use roi::{RoiRepoError, RoiRepository};
pub use support::{SupportRepoError, SupportRepository};
