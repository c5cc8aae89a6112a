//! Kind-specific submission payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ReportError;
use super::kind::ReportKind;
use crate::pricing::ReportDescriptor;

const MAX_TEXT_LEN: usize = 500;
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;
const MAX_AGE: i32 = 150;

/// Missing person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetails {
    /// Name of the missing person.
    pub full_name: String,
    /// Age in years; drives the fee.
    #[serde(default)]
    pub age: Option<i32>,
    /// Gender as reported.
    #[serde(default)]
    pub gender: Option<String>,
    /// Where they were last seen.
    #[serde(default)]
    pub last_seen_location: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Stolen or lost device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDetails {
    /// `phone`, `laptop`, `tablet`, ...
    pub device_type: String,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// IMEI for phones.
    #[serde(default)]
    pub imei: Option<String>,
    /// Manufacturer serial number.
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Model year.
    #[serde(default)]
    pub year: Option<i32>,
}

/// Stolen vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDetails {
    /// `car`, `motorcycle`, ...
    pub vehicle_type: String,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Model year; drives the fee.
    #[serde(default)]
    pub year: Option<i32>,
    /// VIN or chassis number.
    #[serde(default)]
    pub chassis_number: Option<String>,
    /// Registration plate.
    #[serde(default)]
    pub plate_number: Option<String>,
    /// Body colour.
    #[serde(default)]
    pub color: Option<String>,
}

/// Stolen household item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdItemDetails {
    /// What was taken.
    pub item_name: String,
    /// Manufacturer.
    #[serde(default)]
    pub brand: Option<String>,
    /// Model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Serial number.
    #[serde(default)]
    pub serial_number: Option<String>,
}

/// Lost personal belonging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalBelongingDetails {
    /// What was lost.
    pub item_name: String,
    /// Brand, if any.
    #[serde(default)]
    pub brand: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Compromised account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HackedAccountDetails {
    /// Service the account lives on.
    pub platform: String,
    /// Username, email or handle.
    pub account_identifier: String,
    /// What happened.
    #[serde(default)]
    pub description: Option<String>,
}

/// Business reputation dispute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessReputationDetails {
    /// Business being reported.
    pub business_name: String,
    /// Person named in the dispute.
    #[serde(default)]
    pub reported_name: Option<String>,
    /// What happened.
    #[serde(default)]
    pub description: Option<String>,
}

/// A validated-shape submission for one of the seven kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDetails {
    /// Missing person.
    Person(PersonDetails),
    /// Device.
    Device(DeviceDetails),
    /// Vehicle.
    Vehicle(VehicleDetails),
    /// Household item.
    HouseholdItem(HouseholdItemDetails),
    /// Personal belonging.
    PersonalBelonging(PersonalBelongingDetails),
    /// Hacked account.
    HackedAccount(HackedAccountDetails),
    /// Business reputation.
    BusinessReputation(BusinessReputationDetails),
}

impl ReportDetails {
    /// Decodes a JSON body for the given kind.
    pub fn from_json(kind: ReportKind, value: Value) -> Result<Self, ReportError> {
        fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ReportError> {
            serde_json::from_value(value).map_err(|e| ReportError::Invalid(e.to_string()))
        }

        Ok(match kind {
            ReportKind::Person => Self::Person(decode(value)?),
            ReportKind::Device => Self::Device(decode(value)?),
            ReportKind::Vehicle => Self::Vehicle(decode(value)?),
            ReportKind::HouseholdItem => Self::HouseholdItem(decode(value)?),
            ReportKind::PersonalBelonging => Self::PersonalBelonging(decode(value)?),
            ReportKind::HackedAccount => Self::HackedAccount(decode(value)?),
            ReportKind::BusinessReputation => Self::BusinessReputation(decode(value)?),
        })
    }

    /// Returns the report kind.
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::Person(_) => ReportKind::Person,
            Self::Device(_) => ReportKind::Device,
            Self::Vehicle(_) => ReportKind::Vehicle,
            Self::HouseholdItem(_) => ReportKind::HouseholdItem,
            Self::PersonalBelonging(_) => ReportKind::PersonalBelonging,
            Self::HackedAccount(_) => ReportKind::HackedAccount,
            Self::BusinessReputation(_) => ReportKind::BusinessReputation,
        }
    }

    /// Checks required fields and numeric ranges.
    pub fn validate(&self) -> Result<(), ReportError> {
        match self {
            Self::Person(d) => {
                required("full_name", &d.full_name)?;
                optional(&[&d.gender, &d.last_seen_location, &d.description])?;
                if let Some(age) = d.age
                    && !(0..=MAX_AGE).contains(&age)
                {
                    return Err(ReportError::Invalid(format!(
                        "age must be between 0 and {MAX_AGE}"
                    )));
                }
            }
            Self::Device(d) => {
                required("device_type", &d.device_type)?;
                required("brand", &d.brand)?;
                required("model", &d.model)?;
                optional(&[&d.imei, &d.serial_number])?;
                year_in_range(d.year)?;
            }
            Self::Vehicle(d) => {
                required("vehicle_type", &d.vehicle_type)?;
                required("brand", &d.brand)?;
                required("model", &d.model)?;
                optional(&[&d.chassis_number, &d.plate_number, &d.color])?;
                year_in_range(d.year)?;
            }
            Self::HouseholdItem(d) => {
                required("item_name", &d.item_name)?;
                optional(&[&d.brand, &d.model, &d.serial_number])?;
            }
            Self::PersonalBelonging(d) => {
                required("item_name", &d.item_name)?;
                optional(&[&d.brand, &d.description])?;
            }
            Self::HackedAccount(d) => {
                required("platform", &d.platform)?;
                required("account_identifier", &d.account_identifier)?;
                optional(&[&d.description])?;
            }
            Self::BusinessReputation(d) => {
                required("business_name", &d.business_name)?;
                optional(&[&d.reported_name, &d.description])?;
            }
        }
        Ok(())
    }

    /// Builds the pricing descriptor for this submission.
    #[must_use]
    pub fn descriptor(&self) -> ReportDescriptor {
        let mut descriptor = ReportDescriptor::for_kind(self.kind());
        match self {
            Self::Person(d) => descriptor.age = d.age,
            Self::Device(d) => {
                descriptor.device_type = Some(d.device_type.clone());
                descriptor.brand = Some(d.brand.clone());
                descriptor.year = d.year;
            }
            Self::Vehicle(d) => descriptor.year = d.year,
            _ => {}
        }
        descriptor
    }

    /// Short human-readable title used in listings and emails.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Person(d) => d.full_name.clone(),
            Self::Device(d) => format!("{} {}", d.brand, d.model),
            Self::Vehicle(d) => format!("{} {}", d.brand, d.model),
            Self::HouseholdItem(d) => d.item_name.clone(),
            Self::PersonalBelonging(d) => d.item_name.clone(),
            Self::HackedAccount(d) => format!("{}: {}", d.platform, d.account_identifier),
            Self::BusinessReputation(d) => d.business_name.clone(),
        }
    }
}

fn required(field: &str, value: &str) -> Result<(), ReportError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ReportError::Invalid(format!("{field} is required")));
    }
    if value.len() > MAX_TEXT_LEN {
        return Err(ReportError::Invalid(format!("{field} is too long")));
    }
    Ok(())
}

fn optional(values: &[&Option<String>]) -> Result<(), ReportError> {
    if values
        .iter()
        .filter_map(|v| v.as_deref())
        .any(|v| v.len() > MAX_TEXT_LEN)
    {
        return Err(ReportError::Invalid(format!(
            "text fields are limited to {MAX_TEXT_LEN} bytes"
        )));
    }
    Ok(())
}

fn year_in_range(year: Option<i32>) -> Result<(), ReportError> {
    match year {
        Some(y) if !(MIN_YEAR..=MAX_YEAR).contains(&y) => Err(ReportError::Invalid(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}"
        ))),
        _ => Ok(()),
    }
}
