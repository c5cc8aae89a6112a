//! The seven report categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Report category. Each kind lives in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Missing person.
    Person,
    /// Stolen or lost device.
    Device,
    /// Stolen vehicle.
    Vehicle,
    /// Stolen household item.
    HouseholdItem,
    /// Lost personal belonging.
    PersonalBelonging,
    /// Compromised online account.
    HackedAccount,
    /// Business reputation dispute.
    BusinessReputation,
}

impl ReportKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 7] = [
        Self::Person,
        Self::Device,
        Self::Vehicle,
        Self::HouseholdItem,
        Self::PersonalBelonging,
        Self::HackedAccount,
        Self::BusinessReputation,
    ];

    /// Returns the canonical tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Device => "device",
            Self::Vehicle => "vehicle",
            Self::HouseholdItem => "household_item",
            Self::PersonalBelonging => "personal_belonging",
            Self::HackedAccount => "hacked_account",
            Self::BusinessReputation => "business_reputation",
        }
    }

    /// Parses a tag leniently: case, surrounding whitespace, dashes and
    /// table names are all accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "person" | "persons" | "missing_person" => Some(Self::Person),
            "device" | "devices" => Some(Self::Device),
            "vehicle" | "vehicles" => Some(Self::Vehicle),
            "household_item" | "household_items" | "household" => Some(Self::HouseholdItem),
            "personal_belonging" | "personal_belongings" | "belonging" => {
                Some(Self::PersonalBelonging)
            }
            "hacked_account" | "hacked_accounts" | "account" => Some(Self::HackedAccount),
            "business_reputation" | "business_reputation_reports" | "business" => {
                Some(Self::BusinessReputation)
            }
            _ => None,
        }
    }

    /// Returns the table holding this kind.
    #[must_use]
    pub const fn table_name(&self) -> &'static str {
        match self {
            Self::Person => "persons",
            Self::Device => "devices",
            Self::Vehicle => "vehicles",
            Self::HouseholdItem => "household_items",
            Self::PersonalBelonging => "personal_belongings",
            Self::HackedAccount => "hacked_accounts",
            Self::BusinessReputation => "business_reputation_reports",
        }
    }

    /// Returns the human-readable category label shown on search hits.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Person => "Missing Person",
            Self::Device => "Device",
            Self::Vehicle => "Vehicle",
            Self::HouseholdItem => "Household Item",
            Self::PersonalBelonging => "Personal Belonging",
            Self::HackedAccount => "Hacked Account",
            Self::BusinessReputation => "Business Reputation",
        }
    }

    /// Returns the three-letter segment used in tracking codes.
    #[must_use]
    pub const fn tracking_prefix(&self) -> &'static str {
        match self {
            Self::Person => "PER",
            Self::Device => "DEV",
            Self::Vehicle => "VEH",
            Self::HouseholdItem => "HHI",
            Self::PersonalBelonging => "PBL",
            Self::HackedAccount => "HAC",
            Self::BusinessReputation => "BRR",
        }
    }

    /// Finds the kind for a tracking-code segment.
    pub fn from_tracking_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.tracking_prefix().eq_ignore_ascii_case(prefix))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_round_trips_every_kind() {
        for kind in ReportKind::ALL {
            assert_eq!(ReportKind::parse(kind.as_str()), Some(kind));
            assert_eq!(ReportKind::parse(kind.table_name()), Some(kind));
        }
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(ReportKind::parse(" Household-Item "), Some(ReportKind::HouseholdItem));
        assert_eq!(ReportKind::parse("VEHICLE"), Some(ReportKind::Vehicle));
        assert_eq!(ReportKind::parse("spaceship"), None);
        assert_eq!(ReportKind::parse(""), None);
    }

    #[test]
    fn test_prefixes_and_tables_are_unique() {
        let prefixes: HashSet<_> = ReportKind::ALL.iter().map(|k| k.tracking_prefix()).collect();
        let tables: HashSet<_> = ReportKind::ALL.iter().map(|k| k.table_name()).collect();
        assert_eq!(prefixes.len(), 7);
        assert_eq!(tables.len(), 7);
    }

    #[test]
    fn test_from_tracking_prefix() {
        assert_eq!(ReportKind::from_tracking_prefix("veh"), Some(ReportKind::Vehicle));
        assert_eq!(ReportKind::from_tracking_prefix("BRR"), Some(ReportKind::BusinessReputation));
        assert_eq!(ReportKind::from_tracking_prefix("XYZ"), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_value(ReportKind::HackedAccount).unwrap(),
            "hacked_account"
        );
    }
}
