//! `SeaORM` entity definitions.

pub mod anonymous_messages;
pub mod business_reputation_reports;
pub mod company_assets;
pub mod countries;
pub mod devices;
pub mod hacked_accounts;
pub mod household_items;
pub mod personal_belongings;
pub mod persons;
pub mod profiles;
pub mod provinces;
pub mod roi_distributions;
pub mod roi_withdrawal_requests;
pub mod support_tickets;
pub mod transactions;
pub mod vehicles;
