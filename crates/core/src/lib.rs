//! Core business logic for YaraCheck.
//!
//! This crate contains the domain rules with no web or database dependencies.
//! The only I/O it does is the payment gateway's outbound HTTPS.
//!
//! # Modules
//!
//! - `pricing` - Report fee table
//! - `access` - Capabilities, landing dashboard, geographic scope
//! - `report` - Report kinds, submission payloads, status lifecycle, tracking codes
//! - `search` - Tracking-code search input and merging
//! - `roi` - Shareholder distributions and withdrawals
//! - `payment` - Stripe, Paystack and Flutterwave checkouts
//! - `support` - Support tickets and anonymous messages
//! - `auth` - Password hashing and roles

pub mod access;
pub mod auth;
pub mod payment;
pub mod pricing;
pub mod report;
pub mod roi;
pub mod search;
pub mod support;
