//! Report fees.
//!
//! - `types` - Submission descriptor, device types, quotes
//! - `table` - The bracketed fee table (`calculate_price`)

pub mod table;
pub mod types;

#[cfg(test)]
mod table_props;

pub use table::{DEFAULT_FEE_CENTS, calculate_price, quote};
pub use types::{DeviceType, PriceQuote, ReportDescriptor};
