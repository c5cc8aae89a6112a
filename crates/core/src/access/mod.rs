//! Access control: capabilities, landing dashboard and geographic scope.
//!
//! Everything here is recomputed from the stored profile on each request.

pub mod capability;
pub mod dashboard;
pub mod profile;
pub mod scope;

#[cfg(test)]
mod capability_props;

pub use capability::{Capability, has, require, resolve_all};
pub use dashboard::{Dashboard, landing_dashboard};
pub use profile::Profile;
pub use scope::{GeoScope, ScopeResolution, resolve as resolve_scope};
