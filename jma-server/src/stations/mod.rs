//! AMeDAS station directory.
//!
//! Loads the station table once at startup and answers code lookups, name
//! and type searches, pagination and geospatial queries against it.

mod dataset;
mod directory;
mod error;
#[cfg(test)]
pub(crate) mod fixture;
mod geo;
mod record;

pub use dataset::{BUNDLED_TABLE, parse_table, parse_table_value, read_table};
pub use directory::{Nearby, Page, PageRequest, StationDirectory, TypeMatches};
pub use error::{DatasetError, StationError};
pub use geo::{EARTH_RADIUS_KM, haversine_km, nearest, within_radius};
pub use record::{StationName, StationRecord};
