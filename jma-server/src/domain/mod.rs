//! Domain types for the JMA station directory.
//!
//! This module contains the validated value types shared by the station
//! directory, the remote client and the dispatcher. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod geo;
mod prefecture;
mod station;

pub use geo::{GeoPoint, InvalidCoordinates};
pub use prefecture::Prefecture;
pub use station::{InvalidStationCode, InvalidStationType, StationCode, StationType};
