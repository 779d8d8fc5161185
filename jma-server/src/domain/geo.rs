//! Geographic coordinate type.

use serde::Serialize;

/// Error returned when coordinates are out of range or not finite.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidCoordinates {
    #[error("latitude {0} out of range: must be between -90 and 90")]
    Latitude(f64),

    #[error("longitude {0} out of range: must be between -180 and 180")]
    Longitude(f64),
}

/// A WGS84 point in decimal degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Create a point, validating both coordinates.
    ///
    /// ```
    /// use jma_server::domain::GeoPoint;
    ///
    /// let tokyo = GeoPoint::new(35.6917, 139.75).unwrap();
    /// assert_eq!(tokyo.lat(), 35.6917);
    ///
    /// assert!(GeoPoint::new(91.0, 0.0).is_err());
    /// assert!(GeoPoint::new(0.0, f64::NAN).is_err());
    /// ```
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinates> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinates::Latitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinates::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Create a point from JMA's degree/minute pairs (e.g. `[35, 41.5]`).
    pub fn from_degrees_minutes(lat: [f64; 2], lon: [f64; 2]) -> Result<Self, InvalidCoordinates> {
        Self::new(lat[0] + lat[1] / 60.0, lon[0] + lon[1] / 60.0)
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}
