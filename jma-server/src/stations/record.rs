//! Station record model.

use serde::Serialize;

use crate::domain::{GeoPoint, Prefecture, StationCode, StationType};

/// Station names in the three scripts JMA publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationName {
    /// Japanese name (kanji), e.g. "東京".
    pub ja: String,
    /// Katakana reading, e.g. "トウキョウ". May be empty.
    pub kana: String,
    /// Romanised name, e.g. "Tokyo". May be empty.
    pub en: String,
}

/// One physical observation station.
///
/// Records are built once when the directory loads and are only handed out
/// by shared reference afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub code: StationCode,
    pub name: StationName,
    pub station_type: StationType,
    pub location: GeoPoint,
    /// Height above sea level in metres, when known.
    pub altitude_m: Option<f64>,
    /// JMA sensor mask (e.g. "11112010"), when the source table carries it.
    pub elements: Option<String>,
    pub prefecture: &'static Prefecture,
}
