//! Response shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::domain::Prefecture;
use crate::jma::time::jst_label;
use crate::jma::{Observation, TimedObservation};
use crate::stations::{Nearby, StationRecord};

/// Round to two decimal places.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Station names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameResult {
    pub ja: String,
    pub kana: String,
    pub en: String,
}

/// Station position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationResult {
    pub lat: f64,
    pub lon: f64,
    /// Altitude in metres
    pub alt: Option<f64>,
}

/// A station in responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationResult {
    /// Five-digit station code
    pub code: String,

    pub name: NameResult,

    /// Type letter A-F
    #[serde(rename = "type")]
    pub station_type: String,

    /// Human-readable type
    pub type_description: String,

    pub location: LocationResult,

    /// Prefecture key, usable with `get_forecast`
    pub prefecture: String,

    /// JMA sensor mask, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<String>,

    /// Distance from the query point in km, for geographic queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl StationResult {
    pub fn from_record(record: &StationRecord) -> Self {
        Self {
            code: record.code.to_string(),
            name: NameResult {
                ja: record.name.ja.clone(),
                kana: record.name.kana.clone(),
                en: record.name.en.clone(),
            },
            station_type: record.station_type.to_string(),
            type_description: record.station_type.description().to_string(),
            location: LocationResult {
                lat: record.location.lat(),
                lon: record.location.lon(),
                alt: record.altitude_m,
            },
            prefecture: record.prefecture.key.to_string(),
            elements: record.elements.clone(),
            distance_km: None,
        }
    }

    pub fn from_nearby(nearby: &Nearby<'_>) -> Self {
        Self {
            distance_km: Some(round2(nearby.distance_km)),
            ..Self::from_record(nearby.station)
        }
    }
}

/// Station list.
#[derive(Debug, Clone, Serialize)]
pub struct StationListResult {
    pub count: usize,
    pub stations: Vec<StationResult>,
}

impl StationListResult {
    pub fn new<'a>(records: impl IntoIterator<Item = &'a StationRecord>) -> Self {
        let stations: Vec<_> = records.into_iter().map(StationResult::from_record).collect();
        Self {
            count: stations.len(),
            stations,
        }
    }
}

/// Query point for a nearby search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Stations around a point, closest first.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyResult {
    pub count: usize,
    pub search_center: SearchCenter,
    pub radius_km: f64,
    pub stations: Vec<StationResult>,
}

/// Stations of one type.
#[derive(Debug, Clone, Serialize)]
pub struct StationTypeResult {
    pub count: usize,
    #[serde(rename = "type")]
    pub station_type: String,
    pub type_description: String,
    pub stations: Vec<StationResult>,
}

/// One page of the station listing.
#[derive(Debug, Clone, Serialize)]
pub struct StationPageResult {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub count: usize,
    pub stations: Vec<StationResult>,
}

/// Latest snapshot for every reporting station.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResult {
    pub observation_time: String,
    pub observation_time_jst: String,
    pub count: usize,
    pub stations: BTreeMap<String, Observation>,
}

/// One station's observation at one time.
#[derive(Debug, Clone, Serialize)]
pub struct StationWeatherResult {
    pub observation_time: String,
    pub observation_time_jst: String,
    pub station: StationResult,
    pub weather: Observation,
}

impl StationWeatherResult {
    pub fn new(time: DateTime<FixedOffset>, station: StationResult, weather: Observation) -> Self {
        Self {
            observation_time: time.to_rfc3339(),
            observation_time_jst: jst_label(time),
            station,
            weather,
        }
    }
}

/// A prefecture forecast document.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub prefecture: String,
    pub prefecture_name: String,
    pub area_code: String,
    pub forecast: serde_json::Value,
}

/// A forecast prefecture.
#[derive(Debug, Clone, Serialize)]
pub struct PrefectureResult {
    pub key: String,
    pub area_code: String,
    pub name: String,
    /// Number of directory stations in the prefecture
    pub station_count: usize,
}

impl PrefectureResult {
    pub fn new(prefecture: &Prefecture, station_count: usize) -> Self {
        Self {
            key: prefecture.key.to_string(),
            area_code: prefecture.area_code.to_string(),
            name: prefecture.name.to_string(),
            station_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrefectureListResult {
    pub count: usize,
    pub prefectures: Vec<PrefectureResult>,
}

/// One point in a time series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPointResult {
    pub observation_time: String,
    pub observation_time_jst: String,
    pub weather: Observation,
}

impl From<TimedObservation> for SeriesPointResult {
    fn from(point: TimedObservation) -> Self {
        Self {
            observation_time: point.time.to_rfc3339(),
            observation_time_jst: jst_label(point.time),
            weather: point.observation,
        }
    }
}

/// A station's observations over a window.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesResult {
    pub station: StationResult,
    pub hours: u32,
    pub interval_minutes: u32,
    pub start_time: String,
    pub end_time: String,
    pub count: usize,
    pub data: Vec<SeriesPointResult>,
}

/// Any successful response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Station(StationResult),
    StationList(StationListResult),
    Nearby(NearbyResult),
    StationType(StationTypeResult),
    StationPage(StationPageResult),
    Snapshot(SnapshotResult),
    StationWeather(StationWeatherResult),
    Forecast(ForecastResult),
    PrefectureList(PrefectureListResult),
    TimeSeries(TimeSeriesResult),
}

impl Response {
    /// Pretty-printed JSON with non-ASCII text left unescaped.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::StationDirectory;
    use serde_json::json;

    #[test]
    fn station_result_shape() {
        let dir = StationDirectory::bundled().unwrap();
        let tokyo = dir.get_by_code("44132").unwrap();
        let value = serde_json::to_value(StationResult::from_record(tokyo)).unwrap();

        assert_eq!(value["code"], json!("44132"));
        assert_eq!(value["name"]["ja"], json!("東京"));
        assert_eq!(value["name"]["kana"], json!("トウキョウ"));
        assert_eq!(value["type"], json!("A"));
        assert_eq!(value["location"]["lat"], json!(35.6917));
        assert_eq!(value["prefecture"], json!("tokyo"));
        assert!(value.get("distance_km").is_none());
    }

    #[test]
    fn nearby_distance_is_rounded() {
        let dir = StationDirectory::bundled().unwrap();
        let nearby = dir.find_nearest(35.6812, 139.7671).unwrap();
        let result = StationResult::from_nearby(&nearby);
        let d = result.distance_km.unwrap();
        assert_eq!(d, round2(d));
        assert!((d - 1.94).abs() < 0.01);
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(1.235001), 1.24);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn pretty_json_keeps_japanese() {
        let dir = StationDirectory::bundled().unwrap();
        let tokyo = dir.get_by_code("44132").unwrap();
        let text = Response::Station(StationResult::from_record(tokyo))
            .to_json_pretty()
            .unwrap();
        assert!(text.contains("東京"));
        assert!(text.contains("\n  \"code\": \"44132\""));
    }
}
