//! Station table parsing.
//!
//! Two JSON shapes are accepted, both objects keyed by station code:
//!
//! - the bundled subset: `{"name": {"ja", "kana", "en"}, "type", "location": {"lat", "lon", "alt"}}`
//! - JMA's `amedastable.json`: `{"type", "elems", "lat": [deg, min], "lon": [deg, min], "alt",
//!   "kjName", "knName", "enName"}`
//!
//! Entries may carry an explicit `"prefecture"` key; otherwise the prefecture
//! is derived from the regional block number of the code.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{GeoPoint, InvalidStationType, Prefecture, StationCode, StationType};

use super::error::DatasetError;
use super::record::{StationName, StationRecord};

/// The station subset compiled into the binary, used when the full JMA table
/// cannot be fetched.
pub const BUNDLED_TABLE: &str = include_str!("../../data/amedas_stations.json");

/// Entry in either accepted table shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Bundled(BundledEntry),
    JmaTable(JmaTableEntry),
}

#[derive(Debug, Deserialize)]
struct BundledEntry {
    code: Option<String>,
    name: BundledName,
    #[serde(rename = "type")]
    station_type: String,
    location: BundledLocation,
    prefecture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BundledName {
    ja: String,
    #[serde(default)]
    kana: String,
    #[serde(default)]
    en: String,
}

#[derive(Debug, Deserialize)]
struct BundledLocation {
    lat: f64,
    lon: f64,
    alt: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JmaTableEntry {
    #[serde(rename = "type")]
    station_type: String,
    elems: Option<String>,
    lat: [f64; 2],
    lon: [f64; 2],
    alt: Option<f64>,
    kj_name: String,
    #[serde(default)]
    kn_name: String,
    #[serde(default)]
    en_name: String,
    prefecture: Option<String>,
}

/// Parse a station table from JSON text.
///
/// Records are returned in ascending code order.
pub fn parse_table(json: &str) -> Result<Vec<StationRecord>, DatasetError> {
    parse_table_value(serde_json::from_str(json)?)
}

/// Parse an already-decoded station table, such as the one fetched from JMA.
pub fn parse_table_value(table: serde_json::Value) -> Result<Vec<StationRecord>, DatasetError> {
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_value(table)?;

    raw.into_iter()
        .map(|(key, value)| {
            let entry: RawEntry = serde_json::from_value(value).map_err(|e| DatasetError::Entry {
                code: key.clone(),
                message: format!("unrecognised entry shape: {e}"),
            })?;
            build_record(&key, entry)
        })
        .collect()
}

/// Read and parse a station table file.
pub fn read_table(path: &Path) -> Result<Vec<StationRecord>, DatasetError> {
    let json = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&json)
}

fn build_record(key: &str, entry: RawEntry) -> Result<StationRecord, DatasetError> {
    let entry_error = |message: String| DatasetError::Entry {
        code: key.to_string(),
        message,
    };

    let code = StationCode::parse(key).map_err(|e| entry_error(e.to_string()))?;

    let (name, type_letter, location, altitude_m, elements, prefecture_key) = match entry {
        RawEntry::Bundled(e) => {
            if let Some(inner) = e.code.as_deref()
                && inner != key
            {
                return Err(entry_error(format!("code field {inner:?} does not match key")));
            }
            let location = GeoPoint::new(e.location.lat, e.location.lon)
                .map_err(|err| entry_error(err.to_string()))?;
            let name = StationName {
                ja: e.name.ja,
                kana: e.name.kana,
                en: e.name.en,
            };
            (name, e.station_type, location, e.location.alt, None, e.prefecture)
        }
        RawEntry::JmaTable(e) => {
            let location = GeoPoint::from_degrees_minutes(e.lat, e.lon)
                .map_err(|err| entry_error(err.to_string()))?;
            let name = StationName {
                ja: e.kj_name,
                kana: e.kn_name,
                en: e.en_name,
            };
            (name, e.station_type, location, e.alt, e.elems, e.prefecture)
        }
    };

    let station_type: StationType = type_letter
        .parse()
        .map_err(|e: InvalidStationType| entry_error(e.to_string()))?;

    let prefecture = match prefecture_key {
        Some(k) => Prefecture::by_key(&k)
            .ok_or_else(|| entry_error(format!("unknown prefecture {k:?}")))?,
        None => Prefecture::for_station(code).ok_or_else(|| {
            entry_error(format!("no prefecture for block {:02}", code.block()))
        })?,
    };

    Ok(StationRecord {
        code,
        name,
        station_type,
        location,
        altitude_m,
        elements,
        prefecture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_bundled_shape() {
        let json = r#"{
            "44132": {
                "code": "44132",
                "name": {"ja": "東京", "kana": "トウキョウ", "en": "Tokyo"},
                "type": "A",
                "location": {"lat": 35.6917, "lon": 139.75, "alt": 25.2}
            }
        }"#;

        let records = parse_table(json).unwrap();
        assert_eq!(records.len(), 1);
        let tokyo = &records[0];
        assert_eq!(tokyo.code.as_str(), "44132");
        assert_eq!(tokyo.name.en, "Tokyo");
        assert_eq!(tokyo.station_type, StationType::A);
        assert_eq!(tokyo.altitude_m, Some(25.2));
        assert_eq!(tokyo.prefecture.key, "tokyo");
        assert!(tokyo.elements.is_none());
    }

    #[test]
    fn parses_jma_table_shape() {
        let json = r#"{
            "11001": {
                "type": "C",
                "elems": "11112010",
                "lat": [45, 31.2],
                "lon": [141, 56.1],
                "alt": 26,
                "kjName": "宗谷岬",
                "knName": "ソウヤミサキ",
                "enName": "Soyamisaki"
            }
        }"#;

        let records = parse_table(json).unwrap();
        let rec = &records[0];
        assert_eq!(rec.name.ja, "宗谷岬");
        assert_eq!(rec.station_type, StationType::C);
        assert!((rec.location.lat() - 45.52).abs() < 1e-9);
        assert!((rec.location.lon() - 141.935).abs() < 1e-9);
        assert_eq!(rec.elements.as_deref(), Some("11112010"));
        assert_eq!(rec.prefecture.key, "hokkaido_sapporo");
    }

    #[test]
    fn records_are_sorted_by_code() {
        let json = r#"{
            "62078": {"name": {"ja": "大阪"}, "type": "A", "location": {"lat": 34.68, "lon": 135.52}},
            "44132": {"name": {"ja": "東京"}, "type": "A", "location": {"lat": 35.69, "lon": 139.75}}
        }"#;

        let records = parse_table(json).unwrap();
        let codes: Vec<_> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["44132", "62078"]);
    }

    #[test]
    fn rejects_unknown_type() {
        let json = r#"{
            "44132": {"name": {"ja": "東京"}, "type": "Z", "location": {"lat": 35.69, "lon": 139.75}}
        }"#;

        let err = parse_table(json).unwrap_err();
        assert!(matches!(err, DatasetError::Entry { ref code, .. } if code == "44132"));
        assert!(err.to_string().contains("invalid station type"));

        let json = r#"{
            "44132": {"name": {"ja": "東京"}, "type": "a", "location": {"lat": 35.69, "lon": 139.75}}
        }"#;
        assert!(parse_table(json).is_err());
    }

    #[test]
    fn rejects_bad_code() {
        let json = r#"{
            "4413": {"name": {"ja": "東京"}, "type": "A", "location": {"lat": 35.69, "lon": 139.75}}
        }"#;

        assert!(matches!(
            parse_table(json),
            Err(DatasetError::Entry { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let json = r#"{
            "44132": {"name": {"ja": "東京"}, "type": "A", "location": {"lat": 135.69, "lon": 139.75}}
        }"#;

        let err = parse_table(json).unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn rejects_unknown_block_without_explicit_prefecture() {
        let json = r#"{
            "99001": {"name": {"ja": "架空"}, "type": "C", "location": {"lat": 35.0, "lon": 139.0}}
        }"#;
        assert!(parse_table(json).is_err());

        let json = r#"{
            "99001": {"name": {"ja": "架空"}, "type": "C", "location": {"lat": 35.0, "lon": 139.0},
                      "prefecture": "tokyo"}
        }"#;
        let records = parse_table(json).unwrap();
        assert_eq!(records[0].prefecture.key, "tokyo");
    }

    #[test]
    fn rejects_mismatched_inner_code() {
        let json = r#"{
            "44132": {"code": "44133", "name": {"ja": "東京"}, "type": "A",
                      "location": {"lat": 35.69, "lon": 139.75}}
        }"#;
        assert!(parse_table(json).is_err());
    }

    #[test]
    fn rejects_unrecognised_shape() {
        let json = r#"{"44132": {"foo": 1}}"#;
        let err = parse_table(json).unwrap_err();
        assert!(err.to_string().contains("unrecognised entry shape"));
    }

    #[test]
    fn rejects_non_object() {
        assert!(matches!(parse_table("[]"), Err(DatasetError::Json(_))));
    }

    #[test]
    fn reads_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"62078": {{"name": {{"ja": "大阪", "en": "Osaka"}}, "type": "A",
                 "location": {{"lat": 34.6817, "lon": 135.5183}}}}}}"#
        )
        .unwrap();

        let records = read_table(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prefecture.key, "osaka");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_table(Path::new("/nonexistent/stations.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn bundled_table_parses() {
        let records = parse_table(BUNDLED_TABLE).unwrap();
        assert!(!records.is_empty());
        assert!(records.iter().any(|r| r.code.as_str() == "44132"));
    }
}
