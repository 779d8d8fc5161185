//! In-memory station directory.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::domain::{GeoPoint, Prefecture, StationCode, StationType};

use super::dataset::{BUNDLED_TABLE, parse_table, parse_table_value, read_table};
use super::error::{DatasetError, StationError};
use super::geo;
use super::record::StationRecord;

/// A station paired with its distance from a query point.
#[derive(Debug, Clone, Copy)]
pub struct Nearby<'a> {
    pub station: &'a StationRecord,
    pub distance_km: f64,
}

/// Validated pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: usize,
    offset: usize,
}

impl PageRequest {
    /// Build a page request from caller-supplied values.
    ///
    /// Fails with `InvalidArgument` if either value is negative.
    pub fn new(limit: i64, offset: i64) -> Result<Self, StationError> {
        let limit = usize::try_from(limit)
            .map_err(|_| StationError::invalid("limit", format!("must be non-negative, got {limit}")))?;
        let offset = usize::try_from(offset).map_err(|_| {
            StationError::invalid("offset", format!("must be non-negative, got {offset}"))
        })?;
        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// One page of the canonical station listing.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub stations: Vec<&'a StationRecord>,
    /// Number of stations in the whole directory.
    pub total: usize,
}

/// The stations matching one type letter.
#[derive(Debug, Clone)]
pub struct TypeMatches<'a> {
    pub station_type: StationType,
    pub stations: Vec<&'a StationRecord>,
}

/// Lowercased, kana-folded names used for matching.
#[derive(Debug)]
struct SearchKey {
    ja: String,
    kana: String,
    en: String,
}

impl SearchKey {
    fn new(record: &StationRecord) -> Self {
        Self {
            ja: normalize(&record.name.ja),
            kana: normalize(&record.name.kana),
            en: normalize(&record.name.en),
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.ja.contains(query) || self.kana.contains(query) || self.en.contains(query)
    }
}

/// Lowercase and fold hiragana to katakana so either script matches readings.
fn normalize(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Read-only directory of every observation station.
///
/// Built once at startup and shared by reference (usually behind an `Arc`).
/// No method takes `&mut self`, so concurrent readers need no locking.
///
/// Stations are held in ascending code order, which is the canonical order
/// for listing, type filtering and name search results.
#[derive(Debug)]
pub struct StationDirectory {
    stations: Vec<StationRecord>,
    index: HashMap<StationCode, usize>,
    search_keys: Vec<SearchKey>,
}

impl StationDirectory {
    /// Build a directory from records.
    ///
    /// Fails if the records are empty or two records share a code.
    pub fn new(mut stations: Vec<StationRecord>) -> Result<Self, DatasetError> {
        if stations.is_empty() {
            return Err(DatasetError::Empty);
        }

        stations.sort_by_key(|s| s.code);

        let mut index = HashMap::with_capacity(stations.len());
        for (i, station) in stations.iter().enumerate() {
            if index.insert(station.code, i).is_some() {
                return Err(DatasetError::DuplicateCode(station.code));
            }
        }

        let search_keys = stations.iter().map(SearchKey::new).collect();

        Ok(Self {
            stations,
            index,
            search_keys,
        })
    }

    /// Build the directory from the table compiled into the binary.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json(BUNDLED_TABLE)
    }

    /// Build the directory from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Self::new(parse_table(json)?)
    }

    /// Build the directory from a decoded JSON table.
    pub fn from_value(table: serde_json::Value) -> Result<Self, DatasetError> {
        Self::new(parse_table_value(table)?)
    }

    /// Build the directory from a table file on disk.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        Self::new(read_table(path)?)
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Always false for a constructed directory.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// All stations in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &StationRecord> {
        self.stations.iter()
    }

    /// Look up a station by parsed code.
    pub fn get(&self, code: StationCode) -> Option<&StationRecord> {
        self.index.get(&code).map(|&i| &self.stations[i])
    }

    /// Exact lookup by code string.
    ///
    /// Any input that is not the code of a loaded station, including
    /// malformed codes, fails with `NotFound`.
    pub fn get_by_code(&self, code: &str) -> Result<&StationRecord, StationError> {
        StationCode::parse(code.trim())
            .ok()
            .and_then(|c| self.get(c))
            .ok_or_else(|| StationError::NotFound {
                code: code.to_string(),
            })
    }

    /// Case-insensitive substring search over the Japanese, kana and
    /// English names.
    ///
    /// Hiragana in the query also matches katakana readings. Matches are
    /// returned in ascending code order, truncated to `limit` if given.
    /// An empty (or all-whitespace) query is rejected.
    pub fn search_by_name(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<&StationRecord>, StationError> {
        let query = normalize(query.trim());
        if query.is_empty() {
            return Err(StationError::invalid("name", "must not be empty"));
        }

        Ok(self
            .stations
            .iter()
            .zip(&self.search_keys)
            .filter(|(_, key)| key.matches(&query))
            .map(|(station, _)| station)
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    /// All stations of the given type letter.
    ///
    /// Fails with `InvalidArgument` for letters outside A-F.
    pub fn filter_by_type(&self, station_type: &str) -> Result<TypeMatches<'_>, StationError> {
        let station_type: StationType = station_type
            .parse()
            .map_err(|e: crate::domain::InvalidStationType| {
                StationError::invalid("station_type", e.to_string())
            })?;
        Ok(TypeMatches {
            station_type,
            stations: self.stations_of_type(station_type),
        })
    }

    /// All stations of the given type, in canonical order.
    pub fn stations_of_type(&self, station_type: StationType) -> Vec<&StationRecord> {
        self.stations
            .iter()
            .filter(|s| s.station_type == station_type)
            .collect()
    }

    /// One page of the canonical listing.
    ///
    /// An offset past the end yields an empty page.
    pub fn list(&self, page: PageRequest) -> Page<'_> {
        let stations = self
            .stations
            .iter()
            .skip(page.offset)
            .take(page.limit)
            .collect();

        Page {
            stations,
            total: self.stations.len(),
        }
    }

    /// The single closest station to a point.
    ///
    /// Fails only for out-of-range coordinates.
    pub fn find_nearest(&self, lat: f64, lon: f64) -> Result<Nearby<'_>, StationError> {
        let origin = query_point(lat, lon)?;
        geo::nearest(origin, &self.stations)
            .map(|(station, distance_km)| Nearby {
                station,
                distance_km,
            })
            .ok_or(StationError::Empty)
    }

    /// Every station within `radius_km` of a point, closest first.
    ///
    /// Equal distances are ordered by ascending code. `radius_km` must be a
    /// positive finite number.
    pub fn find_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<Vec<Nearby<'_>>, StationError> {
        let origin = query_point(lat, lon)?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(StationError::invalid(
                "radius_km",
                format!("must be a positive number, got {radius_km}"),
            ));
        }

        Ok(geo::within_radius(origin, &self.stations, radius_km)
            .into_iter()
            .map(|(station, distance_km)| Nearby {
                station,
                distance_km,
            })
            .collect())
    }

    /// Prefectures that have at least one station, in area code order.
    pub fn prefectures(&self) -> Vec<&'static Prefecture> {
        let keys: BTreeSet<&str> = self.stations.iter().map(|s| s.prefecture.area_code).collect();
        Prefecture::all()
            .iter()
            .filter(|p| keys.contains(p.area_code))
            .collect()
    }
}

fn query_point(lat: f64, lon: f64) -> Result<GeoPoint, StationError> {
    GeoPoint::new(lat, lon).map_err(|e| {
        let field = match e {
            crate::domain::InvalidCoordinates::Latitude(_) => "lat",
            crate::domain::InvalidCoordinates::Longitude(_) => "lon",
        };
        StationError::invalid(field, e.to_string())
    })
}
