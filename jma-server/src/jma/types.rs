//! Raw AMeDAS payload types.
//!
//! Every element is a `[value, quality]` pair. Elements a station does not
//! measure are simply absent.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// A `[value, quality]` pair as published.
pub type RawValue = Vec<Option<f64>>;

/// One station's elements at one observation time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    pub temp: Option<RawValue>,
    pub humidity: Option<RawValue>,
    pub pressure: Option<RawValue>,
    pub normal_pressure: Option<RawValue>,
    pub wind: Option<RawValue>,
    pub wind_direction: Option<RawValue>,
    #[serde(rename = "precipitation10m")]
    pub precipitation_10m: Option<RawValue>,
    #[serde(rename = "precipitation1h")]
    pub precipitation_1h: Option<RawValue>,
    #[serde(rename = "precipitation3h")]
    pub precipitation_3h: Option<RawValue>,
    #[serde(rename = "precipitation24h")]
    pub precipitation_24h: Option<RawValue>,
    #[serde(rename = "sun1h")]
    pub sun_1h: Option<RawValue>,
    pub snow: Option<RawValue>,
    #[serde(rename = "snow1h")]
    pub snow_1h: Option<RawValue>,
    #[serde(rename = "snow6h")]
    pub snow_6h: Option<RawValue>,
    #[serde(rename = "snow12h")]
    pub snow_12h: Option<RawValue>,
    #[serde(rename = "snow24h")]
    pub snow_24h: Option<RawValue>,
}

/// `amedas/data/map/{time}.json`: every station at one time, keyed by code.
pub type MapSnapshot = HashMap<String, RawObservation>;

/// `amedas/data/point/{code}/{block}.json`: one station over three hours,
/// keyed by `YYYYMMDDHHMMSS`.
pub type PointBlock = BTreeMap<String, RawObservation>;
