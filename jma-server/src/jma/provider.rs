//! The seam between the dispatcher and the remote JMA data.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use futures::future::BoxFuture;

use crate::domain::StationCode;

use super::error::JmaError;
use super::observation::Observation;
use super::time::SeriesSpec;

/// All stations' observations at one snapshot time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub time: DateTime<FixedOffset>,
    /// Keyed by station code, as published.
    pub stations: BTreeMap<String, Observation>,
}

/// One station's observation at one time.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedObservation {
    pub time: DateTime<FixedOffset>,
    pub observation: Observation,
}

/// One station's observations over a window, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub spec: SeriesSpec,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub points: Vec<TimedObservation>,
}

/// Source of observations and forecasts.
///
/// Implemented by [`JmaClient`](super::JmaClient); tests substitute an
/// in-memory fake.
pub trait WeatherProvider: Send + Sync {
    /// Latest published snapshot, optionally narrowed to one station.
    ///
    /// Narrowing to a station missing from the snapshot is `DataUnavailable`.
    fn current(&self, station: Option<StationCode>) -> BoxFuture<'_, Result<Snapshot, JmaError>>;

    /// A station's observation at `at` (already on the 10-minute grid).
    fn historical(
        &self,
        station: StationCode,
        at: DateTime<FixedOffset>,
    ) -> BoxFuture<'_, Result<TimedObservation, JmaError>>;

    /// A station's observations over the window ending at the latest data time.
    fn time_series(
        &self,
        station: StationCode,
        spec: SeriesSpec,
    ) -> BoxFuture<'_, Result<Series, JmaError>>;

    /// Forecast document for a prefecture area code, passed through as-is.
    fn forecast(&self, area_code: &'static str) -> BoxFuture<'_, Result<serde_json::Value, JmaError>>;
}
