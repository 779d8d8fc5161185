//! In-memory weather provider for tests and offline development.
//!
//! Serves canned AMeDAS payloads through the same shaping code as
//! [`JmaClient`](super::JmaClient), with a fixed "latest data time".

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, FixedOffset};
use futures::FutureExt;
use futures::future::{BoxFuture, ready};

use crate::domain::StationCode;

use super::client::{assemble_series, lookup_point, shape_snapshot};
use super::error::JmaError;
use super::provider::{Series, Snapshot, TimedObservation, WeatherProvider};
use super::time::{SeriesSpec, point_key};
use super::types::{MapSnapshot, PointBlock, RawObservation};

/// Weather provider backed by fixed data.
#[derive(Debug, Clone)]
pub struct MockWeather {
    latest: DateTime<FixedOffset>,
    snapshot: MapSnapshot,
    history: HashMap<StationCode, PointBlock>,
    forecasts: HashMap<String, serde_json::Value>,
    requests: Arc<AtomicUsize>,
}

impl MockWeather {
    /// Create an empty provider whose latest data time is `latest`.
    pub fn new(latest: DateTime<FixedOffset>) -> Self {
        Self {
            latest,
            snapshot: MapSnapshot::new(),
            history: HashMap::new(),
            forecasts: HashMap::new(),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a station to the current snapshot.
    pub fn with_current(mut self, station: &str, raw: RawObservation) -> Self {
        self.snapshot.insert(station.to_string(), raw);
        self
    }

    /// Add one historical record.
    pub fn with_history(
        mut self,
        station: StationCode,
        time: DateTime<FixedOffset>,
        raw: RawObservation,
    ) -> Self {
        self.history
            .entry(station)
            .or_default()
            .insert(point_key(time), raw);
        self
    }

    /// Add a forecast document for an area code.
    pub fn with_forecast(mut self, area_code: &str, forecast: serde_json::Value) -> Self {
        self.forecasts.insert(area_code.to_string(), forecast);
        self
    }

    /// Number of provider calls served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

impl WeatherProvider for MockWeather {
    fn current(&self, station: Option<StationCode>) -> BoxFuture<'_, Result<Snapshot, JmaError>> {
        self.record_request();
        ready(shape_snapshot(self.latest, &self.snapshot, station)).boxed()
    }

    fn historical(
        &self,
        station: StationCode,
        at: DateTime<FixedOffset>,
    ) -> BoxFuture<'_, Result<TimedObservation, JmaError>> {
        self.record_request();
        ready(lookup_point(station, at, self.history.get(&station))).boxed()
    }

    fn time_series(
        &self,
        station: StationCode,
        spec: SeriesSpec,
    ) -> BoxFuture<'_, Result<Series, JmaError>> {
        self.record_request();
        let empty = PointBlock::new();
        let records = self.history.get(&station).unwrap_or(&empty);
        ready(Ok(assemble_series(spec, self.latest, records))).boxed()
    }

    fn forecast(&self, area_code: &'static str) -> BoxFuture<'_, Result<serde_json::Value, JmaError>> {
        self.record_request();
        let result = self
            .forecasts
            .get(area_code)
            .cloned()
            .ok_or_else(|| JmaError::DataUnavailable(format!("no forecast for area {area_code}")));
        ready(result).boxed()
    }
}
