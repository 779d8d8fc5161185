//! JMA "bosai" HTTP client.
//!
//! Fetches the AMeDAS station table, AMeDAS snapshots, per-station history
//! blocks and prefecture forecasts. All requests share one semaphore so
//! concurrent callers (and the fan-out of a time series) never exceed the
//! configured limit.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::StationCode;

use super::error::JmaError;
use super::observation::Observation;
use super::provider::{Series, Snapshot, TimedObservation, WeatherProvider};
use super::time::{SeriesSpec, jst_label, latest_data_time, map_timestamp, point_block, point_key};
use super::types::{MapSnapshot, PointBlock};

/// Default base URL for the JMA bosai API.
pub const DEFAULT_BASE_URL: &str = "https://www.jma.go.jp/bosai";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest error body kept for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the JMA client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JmaConfig {
    /// Base URL for the API (defaults to production JMA)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl JmaConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for JmaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// JMA bosai API client.
#[derive(Debug, Clone)]
pub struct JmaClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl JmaClient {
    /// Create a new JMA client with the given configuration.
    pub fn new(config: JmaConfig) -> Result<Self, JmaError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    fn map_url(&self, time: DateTime<FixedOffset>) -> String {
        format!("{}/amedas/data/map/{}.json", self.base_url, map_timestamp(time))
    }

    fn point_url(&self, station: StationCode, time: DateTime<FixedOffset>) -> String {
        format!(
            "{}/amedas/data/point/{}/{}.json",
            self.base_url,
            station,
            point_block(time)
        )
    }

    fn station_table_url(&self) -> String {
        format!("{}/amedas/const/amedastable.json", self.base_url)
    }

    fn forecast_url(&self, area_code: &str) -> String {
        format!("{}/forecast/data/forecast/{}.json", self.base_url, area_code)
    }

    /// GET and decode a JSON document. A 404 is `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, JmaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| JmaError::Internal("semaphore closed".to_string()))?;

        debug!(url, "fetching");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(url, "not found");
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JmaError::Api {
                status: status.as_u16(),
                message: body.chars().take(BODY_SNIPPET_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| JmaError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
            })
    }

    /// Fetch the map snapshot for `time`.
    pub async fn fetch_snapshot(&self, time: DateTime<FixedOffset>) -> Result<MapSnapshot, JmaError> {
        self.get_json(&self.map_url(time))
            .await?
            .ok_or_else(|| JmaError::DataUnavailable(format!("no snapshot for {}", jst_label(time))))
    }

    /// Fetch the 3-hour history block containing `time`, if published.
    pub async fn fetch_point_block(
        &self,
        station: StationCode,
        time: DateTime<FixedOffset>,
    ) -> Result<Option<PointBlock>, JmaError> {
        self.get_json(&self.point_url(station, time)).await
    }

    /// Fetch JMA's full AMeDAS station table (`amedastable.json`).
    pub async fn fetch_station_table(&self) -> Result<serde_json::Value, JmaError> {
        self.get_json(&self.station_table_url())
            .await?
            .ok_or_else(|| JmaError::DataUnavailable("AMeDAS station table".to_string()))
    }

    /// Fetch the forecast document for an area code.
    pub async fn fetch_forecast(&self, area_code: &str) -> Result<serde_json::Value, JmaError> {
        self.get_json(&self.forecast_url(area_code))
            .await?
            .ok_or_else(|| JmaError::DataUnavailable(format!("no forecast for area {area_code}")))
    }

    async fn snapshot_at(
        &self,
        time: DateTime<FixedOffset>,
        station: Option<StationCode>,
    ) -> Result<Snapshot, JmaError> {
        let raw = self.fetch_snapshot(time).await?;
        shape_snapshot(time, &raw, station)
    }

    async fn historical_at(
        &self,
        station: StationCode,
        time: DateTime<FixedOffset>,
    ) -> Result<TimedObservation, JmaError> {
        let block = self.fetch_point_block(station, time).await?;
        lookup_point(station, time, block.as_ref())
    }

    async fn series_ending(
        &self,
        station: StationCode,
        spec: SeriesSpec,
        latest: DateTime<FixedOffset>,
    ) -> Result<Series, JmaError> {
        let times = spec.sample_times(latest);

        // One representative time per 3-hour block
        let blocks: BTreeMap<String, DateTime<FixedOffset>> =
            times.iter().map(|t| (point_block(*t), *t)).collect();

        debug!(%station, blocks = blocks.len(), "fetching time series");
        let fetched = join_all(
            blocks
                .values()
                .map(|t| self.fetch_point_block(station, *t)),
        )
        .await;

        let mut records = PointBlock::new();
        for (stem, result) in blocks.keys().zip(fetched) {
            match result? {
                Some(block) => records.extend(block),
                None => warn!(%station, block = %stem, "history block not published, skipping"),
            }
        }

        Ok(assemble_series(spec, latest, &records))
    }
}

/// Shape a map snapshot, optionally narrowed to one station.
pub(crate) fn shape_snapshot(
    time: DateTime<FixedOffset>,
    raw: &MapSnapshot,
    station: Option<StationCode>,
) -> Result<Snapshot, JmaError> {
    let stations = match station {
        Some(code) => {
            let obs = raw.get(code.as_str()).ok_or_else(|| {
                JmaError::DataUnavailable(format!(
                    "station {code} not in snapshot for {}",
                    jst_label(time)
                ))
            })?;
            BTreeMap::from([(code.to_string(), Observation::from(obs))])
        }
        None => raw
            .iter()
            .map(|(code, obs)| (code.clone(), Observation::from(obs)))
            .collect(),
    };

    Ok(Snapshot { time, stations })
}

/// Pick one observation out of a history block.
pub(crate) fn lookup_point(
    station: StationCode,
    time: DateTime<FixedOffset>,
    block: Option<&PointBlock>,
) -> Result<TimedObservation, JmaError> {
    block
        .and_then(|b| b.get(&point_key(time)))
        .map(|raw| TimedObservation {
            time,
            observation: Observation::from(raw),
        })
        .ok_or_else(|| JmaError::DataUnavailable(format!("station {station} at {}", jst_label(time))))
}

/// Build the series ending at `latest` from whatever records were fetched.
///
/// Sample times with no record are left out.
pub(crate) fn assemble_series(
    spec: SeriesSpec,
    latest: DateTime<FixedOffset>,
    records: &PointBlock,
) -> Series {
    let times = spec.sample_times(latest);
    let points = times
        .iter()
        .filter_map(|t| {
            records.get(&point_key(*t)).map(|raw| TimedObservation {
                time: *t,
                observation: Observation::from(raw),
            })
        })
        .collect();

    Series {
        spec,
        start: times.first().copied().unwrap_or(latest),
        end: times.last().copied().unwrap_or(latest),
        points,
    }
}

impl WeatherProvider for JmaClient {
    fn current(&self, station: Option<StationCode>) -> BoxFuture<'_, Result<Snapshot, JmaError>> {
        self.snapshot_at(latest_data_time(Utc::now()), station).boxed()
    }

    fn historical(
        &self,
        station: StationCode,
        at: DateTime<FixedOffset>,
    ) -> BoxFuture<'_, Result<TimedObservation, JmaError>> {
        self.historical_at(station, at).boxed()
    }

    fn time_series(
        &self,
        station: StationCode,
        spec: SeriesSpec,
    ) -> BoxFuture<'_, Result<Series, JmaError>> {
        self.series_ending(station, spec, latest_data_time(Utc::now()))
            .boxed()
    }

    fn forecast(&self, area_code: &'static str) -> BoxFuture<'_, Result<serde_json::Value, JmaError>> {
        self.fetch_forecast(area_code).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> JmaClient {
        JmaClient::new(JmaConfig::new().with_base_url(base)).unwrap()
    }

    fn jst(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    #[test]
    fn config_defaults_and_builders() {
        let config = JmaConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.timeout_secs, 30);

        let config = JmaConfig::new()
            .with_base_url("http://localhost:9999")
            .with_max_concurrent(8)
            .with_timeout(5);
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.max_concurrent, 8);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn builds_endpoint_urls() {
        let c = client(DEFAULT_BASE_URL);
        let t = jst("2025-12-01T11:40:00+09:00");

        assert_eq!(
            c.map_url(t),
            "https://www.jma.go.jp/bosai/amedas/data/map/20251201114000.json"
        );
        assert_eq!(
            c.point_url(code("44132"), t),
            "https://www.jma.go.jp/bosai/amedas/data/point/44132/20251201_09.json"
        );
        assert_eq!(
            c.forecast_url("130000"),
            "https://www.jma.go.jp/bosai/forecast/data/forecast/130000.json"
        );
        assert_eq!(
            c.station_table_url(),
            "https://www.jma.go.jp/bosai/amedas/const/amedastable.json"
        );
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let c = client("http://localhost:8080/bosai/");
        assert_eq!(
            c.forecast_url("270000"),
            "http://localhost:8080/bosai/forecast/data/forecast/270000.json"
        );
    }

    #[test]
    fn zero_concurrency_still_allows_requests() {
        let c = JmaClient::new(JmaConfig::new().with_max_concurrent(0)).unwrap();
        assert_eq!(c.semaphore.available_permits(), 1);
    }

    #[test]
    fn series_skips_missing_times() {
        let records: PointBlock = serde_json::from_str(
            r#"{
                "20251201100000": {"temp": [10.0, 0]},
                "20251201120000": {"temp": [12.0, 0]},
                "20251201121000": {"temp": [12.1, 0]}
            }"#,
        )
        .unwrap();

        let spec = SeriesSpec::new(3, 60).unwrap();
        let series = assemble_series(spec, jst("2025-12-01T12:10:00+09:00"), &records);

        assert_eq!(series.start, jst("2025-12-01T10:00:00+09:00"));
        assert_eq!(series.end, jst("2025-12-01T12:00:00+09:00"));
        let got: Vec<_> = series
            .points
            .iter()
            .map(|p| (p.time, p.observation.temperature.as_ref().unwrap().value))
            .collect();
        assert_eq!(
            got,
            vec![
                (jst("2025-12-01T10:00:00+09:00"), Some(10.0)),
                (jst("2025-12-01T12:00:00+09:00"), Some(12.0)),
            ]
        );
    }

    #[test]
    fn snapshot_narrowed_to_missing_station_is_unavailable() {
        let raw: MapSnapshot =
            serde_json::from_str(r#"{"44132": {"temp": [12.3, 0]}}"#).unwrap();
        let t = jst("2025-12-01T11:40:00+09:00");

        let all = shape_snapshot(t, &raw, None).unwrap();
        assert_eq!(all.stations.len(), 1);

        let one = shape_snapshot(t, &raw, Some(code("44132"))).unwrap();
        assert!(one.stations.contains_key("44132"));

        let err = shape_snapshot(t, &raw, Some(code("62078"))).unwrap_err();
        assert!(matches!(err, JmaError::DataUnavailable(_)));
    }

    #[test]
    fn lookup_point_requires_block_and_key() {
        let block: PointBlock =
            serde_json::from_str(r#"{"20251201114000": {"humidity": [60, 0]}}"#).unwrap();
        let t = jst("2025-12-01T11:40:00+09:00");

        let point = lookup_point(code("44132"), t, Some(&block)).unwrap();
        assert_eq!(point.time, t);
        assert_eq!(point.observation.humidity.unwrap().value, Some(60.0));

        let later = jst("2025-12-01T11:50:00+09:00");
        assert!(matches!(
            lookup_point(code("44132"), later, Some(&block)),
            Err(JmaError::DataUnavailable(_))
        ));
        assert!(matches!(
            lookup_point(code("44132"), t, None),
            Err(JmaError::DataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        // Nothing listens on the discard port
        let c = JmaClient::new(
            JmaConfig::new()
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(2),
        )
        .unwrap();
        let err = c.fetch_forecast("130000").await.unwrap_err();
        assert!(matches!(err, JmaError::Http(_)));
    }
}
