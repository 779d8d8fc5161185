//! JST time helpers for the AMeDAS endpoints.
//!
//! JMA publishes observations every 10 minutes, stamped in Japan Standard
//! Time. Snapshots appear on the map endpoint roughly half an hour after the
//! observation, and the point endpoint groups a station's history into
//! 3-hour files.

use chrono::{
    DateTime, FixedOffset, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc,
};

/// Japan Standard Time (UTC+9, no daylight saving).
pub const JST: FixedOffset = match FixedOffset::east_opt(9 * 3600) {
    Some(offset) => offset,
    None => panic!("JST offset out of range"),
};

/// Delay between an observation and its publication on the map endpoint.
const PUBLICATION_LAG_MINUTES: i64 = 40;

/// Observation cadence in minutes.
pub const OBSERVATION_STEP_MINUTES: u32 = 10;

/// Longest supported time series.
pub const MAX_SERIES_HOURS: u32 = 168;

/// Allowed time series intervals in minutes.
pub const SERIES_INTERVALS: [u32; 3] = [10, 30, 60];

/// Round `dt` down to a multiple of `step_minutes` past the hour.
///
/// `step_minutes` must divide 60.
pub fn floor_to_minutes(dt: DateTime<FixedOffset>, step_minutes: u32) -> DateTime<FixedOffset> {
    let step_secs = i64::from(step_minutes.max(1)) * 60;
    let excess = dt.timestamp().rem_euclid(step_secs);
    dt - TimeDelta::seconds(excess) - TimeDelta::nanoseconds(i64::from(dt.timestamp_subsec_nanos()))
}

/// The most recent snapshot time that is likely to be published.
pub fn latest_data_time(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    let lagged = now.with_timezone(&JST) - TimeDelta::minutes(PUBLICATION_LAG_MINUTES);
    floor_to_minutes(lagged, OBSERVATION_STEP_MINUTES)
}

/// Timestamp segment of a map snapshot URL (`YYYYMMDDHHMM00`).
pub fn map_timestamp(dt: DateTime<FixedOffset>) -> String {
    dt.with_timezone(&JST).format("%Y%m%d%H%M00").to_string()
}

/// File stem of the 3-hour point block containing `dt` (`YYYYMMDD_HH`).
pub fn point_block(dt: DateTime<FixedOffset>) -> String {
    let jst = dt.with_timezone(&JST);
    let block_hour = jst.hour() - jst.hour() % 3;
    format!("{}_{:02}", jst.format("%Y%m%d"), block_hour)
}

/// Key of one observation inside a point block (`YYYYMMDDHHMMSS`).
pub fn point_key(dt: DateTime<FixedOffset>) -> String {
    dt.with_timezone(&JST).format("%Y%m%d%H%M%S").to_string()
}

/// `2025-12-01 12:00 JST` style label.
pub fn jst_label(dt: DateTime<FixedOffset>) -> String {
    dt.with_timezone(&JST).format("%Y-%m-%d %H:%M JST").to_string()
}

/// Error returned for a target datetime in no accepted format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "invalid datetime {input:?}: use ISO 8601 (e.g. '2025-12-01T12:00:00') or 'YYYY-MM-DD HH:MM'"
)]
pub struct InvalidDatetime {
    pub input: String,
}

const NAIVE_ISO_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const NAIVE_PLAIN_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M"];

/// Parse a user-supplied target datetime.
///
/// Accepts ISO 8601 with a `T` separator (with `Z`, a numeric offset, or no
/// offset) and the plain forms `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS` and
/// `YYYY/MM/DD HH:MM`. Times without an offset are taken as JST. The result
/// is rounded down to the 10-minute observation grid.
///
/// ```
/// use jma_server::jma::parse_target_datetime;
///
/// let dt = parse_target_datetime("2025-12-01 12:07").unwrap();
/// assert_eq!(dt.to_rfc3339(), "2025-12-01T12:00:00+09:00");
/// ```
pub fn parse_target_datetime(input: &str) -> Result<DateTime<FixedOffset>, InvalidDatetime> {
    let s = input.trim();
    let invalid = || InvalidDatetime {
        input: input.to_string(),
    };

    let parsed = if s.contains('T') {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .or_else(|| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z").ok())
            .or_else(|| parse_naive_jst(s, &NAIVE_ISO_FORMATS))
    } else {
        parse_naive_jst(s, &NAIVE_PLAIN_FORMATS)
    };

    parsed
        .map(|dt| floor_to_minutes(dt.with_timezone(&JST), OBSERVATION_STEP_MINUTES))
        .ok_or_else(invalid)
}

fn parse_naive_jst(s: &str, formats: &[&str]) -> Option<DateTime<FixedOffset>> {
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .and_then(|naive| JST.from_local_datetime(&naive).single())
}

/// Error returned for out-of-range time series parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSeries {
    #[error("hours must be between 1 and {MAX_SERIES_HOURS}, got {0}")]
    Hours(i64),
    #[error("interval_minutes must be 10, 30, or 60, got {0}")]
    Interval(i64),
}

/// Validated time series window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSpec {
    hours: u32,
    interval_minutes: u32,
}

impl SeriesSpec {
    pub fn new(hours: i64, interval_minutes: i64) -> Result<Self, InvalidSeries> {
        let hours = u32::try_from(hours)
            .ok()
            .filter(|h| (1..=MAX_SERIES_HOURS).contains(h))
            .ok_or(InvalidSeries::Hours(hours))?;
        let interval_minutes = u32::try_from(interval_minutes)
            .ok()
            .filter(|i| SERIES_INTERVALS.contains(i))
            .ok_or(InvalidSeries::Interval(interval_minutes))?;
        Ok(Self {
            hours,
            interval_minutes,
        })
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    /// Sample times ending at `latest` (rounded down to the interval) and
    /// reaching back `hours`, oldest first.
    ///
    /// The window is exclusive at the start and inclusive at the end.
    pub fn sample_times(&self, latest: DateTime<FixedOffset>) -> Vec<DateTime<FixedOffset>> {
        let end = floor_to_minutes(latest, self.interval_minutes);
        let count = self.hours * 60 / self.interval_minutes;
        let step = TimeDelta::minutes(i64::from(self.interval_minutes));

        let mut times: Vec<_> = (0..count).map(|k| end - step * k as i32).collect();
        times.reverse();
        times
    }
}
