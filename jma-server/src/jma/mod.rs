//! JMA remote data client.
//!
//! Wraps the public "bosai" JSON endpoints behind the [`WeatherProvider`]
//! trait, plus the station table used to build the directory:
//! - the AMeDAS station table (`amedastable.json`)
//! - AMeDAS map snapshots (every station, every 10 minutes)
//! - AMeDAS point history in 3-hour blocks per station
//! - prefecture forecasts, passed through untouched
//!
//! Times on the wire are JST; see [`time`] for the URL conventions.

mod client;
mod error;
mod mock;
mod observation;
mod provider;
pub mod time;
mod types;

pub use client::{DEFAULT_BASE_URL, JmaClient, JmaConfig};
pub use error::JmaError;
pub use mock::MockWeather;
pub use observation::{
    Measured, Observation, Precipitation, Snow, Sunshine, WIND_DIRECTIONS, WIND_DIRECTIONS_JA,
    Wind, parse_observation_value, wind_direction,
};
pub use provider::{Series, Snapshot, TimedObservation, WeatherProvider};
pub use time::{InvalidDatetime, InvalidSeries, SeriesSpec, parse_target_datetime};
pub use types::{MapSnapshot, PointBlock, RawObservation, RawValue};
