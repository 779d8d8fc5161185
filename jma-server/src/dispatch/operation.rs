//! The closed set of operations.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::DispatchError;

/// Every request the server and CLI understand.
///
/// The string form is the MCP tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetStationInfo,
    SearchStations,
    SearchNearbyStations,
    GetStationsOfType,
    ListStations,
    GetCurrentWeather,
    GetWeatherByLocation,
    GetForecast,
    ListPrefectures,
    GetHistoricalWeather,
    GetWeatherTimeSeries,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::GetStationInfo,
        Operation::SearchStations,
        Operation::SearchNearbyStations,
        Operation::GetStationsOfType,
        Operation::ListStations,
        Operation::GetCurrentWeather,
        Operation::GetWeatherByLocation,
        Operation::GetForecast,
        Operation::ListPrefectures,
        Operation::GetHistoricalWeather,
        Operation::GetWeatherTimeSeries,
    ];

    /// Tool name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetStationInfo => "get_station_info",
            Operation::SearchStations => "search_stations",
            Operation::SearchNearbyStations => "search_nearby_stations",
            Operation::GetStationsOfType => "get_stations_of_type",
            Operation::ListStations => "list_stations",
            Operation::GetCurrentWeather => "get_current_weather",
            Operation::GetWeatherByLocation => "get_weather_by_location",
            Operation::GetForecast => "get_forecast",
            Operation::ListPrefectures => "list_prefectures",
            Operation::GetHistoricalWeather => "get_historical_weather",
            Operation::GetWeatherTimeSeries => "get_weather_time_series",
        }
    }

    /// CLI resource and command, e.g. `("station", "get")`.
    pub fn cli_route(&self) -> (&'static str, &'static str) {
        match self {
            Operation::GetStationInfo => ("station", "get"),
            Operation::SearchStations => ("station", "search"),
            Operation::SearchNearbyStations => ("station", "nearby"),
            Operation::GetStationsOfType => ("station", "type"),
            Operation::ListStations => ("station", "list"),
            Operation::GetCurrentWeather => ("weather", "current"),
            Operation::GetWeatherByLocation => ("weather", "by-location"),
            Operation::GetForecast => ("forecast", "get"),
            Operation::ListPrefectures => ("forecast", "list-prefectures"),
            Operation::GetHistoricalWeather => ("history", "get"),
            Operation::GetWeatherTimeSeries => ("history", "series"),
        }
    }

    /// Whether the operation calls the remote API.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Operation::GetCurrentWeather
                | Operation::GetWeatherByLocation
                | Operation::GetForecast
                | Operation::GetHistoricalWeather
                | Operation::GetWeatherTimeSeries
        )
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
