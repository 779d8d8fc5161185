//! Typed requests and their argument shapes.
//!
//! Each argument struct is shared by the MCP tool schema (serde + schemars)
//! and the CLI (clap), so defaults are declared for both.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::DispatchError;
use super::operation::Operation;

const DEFAULT_RADIUS_KM: f64 = 50.0;
const DEFAULT_LIST_LIMIT: i64 = 100;
const DEFAULT_SERIES_HOURS: i64 = 24;
const DEFAULT_SERIES_INTERVAL: i64 = 60;

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

fn default_list_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

fn default_series_hours() -> i64 {
    DEFAULT_SERIES_HOURS
}

fn default_series_interval() -> i64 {
    DEFAULT_SERIES_INTERVAL
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct GetStationInfoArgs {
    /// Station code (e.g. '44132' for Tokyo)
    #[arg(long)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct SearchStationsArgs {
    /// Station name to search: Japanese, kana or English, case-insensitive
    #[arg(long)]
    pub name: String,

    /// Maximum number of stations to return
    #[arg(long)]
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct SearchNearbyStationsArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Search radius in kilometres
    #[arg(long, default_value_t = DEFAULT_RADIUS_KM, allow_hyphen_values = true)]
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct GetStationsOfTypeArgs {
    /// Station type: A (staffed), B (special regional), C (AMeDAS),
    /// D (rain gauge), E (snow depth) or F (regional rain)
    #[arg(long)]
    pub station_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct ListStationsArgs {
    /// Maximum number of stations to return
    #[arg(long, default_value_t = DEFAULT_LIST_LIMIT, allow_hyphen_values = true)]
    #[serde(default = "default_list_limit")]
    pub limit: i64,

    /// Number of stations to skip
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct GetCurrentWeatherArgs {
    /// Station code; omit for every station
    #[arg(long)]
    #[serde(default)]
    pub station_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct GetWeatherByLocationArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct GetForecastArgs {
    /// Prefecture key (e.g. 'tokyo', 'osaka', 'hokkaido_sapporo')
    #[arg(long)]
    pub prefecture: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct ListPrefecturesArgs {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct GetHistoricalWeatherArgs {
    /// Station code
    #[arg(long)]
    pub station_code: String,

    /// Target time, e.g. '2025-12-01 12:00' or '2025-12-01T12:00:00';
    /// times without an offset are JST
    #[arg(long)]
    pub target_datetime: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema, clap::Args)]
pub struct GetWeatherTimeSeriesArgs {
    /// Station code
    #[arg(long)]
    pub station_code: String,

    /// Hours to fetch, 1 to 168
    #[arg(long, default_value_t = DEFAULT_SERIES_HOURS, allow_hyphen_values = true)]
    #[serde(default = "default_series_hours")]
    pub hours: i64,

    /// Minutes between points: 10, 30 or 60
    #[arg(long, default_value_t = DEFAULT_SERIES_INTERVAL, allow_hyphen_values = true)]
    #[serde(default = "default_series_interval")]
    pub interval_minutes: i64,
}

/// A parsed request, one variant per [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    GetStationInfo(GetStationInfoArgs),
    SearchStations(SearchStationsArgs),
    SearchNearbyStations(SearchNearbyStationsArgs),
    GetStationsOfType(GetStationsOfTypeArgs),
    ListStations(ListStationsArgs),
    GetCurrentWeather(GetCurrentWeatherArgs),
    GetWeatherByLocation(GetWeatherByLocationArgs),
    GetForecast(GetForecastArgs),
    ListPrefectures(ListPrefecturesArgs),
    GetHistoricalWeather(GetHistoricalWeatherArgs),
    GetWeatherTimeSeries(GetWeatherTimeSeriesArgs),
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::GetStationInfo(_) => Operation::GetStationInfo,
            Request::SearchStations(_) => Operation::SearchStations,
            Request::SearchNearbyStations(_) => Operation::SearchNearbyStations,
            Request::GetStationsOfType(_) => Operation::GetStationsOfType,
            Request::ListStations(_) => Operation::ListStations,
            Request::GetCurrentWeather(_) => Operation::GetCurrentWeather,
            Request::GetWeatherByLocation(_) => Operation::GetWeatherByLocation,
            Request::GetForecast(_) => Operation::GetForecast,
            Request::ListPrefectures(_) => Operation::ListPrefectures,
            Request::GetHistoricalWeather(_) => Operation::GetHistoricalWeather,
            Request::GetWeatherTimeSeries(_) => Operation::GetWeatherTimeSeries,
        }
    }

    /// Build a request from a tool name and a JSON object of arguments.
    ///
    /// `null` arguments are treated as an empty object.
    pub fn parse(name: &str, arguments: serde_json::Value) -> Result<Self, DispatchError> {
        let operation: Operation = name.parse()?;
        let arguments = match arguments {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            other => other,
        };

        Ok(match operation {
            Operation::GetStationInfo => Request::GetStationInfo(decode(operation, arguments)?),
            Operation::SearchStations => Request::SearchStations(decode(operation, arguments)?),
            Operation::SearchNearbyStations => {
                Request::SearchNearbyStations(decode(operation, arguments)?)
            }
            Operation::GetStationsOfType => {
                Request::GetStationsOfType(decode(operation, arguments)?)
            }
            Operation::ListStations => Request::ListStations(decode(operation, arguments)?),
            Operation::GetCurrentWeather => {
                Request::GetCurrentWeather(decode(operation, arguments)?)
            }
            Operation::GetWeatherByLocation => {
                Request::GetWeatherByLocation(decode(operation, arguments)?)
            }
            Operation::GetForecast => Request::GetForecast(decode(operation, arguments)?),
            Operation::ListPrefectures => Request::ListPrefectures(decode(operation, arguments)?),
            Operation::GetHistoricalWeather => {
                Request::GetHistoricalWeather(decode(operation, arguments)?)
            }
            Operation::GetWeatherTimeSeries => {
                Request::GetWeatherTimeSeries(decode(operation, arguments)?)
            }
        })
    }
}

fn decode<T: DeserializeOwned>(
    operation: Operation,
    arguments: serde_json::Value,
) -> Result<T, DispatchError> {
    serde_json::from_value(arguments).map_err(|e| DispatchError::invalid(operation, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ErrorKind;
    use serde_json::json;

    #[test]
    fn parses_with_defaults() {
        let req = Request::parse("search_nearby_stations", json!({"lat": 35.0, "lon": 139.0}))
            .unwrap();
        assert_eq!(
            req,
            Request::SearchNearbyStations(SearchNearbyStationsArgs {
                lat: 35.0,
                lon: 139.0,
                radius_km: 50.0,
            })
        );

        let req = Request::parse("list_stations", json!({})).unwrap();
        assert_eq!(
            req,
            Request::ListStations(ListStationsArgs {
                limit: 100,
                offset: 0
            })
        );

        let req = Request::parse("get_weather_time_series", json!({"station_code": "44132"}))
            .unwrap();
        assert_eq!(
            req,
            Request::GetWeatherTimeSeries(GetWeatherTimeSeriesArgs {
                station_code: "44132".into(),
                hours: 24,
                interval_minutes: 60,
            })
        );
    }

    #[test]
    fn null_arguments_are_empty() {
        let req = Request::parse("list_prefectures", serde_json::Value::Null).unwrap();
        assert_eq!(req, Request::ListPrefectures(ListPrefecturesArgs {}));

        let req = Request::parse("get_current_weather", serde_json::Value::Null).unwrap();
        assert_eq!(
            req,
            Request::GetCurrentWeather(GetCurrentWeatherArgs { station_code: None })
        );
    }

    #[test]
    fn missing_field_is_invalid_argument_naming_it() {
        let err = Request::parse("get_station_info", json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.operation(), Some(Operation::GetStationInfo));
        assert!(err.to_string().contains("`code`"), "{err}");
    }

    #[test]
    fn wrong_type_is_invalid_argument() {
        let err = Request::parse("search_nearby_stations", json!({"lat": "north", "lon": 1.0}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn unknown_tool_is_unknown_operation() {
        let err = Request::parse("get_tides", json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOperation);
    }

    #[test]
    fn operation_matches_name() {
        let req = Request::parse("get_forecast", json!({"prefecture": "tokyo"})).unwrap();
        assert_eq!(req.operation(), Operation::GetForecast);
    }

    #[test]
    fn schemas_mark_required_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(GetHistoricalWeatherArgs)).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("station_code")));
        assert!(required.contains(&json!("target_datetime")));

        let schema = serde_json::to_value(schemars::schema_for!(ListStationsArgs)).unwrap();
        assert!(schema.get("required").is_none_or(|r| r.as_array().unwrap().is_empty()));
    }
}
