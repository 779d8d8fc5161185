//! Request execution.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Prefecture, StationCode};
use crate::jma::time::jst_label;
use crate::jma::{
    JmaError, Observation, SeriesSpec, Snapshot, WeatherProvider, parse_target_datetime,
};
use crate::stations::{PageRequest, StationDirectory, StationError, StationRecord};

use super::dto::*;
use super::error::{DispatchError, WithinOperation};
use super::operation::Operation;
use super::request::*;

/// Nearest-station cutoff for weather by location.
pub const MAX_LOCATION_DISTANCE_KM: f64 = 100.0;

/// Routes requests to the station directory or the weather provider.
///
/// Stateless apart from its two shared collaborators, so one dispatcher
/// serves any number of concurrent requests.
#[derive(Clone)]
pub struct QueryDispatcher {
    directory: Arc<StationDirectory>,
    weather: Arc<dyn WeatherProvider>,
}

impl QueryDispatcher {
    pub fn new(directory: Arc<StationDirectory>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { directory, weather }
    }

    pub fn directory(&self) -> &StationDirectory {
        &self.directory
    }

    /// Parse and execute a request given by tool name and JSON arguments.
    pub async fn call(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<Response, DispatchError> {
        self.execute(Request::parse(name, arguments)?).await
    }

    /// Execute a parsed request.
    pub async fn execute(&self, request: Request) -> Result<Response, DispatchError> {
        let operation = request.operation();
        info!(%operation, remote = operation.is_remote(), "dispatching");

        match request {
            Request::GetStationInfo(args) => self.get_station_info(args),
            Request::SearchStations(args) => self.search_stations(args),
            Request::SearchNearbyStations(args) => self.search_nearby_stations(args),
            Request::GetStationsOfType(args) => self.get_stations_of_type(args),
            Request::ListStations(args) => self.list_stations(args),
            Request::ListPrefectures(_) => Ok(self.list_prefectures()),
            Request::GetCurrentWeather(args) => self.get_current_weather(args).await,
            Request::GetWeatherByLocation(args) => self.get_weather_by_location(args).await,
            Request::GetForecast(args) => self.get_forecast(args).await,
            Request::GetHistoricalWeather(args) => self.get_historical_weather(args).await,
            Request::GetWeatherTimeSeries(args) => self.get_weather_time_series(args).await,
        }
    }

    /// Resolve a station code for a weather operation.
    fn station(&self, operation: Operation, code: &str) -> Result<&StationRecord, DispatchError> {
        self.directory.get_by_code(code).within(operation)
    }

    fn get_station_info(&self, args: GetStationInfoArgs) -> Result<Response, DispatchError> {
        let record = self.station(Operation::GetStationInfo, &args.code)?;
        Ok(Response::Station(StationResult::from_record(record)))
    }

    fn search_stations(&self, args: SearchStationsArgs) -> Result<Response, DispatchError> {
        let matches = self
            .directory
            .search_by_name(&args.name, args.limit)
            .within(Operation::SearchStations)?;
        Ok(Response::StationList(StationListResult::new(matches)))
    }

    fn search_nearby_stations(
        &self,
        args: SearchNearbyStationsArgs,
    ) -> Result<Response, DispatchError> {
        let hits = self
            .directory
            .find_within_radius(args.lat, args.lon, args.radius_km)
            .within(Operation::SearchNearbyStations)?;
        let stations: Vec<_> = hits.iter().map(StationResult::from_nearby).collect();

        Ok(Response::Nearby(NearbyResult {
            count: stations.len(),
            search_center: SearchCenter {
                lat: args.lat,
                lon: args.lon,
            },
            radius_km: args.radius_km,
            stations,
        }))
    }

    fn get_stations_of_type(&self, args: GetStationsOfTypeArgs) -> Result<Response, DispatchError> {
        let matches = self
            .directory
            .filter_by_type(&args.station_type)
            .within(Operation::GetStationsOfType)?;
        let station_type = matches.station_type;
        let list = StationListResult::new(matches.stations);

        Ok(Response::StationType(StationTypeResult {
            count: list.count,
            station_type: station_type.to_string(),
            type_description: station_type.description().to_string(),
            stations: list.stations,
        }))
    }

    fn list_stations(&self, args: ListStationsArgs) -> Result<Response, DispatchError> {
        let page_request =
            PageRequest::new(args.limit, args.offset).within(Operation::ListStations)?;
        let page = self.directory.list(page_request);
        let list = StationListResult::new(page.stations);

        Ok(Response::StationPage(StationPageResult {
            total: page.total,
            offset: page_request.offset(),
            limit: page_request.limit(),
            count: list.count,
            stations: list.stations,
        }))
    }

    fn list_prefectures(&self) -> Response {
        let prefectures: Vec<_> = Prefecture::all()
            .iter()
            .map(|p| {
                let count = self
                    .directory
                    .iter()
                    .filter(|s| s.prefecture.key == p.key)
                    .count();
                PrefectureResult::new(p, count)
            })
            .collect();

        Response::PrefectureList(PrefectureListResult {
            count: prefectures.len(),
            prefectures,
        })
    }

    async fn get_current_weather(
        &self,
        args: GetCurrentWeatherArgs,
    ) -> Result<Response, DispatchError> {
        let operation = Operation::GetCurrentWeather;

        match args.station_code {
            Some(code) => {
                let record = self.station(operation, &code)?;
                let mut snapshot = self.weather.current(Some(record.code)).await.within(operation)?;
                let weather = take_station(&mut snapshot, record.code).within(operation)?;
                Ok(Response::StationWeather(StationWeatherResult::new(
                    snapshot.time,
                    StationResult::from_record(record),
                    weather,
                )))
            }
            None => {
                let snapshot = self.weather.current(None).await.within(operation)?;
                Ok(Response::Snapshot(SnapshotResult {
                    observation_time: snapshot.time.to_rfc3339(),
                    observation_time_jst: jst_label(snapshot.time),
                    count: snapshot.stations.len(),
                    stations: snapshot.stations,
                }))
            }
        }
    }

    async fn get_weather_by_location(
        &self,
        args: GetWeatherByLocationArgs,
    ) -> Result<Response, DispatchError> {
        let operation = Operation::GetWeatherByLocation;

        let nearest = self
            .directory
            .find_nearest(args.lat, args.lon)
            .within(operation)?;
        if nearest.distance_km > MAX_LOCATION_DISTANCE_KM {
            return Err(StationError::NoStationNearby {
                lat: args.lat,
                lon: args.lon,
                radius_km: MAX_LOCATION_DISTANCE_KM,
            })
            .within(operation);
        }

        let code = nearest.station.code;
        let mut snapshot = self.weather.current(Some(code)).await.within(operation)?;
        let weather = take_station(&mut snapshot, code).within(operation)?;

        Ok(Response::StationWeather(StationWeatherResult::new(
            snapshot.time,
            StationResult::from_nearby(&nearest),
            weather,
        )))
    }

    async fn get_forecast(&self, args: GetForecastArgs) -> Result<Response, DispatchError> {
        let operation = Operation::GetForecast;

        let prefecture = Prefecture::by_key(&args.prefecture).ok_or_else(|| {
            DispatchError::invalid(
                operation,
                format!(
                    "unknown prefecture '{}'; list_prefectures gives the valid keys",
                    args.prefecture
                ),
            )
        })?;
        let forecast = self
            .weather
            .forecast(prefecture.area_code)
            .await
            .within(operation)?;

        Ok(Response::Forecast(ForecastResult {
            prefecture: prefecture.key.to_string(),
            prefecture_name: prefecture.name.to_string(),
            area_code: prefecture.area_code.to_string(),
            forecast,
        }))
    }

    async fn get_historical_weather(
        &self,
        args: GetHistoricalWeatherArgs,
    ) -> Result<Response, DispatchError> {
        let operation = Operation::GetHistoricalWeather;

        let record = self.station(operation, &args.station_code)?;
        let at = parse_target_datetime(&args.target_datetime)
            .map_err(|e| DispatchError::invalid(operation, e))?;
        let point = self
            .weather
            .historical(record.code, at)
            .await
            .within(operation)?;

        Ok(Response::StationWeather(StationWeatherResult::new(
            point.time,
            StationResult::from_record(record),
            point.observation,
        )))
    }

    async fn get_weather_time_series(
        &self,
        args: GetWeatherTimeSeriesArgs,
    ) -> Result<Response, DispatchError> {
        let operation = Operation::GetWeatherTimeSeries;

        let record = self.station(operation, &args.station_code)?;
        let spec = SeriesSpec::new(args.hours, args.interval_minutes)
            .map_err(|e| DispatchError::invalid(operation, e))?;
        let series = self
            .weather
            .time_series(record.code, spec)
            .await
            .within(operation)?;

        let data: Vec<SeriesPointResult> = series.points.into_iter().map(Into::into).collect();
        Ok(Response::TimeSeries(TimeSeriesResult {
            station: StationResult::from_record(record),
            hours: spec.hours(),
            interval_minutes: spec.interval_minutes(),
            start_time: series.start.to_rfc3339(),
            end_time: series.end.to_rfc3339(),
            count: data.len(),
            data,
        }))
    }
}

impl std::fmt::Debug for QueryDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryDispatcher")
            .field("stations", &self.directory.len())
            .finish_non_exhaustive()
    }
}

/// Remove one station's observation from a snapshot narrowed to it.
fn take_station(snapshot: &mut Snapshot, code: StationCode) -> Result<Observation, JmaError> {
    snapshot.stations.remove(code.as_str()).ok_or_else(|| {
        JmaError::DataUnavailable(format!(
            "station {code} not in snapshot for {}",
            jst_label(snapshot.time)
        ))
    })
}
