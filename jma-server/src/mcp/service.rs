//! MCP tools over the query dispatcher.

use rmcp::{
    ErrorData, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde_json::json;
use tracing::warn;

use crate::dispatch::{
    DispatchError, GetCurrentWeatherArgs, GetForecastArgs, GetHistoricalWeatherArgs,
    GetStationInfoArgs, GetStationsOfTypeArgs, GetWeatherByLocationArgs,
    GetWeatherTimeSeriesArgs, ListPrefecturesArgs, ListStationsArgs, QueryDispatcher, Request,
    Response, SearchNearbyStationsArgs, SearchStationsArgs,
};

const INSTRUCTIONS: &str = "Japan Meteorological Agency AMeDAS data. \
Use search_stations, search_nearby_stations or list_stations to find a station code, \
then get_current_weather, get_historical_weather or get_weather_time_series for \
observations. get_weather_by_location picks the nearest station for you. \
Forecasts are per prefecture; list_prefectures gives the keys for get_forecast.";

#[derive(Debug, Clone)]
pub struct JmaService {
    tool_router: ToolRouter<Self>,
    dispatcher: QueryDispatcher,
}

impl JmaService {
    pub fn new(dispatcher: QueryDispatcher) -> Self {
        Self {
            tool_router: Self::tool_router(),
            dispatcher,
        }
    }

    async fn run(&self, request: Request) -> Result<CallToolResult, ErrorData> {
        match self.dispatcher.execute(request).await {
            Ok(response) => success(&response),
            Err(err) => Ok(failure(&err)),
        }
    }
}

fn success(response: &Response) -> Result<CallToolResult, ErrorData> {
    let text = response.to_json_pretty().map_err(|e| {
        ErrorData::internal_error(
            "failed to serialize response",
            Some(json!({"reason": e.to_string()})),
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn failure(err: &DispatchError) -> CallToolResult {
    warn!(error = %err, kind = err.kind().as_str(), "tool call failed");
    let body = json!({"error": err.to_string(), "kind": err.kind()});
    CallToolResult::error(vec![Content::text(body.to_string())])
}

#[tool_router]
impl JmaService {
    #[tool(description = "Get details of an AMeDAS station by its five-digit code")]
    pub async fn get_station_info(
        &self,
        Parameters(args): Parameters<GetStationInfoArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::GetStationInfo(args)).await
    }

    #[tool(description = "Search stations by name in Japanese, kana or English")]
    pub async fn search_stations(
        &self,
        Parameters(args): Parameters<SearchStationsArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::SearchStations(args)).await
    }

    #[tool(description = "Find stations within a radius of a point, closest first")]
    pub async fn search_nearby_stations(
        &self,
        Parameters(args): Parameters<SearchNearbyStationsArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::SearchNearbyStations(args)).await
    }

    #[tool(description = "List stations of one type (A-F)")]
    pub async fn get_stations_of_type(
        &self,
        Parameters(args): Parameters<GetStationsOfTypeArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::GetStationsOfType(args)).await
    }

    #[tool(description = "List stations in code order, with pagination")]
    pub async fn list_stations(
        &self,
        Parameters(args): Parameters<ListStationsArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::ListStations(args)).await
    }

    #[tool(description = "Latest observations for one station, or for every station")]
    pub async fn get_current_weather(
        &self,
        Parameters(args): Parameters<GetCurrentWeatherArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::GetCurrentWeather(args)).await
    }

    #[tool(description = "Latest observations at the station nearest a point (within 100 km)")]
    pub async fn get_weather_by_location(
        &self,
        Parameters(args): Parameters<GetWeatherByLocationArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::GetWeatherByLocation(args)).await
    }

    #[tool(description = "Weather forecast for a prefecture")]
    pub async fn get_forecast(
        &self,
        Parameters(args): Parameters<GetForecastArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::GetForecast(args)).await
    }

    #[tool(description = "List the prefecture keys accepted by get_forecast")]
    pub async fn list_prefectures(
        &self,
        Parameters(args): Parameters<ListPrefecturesArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::ListPrefectures(args)).await
    }

    #[tool(description = "Observations at a station at a past time (roughly the last 10 days)")]
    pub async fn get_historical_weather(
        &self,
        Parameters(args): Parameters<GetHistoricalWeatherArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::GetHistoricalWeather(args)).await
    }

    #[tool(description = "Observations at a station over the last hours, oldest first")]
    pub async fn get_weather_time_series(
        &self,
        Parameters(args): Parameters<GetWeatherTimeSeriesArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(Request::GetWeatherTimeSeries(args)).await
    }
}

#[tool_handler]
impl ServerHandler for JmaService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_CRATE_NAME").to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
