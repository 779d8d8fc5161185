//! Command-line interface.
//!
//! `jma-data-mcp <resource> <command> [--flags]` runs one operation and
//! prints its JSON to stdout. With no arguments, or `serve`, the binary runs
//! the MCP server instead.

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand, error::ErrorKind as ClapErrorKind};
use serde_json::json;
use tracing::debug;

use crate::dispatch::{
    GetCurrentWeatherArgs, GetForecastArgs, GetHistoricalWeatherArgs, GetStationInfoArgs,
    GetStationsOfTypeArgs, GetWeatherByLocationArgs, GetWeatherTimeSeriesArgs, ListPrefecturesArgs,
    ListStationsArgs, QueryDispatcher, Request, SearchNearbyStationsArgs, SearchStationsArgs,
};

/// Exit status for success, including `--help` and `--version`.
pub const EXIT_OK: u8 = 0;

/// Exit status for any argument or operation error.
pub const EXIT_ERROR: u8 = 2;

/// JMA AMeDAS station data and weather, as an MCP server or a CLI.
#[derive(Debug, Parser)]
#[command(name = "jma-data-mcp", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the MCP server (stdio unless --http is given)
    Serve(ServeArgs),
    /// Station directory queries
    #[command(subcommand)]
    Station(StationCommand),
    /// Current observations
    #[command(subcommand)]
    Weather(WeatherCommand),
    /// Prefecture forecasts
    #[command(subcommand)]
    Forecast(ForecastCommand),
    /// Past observations
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ServeArgs {
    /// Serve streamable HTTP instead of stdio, optionally on ADDR
    #[arg(long, value_name = "ADDR")]
    pub http: Option<Option<String>>,
}

#[derive(Debug, Subcommand)]
pub enum StationCommand {
    /// Get station info by code
    Get(GetStationInfoArgs),
    /// Search stations by name
    Search(SearchStationsArgs),
    /// Stations within a radius of a point
    Nearby(SearchNearbyStationsArgs),
    /// Stations of one type
    Type(GetStationsOfTypeArgs),
    /// List stations with pagination
    List(ListStationsArgs),
}

#[derive(Debug, Subcommand)]
pub enum WeatherCommand {
    /// Latest observations
    Current(GetCurrentWeatherArgs),
    /// Latest observations at the nearest station
    ByLocation(GetWeatherByLocationArgs),
}

#[derive(Debug, Subcommand)]
pub enum ForecastCommand {
    /// Forecast for a prefecture
    Get(GetForecastArgs),
    /// Prefecture keys
    ListPrefectures(ListPrefecturesArgs),
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Observations at a past time
    Get(GetHistoricalWeatherArgs),
    /// Observations over the last hours
    Series(GetWeatherTimeSeriesArgs),
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Run the MCP server. `http` is `None` for stdio, `Some(None)` for
    /// HTTP on the configured address.
    Serve { http: Option<Option<String>> },
    Query(Request),
}

impl From<Command> for Invocation {
    fn from(command: Command) -> Self {
        let request = match command {
            Command::Serve(args) => return Invocation::Serve { http: args.http },
            Command::Station(cmd) => match cmd {
                StationCommand::Get(a) => Request::GetStationInfo(a),
                StationCommand::Search(a) => Request::SearchStations(a),
                StationCommand::Nearby(a) => Request::SearchNearbyStations(a),
                StationCommand::Type(a) => Request::GetStationsOfType(a),
                StationCommand::List(a) => Request::ListStations(a),
            },
            Command::Weather(cmd) => match cmd {
                WeatherCommand::Current(a) => Request::GetCurrentWeather(a),
                WeatherCommand::ByLocation(a) => Request::GetWeatherByLocation(a),
            },
            Command::Forecast(cmd) => match cmd {
                ForecastCommand::Get(a) => Request::GetForecast(a),
                ForecastCommand::ListPrefectures(a) => Request::ListPrefectures(a),
            },
            Command::History(cmd) => match cmd {
                HistoryCommand::Get(a) => Request::GetHistoricalWeather(a),
                HistoryCommand::Series(a) => Request::GetWeatherTimeSeries(a),
            },
        };
        Invocation::Query(request)
    }
}

/// Parse a full argument list, program name first.
pub fn parse<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    Ok(match cli.command {
        Some(command) => command.into(),
        None => Invocation::Serve { http: None },
    })
}

/// Report a parse failure. Help and version are printed as-is.
pub fn report_parse_error(err: &clap::Error, out: &mut impl Write) -> io::Result<u8> {
    match err.kind() {
        ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
            write!(out, "{}", err.render())?;
            Ok(EXIT_OK)
        }
        _ => report_error(out, &clap_message(err)),
    }
}

/// Run one request and print the result.
pub async fn run_query(
    dispatcher: &QueryDispatcher,
    request: Request,
    out: &mut impl Write,
) -> io::Result<u8> {
    match dispatcher.execute(request).await {
        Ok(response) => {
            let text = response.to_json_pretty().map_err(io::Error::other)?;
            writeln!(out, "{text}")?;
            Ok(EXIT_OK)
        }
        Err(err) => {
            debug!(kind = err.kind().as_str(), "operation failed");
            report_error(out, &err.to_string())
        }
    }
}

/// Print `{"error": message}` and return the error exit status.
pub fn report_error(out: &mut impl Write, message: &str) -> io::Result<u8> {
    let body = serde_json::to_string_pretty(&json!({ "error": message })).map_err(io::Error::other)?;
    writeln!(out, "{body}")?;
    Ok(EXIT_ERROR)
}

/// First line of clap's rendering, without the `error: ` prefix or usage.
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}
