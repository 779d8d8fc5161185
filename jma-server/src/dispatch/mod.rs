//! Query dispatch.
//!
//! Both front ends (MCP tools and the CLI) funnel through
//! [`QueryDispatcher`]: a request names an [`Operation`], carries typed
//! arguments, and yields a serializable [`Response`] or a
//! [`DispatchError`] with a stable [`ErrorKind`].

mod dispatcher;
mod dto;
mod error;
mod operation;
mod request;


pub use dispatcher::{MAX_LOCATION_DISTANCE_KM, QueryDispatcher};
pub use dto::{
    ForecastResult, LocationResult, NameResult, NearbyResult, PrefectureListResult,
    PrefectureResult, Response, SearchCenter, SeriesPointResult, SnapshotResult,
    StationListResult, StationPageResult, StationResult, StationTypeResult, StationWeatherResult,
    TimeSeriesResult,
};
pub use error::{DispatchError, ErrorKind};
pub use operation::Operation;
pub use request::{
    GetCurrentWeatherArgs, GetForecastArgs, GetHistoricalWeatherArgs, GetStationInfoArgs,
    GetStationsOfTypeArgs, GetWeatherByLocationArgs, GetWeatherTimeSeriesArgs, ListPrefecturesArgs,
    ListStationsArgs, Request, SearchNearbyStationsArgs, SearchStationsArgs,
};
