//! JMA AMeDAS data server.
//!
//! A directory of Japan Meteorological Agency observation stations with
//! name and geographic search, plus current, historical and forecast
//! weather from JMA's public data API. Everything is exposed twice: as MCP
//! tools and as a JSON-printing CLI, both over one [`dispatch::QueryDispatcher`].

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod jma;
pub mod mcp;
pub mod stations;
