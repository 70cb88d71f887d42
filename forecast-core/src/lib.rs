//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Defensive field access over upstream forecast records
//! - Day bucketing and one-sample-per-day selection
//! - The view model the renderer consumes
//! - The fetch lifecycle (pending / success / error) per location
//! - Configuration and the OpenWeather fetch collaborator
//!
//! It is used by `forecast-cli`, but the normalization pieces are pure and can
//! be reused by any other front end.

pub mod access;
pub mod bucket;
pub mod config;
pub mod daily;
pub mod error;
pub mod model;
pub mod provider;
pub mod state;
pub mod view;

pub use bucket::{DayBucketer, DayZone};
pub use config::Config;
pub use daily::{DailyEntry, DayGroup, group_by_day, select_daily};
pub use error::FetchError;
pub use model::{City, Coordinates, ForecastPayload, ForecastSeries, Location, Observation};
pub use provider::{ForecastSource, source_from_config};
pub use state::{FetchTicket, QueryCoordinator, QueryState, Rendered, Resolution, fetch_ticket};
pub use view::ForecastView;
