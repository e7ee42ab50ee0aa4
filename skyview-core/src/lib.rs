//! Core library for the `skyview` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather aggregator (current conditions + hourly + daily, normalized)
//! - The background image resolver with its placeholder fallback
//! - Dashboard composition and the displayed-state policy
//!
//! It is used by `skyview-cli`, but can also be reused by other front ends.

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod http;
pub mod model;
pub mod source;
pub mod units;

pub use config::{Config, Endpoints};
pub use dashboard::Dashboard;
pub use display::{DisplayPolicy, DisplayState, Ticket};
pub use error::{DegradedForecast, ImageUnavailable, UpstreamError};
pub use http::HttpFetcher;
pub use model::{
    DailySample, DashboardView, HourlySample, ImageResult, LocationQuery, NormalizedWeather,
};
pub use source::{
    BackgroundSource, ImageResolver, ImageSettings, ImageStrategy, LandmarkTable, WeatherAggregator,
    WeatherSettings, WeatherSource,
};
