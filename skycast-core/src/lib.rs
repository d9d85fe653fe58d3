//! Core library for the `skycast` weather lookup client.
//!
//! This crate defines:
//! - Configuration and the persisted "last city" preference
//! - The OpenWeather client behind the [`WeatherApi`] trait
//! - Suggestion and weather fetchers
//! - The search box state machine and the application shell driving it
//! - Plain-text views of the fetched data
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod search;
pub mod state;
pub mod store;
pub mod suggest;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::App;
pub use config::Config;
pub use error::WeatherError;
pub use model::{
    Condition, CurrentWeather, ForecastDay, ForecastEntry, IconSize, LocationSuggestion,
    WeatherReport,
};
pub use provider::{WeatherApi, api_from_config, openweather::OpenWeatherClient};
pub use search::{InputEvent, Key, SearchMode};
pub use state::View;
pub use store::{FileStore, MemoryStore, PreferenceStore};
