//! Current conditions plus a one-reading-per-day forecast for a city.

use tracing::debug;

use crate::{
    WeatherError,
    model::{ForecastDay, ForecastEntry, WeatherReport},
    provider::WeatherApi,
};

/// Label fragment marking the reading used to represent each day.
pub const NOON_MARKER: &str = "12:00:00";

/// Number of forecast days shown.
pub const FORECAST_DAYS: usize = 5;

/// Fetch current weather, then the forecast, for `city`.
///
/// The forecast endpoint is only called once the current-weather lookup has
/// succeeded.
pub async fn fetch_weather(
    api: &dyn WeatherApi,
    city: &str,
) -> Result<WeatherReport, WeatherError> {
    let current = api.current(city).await?;
    let entries = api.forecast(city).await?;

    let forecast = daily_forecast(entries);
    debug!(city, days = forecast.len(), "Fetched weather report");

    Ok(WeatherReport { current, forecast })
}

/// Keep the noon reading of each day, at most [`FORECAST_DAYS`] of them.
///
/// Feeds with fewer noon entries produce a shorter forecast.
pub fn daily_forecast(entries: Vec<ForecastEntry>) -> Vec<ForecastDay> {
    entries
        .into_iter()
        .filter(|e| e.label.contains(NOON_MARKER))
        .take(FORECAST_DAYS)
        .map(ForecastDay::from)
        .collect()
}
