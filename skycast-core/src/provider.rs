use crate::{
    Config, WeatherError,
    model::{CurrentWeather, ForecastEntry, LocationSuggestion},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// The three endpoints the client needs from a weather service.
///
/// All queries use metric units.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Resolve free text into at most `limit` candidate locations.
    async fn geocode(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<LocationSuggestion>, WeatherError>;

    /// Current conditions for a city. A rejected city is [`WeatherError::CityNotFound`].
    async fn current(&self, city: &str) -> Result<CurrentWeather, WeatherError>;

    /// Raw 3-hour interval forecast for a city.
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError>;
}

/// Construct the OpenWeather client from config.
pub fn api_from_config(config: &Config) -> Result<Arc<dyn WeatherApi>, WeatherError> {
    if !config.is_configured() {
        tracing::warn!("No OpenWeather API key configured; requests will be rejected");
    }

    Ok(Arc::new(OpenWeatherClient::from_config(config)?))
}
