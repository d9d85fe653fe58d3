//! In-memory weather service used by unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::{collections::HashMap, sync::Mutex, time::Duration};

use crate::{
    WeatherError,
    model::{Condition, CurrentWeather, ForecastEntry, LocationSuggestion},
    provider::WeatherApi,
};

#[derive(Debug, Default)]
struct Calls {
    geocode: Vec<String>,
    current: Vec<String>,
    forecast: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    suggestions: Vec<LocationSuggestion>,
    fail_geocode: bool,
    unknown_cities: Vec<String>,
    forecast: Option<Vec<ForecastEntry>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Calls>,
}

impl FakeApi {
    pub fn with_suggestions(mut self, suggestions: Vec<LocationSuggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn failing_geocode(mut self) -> Self {
        self.fail_geocode = true;
        self
    }

    pub fn unknown_city(mut self, city: &str) -> Self {
        self.unknown_cities.push(city.to_string());
        self
    }

    pub fn with_forecast(mut self, entries: Vec<ForecastEntry>) -> Self {
        self.forecast = Some(entries);
        self
    }

    /// Delay the current-weather response for `city`.
    pub fn with_delay(mut self, city: &str, delay: Duration) -> Self {
        self.delays.insert(city.to_string(), delay);
        self
    }

    pub fn geocode_calls(&self) -> usize {
        self.calls.lock().unwrap().geocode.len()
    }

    pub fn geocode_queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().geocode.clone()
    }

    pub fn current_queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().current.clone()
    }

    pub fn forecast_queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().forecast.clone()
    }
}

#[async_trait]
impl WeatherApi for FakeApi {
    async fn geocode(
        &self,
        query: &str,
        _limit: u8,
    ) -> Result<Vec<LocationSuggestion>, WeatherError> {
        self.calls.lock().unwrap().geocode.push(query.to_string());
        if self.fail_geocode {
            return Err(WeatherError::Status {
                endpoint: "geocoding",
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(self.suggestions.clone())
    }

    async fn current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        self.calls.lock().unwrap().current.push(city.to_string());
        if let Some(delay) = self.delays.get(city) {
            tokio::time::sleep(*delay).await;
        }
        if self.unknown_cities.iter().any(|c| c == city) {
            return Err(WeatherError::CityNotFound);
        }
        Ok(current_for(city))
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        self.calls.lock().unwrap().forecast.push(city.to_string());
        Ok(self.forecast.clone().unwrap_or_else(|| forecast_feed(start(), 40)))
    }
}

pub(crate) fn london() -> LocationSuggestion {
    LocationSuggestion {
        name: "London".into(),
        country: "GB".into(),
        state: Some("England".into()),
        lat: 51.5073,
        lon: -0.1276,
    }
}

pub(crate) fn clear_sky() -> Condition {
    Condition {
        id: 800,
        main: "Clear".into(),
        description: "clear sky".into(),
        icon: "01d".into(),
    }
}

pub(crate) fn current_for(city: &str) -> CurrentWeather {
    CurrentWeather {
        city: city.to_string(),
        country: "GB".into(),
        temperature: 14.6,
        feels_like: 13.27,
        humidity: 72,
        wind_speed: 3.6,
        condition: clear_sky(),
        observed_at: start(),
    }
}

/// Midnight UTC on Monday 2024-01-15.
pub(crate) fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
}

/// `count` consecutive 3-hour entries beginning at `from`.
pub(crate) fn forecast_feed(from: DateTime<Utc>, count: usize) -> Vec<ForecastEntry> {
    (0..count)
        .map(|i| {
            let timestamp = from + ChronoDuration::hours(3 * i as i64);
            ForecastEntry {
                timestamp,
                label: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                temperature: i as f64,
                feels_like: i as f64 - 1.0,
                humidity: 60,
                wind_speed: 2.0,
                condition: clear_sky(),
            }
        })
        .collect()
}
