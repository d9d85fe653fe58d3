use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::{
    Config, WeatherError,
    config::{DEFAULT_API_BASE, DEFAULT_GEO_BASE},
    model::{Condition, CurrentWeather, ForecastEntry, LocationSuggestion},
};

use super::WeatherApi;

const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    api_base: String,
    geo_base: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            geo_base: DEFAULT_GEO_BASE.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: config.api_key_or_empty().to_string(),
            api_base: trim_base(&config.api_base),
            geo_base: trim_base(&config.geo_base),
            http,
        })
    }

    async fn get_city(&self, endpoint: &'static str, city: &str) -> Result<Response, WeatherError> {
        let url = format!("{}/{endpoint}", self.api_base);
        debug!(endpoint, city, "Requesting OpenWeather data");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", UNITS),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        Ok(res)
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    res: Response,
) -> Result<T, WeatherError> {
    let body = res.text().await?;
    serde_json::from_str(&body).map_err(|e| WeatherError::decode(endpoint, e.to_string()))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
    description: String,
    icon: String,
}

impl From<OwWeather> for Condition {
    fn from(w: OwWeather) -> Self {
        Self {
            id: w.id,
            main: w.main,
            description: w.description,
            icon: w.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn first_condition(
    endpoint: &'static str,
    weather: Vec<OwWeather>,
) -> Result<Condition, WeatherError> {
    weather
        .into_iter()
        .next()
        .map(Condition::from)
        .ok_or_else(|| WeatherError::decode(endpoint, "record has no weather condition"))
}

fn timestamp(endpoint: &'static str, ts: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| WeatherError::decode(endpoint, format!("invalid timestamp {ts}")))
}

impl TryFrom<OwCurrentResponse> for CurrentWeather {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            city: parsed.name,
            country: parsed.sys.country,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            condition: first_condition("weather", parsed.weather)?,
            observed_at: timestamp("weather", parsed.dt)?,
        })
    }
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = WeatherError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: timestamp("forecast", entry.dt)?,
            label: entry.dt_txt,
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
            condition: first_condition("forecast", entry.weather)?,
        })
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn geocode(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<LocationSuggestion>, WeatherError> {
        let url = format!("{}/direct", self.geo_base);
        debug!(query, limit, "Requesting OpenWeather geocoding");
        let limit = limit.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint: "geocoding",
                status,
            });
        }

        decode("geocoding", res).await
    }

    async fn current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let res = self.get_city("weather", city).await?;

        if !res.status().is_success() {
            debug!(city, status = %res.status(), "Current weather lookup rejected");
            return Err(WeatherError::CityNotFound);
        }

        let parsed: OwCurrentResponse = decode("weather", res).await?;
        CurrentWeather::try_from(parsed)
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let res = self.get_city("forecast", city).await?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint: "forecast",
                status,
            });
        }

        let parsed: OwForecastResponse = decode("forecast", res).await?;
        parsed.list.into_iter().map(ForecastEntry::try_from).collect()
    }
}

fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
