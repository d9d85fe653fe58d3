use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// A candidate location returned by the geocoding endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl LocationSuggestion {
    /// Text committed to the search field when this suggestion is picked.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Row label for the suggestion list, including the region when known.
    pub fn label(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, state, self.country)
            }
            _ => self.display_name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    /// Large icon shown next to the current conditions.
    Current,
    /// Smaller icon used on forecast cards.
    Forecast,
}

impl IconSize {
    fn suffix(self) -> &'static str {
        match self {
            IconSize::Current => "@4x",
            IconSize::Forecast => "@2x",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// OpenWeather condition code, e.g. 800 for clear sky.
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    pub fn icon_url(&self, size: IconSize) -> String {
        format!("{ICON_BASE_URL}/{}{}.png", self.icon, size.suffix())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: Condition,
    pub observed_at: DateTime<Utc>,
}

/// One 3-hour interval of the forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    /// Textual timestamp as sent by the service, "YYYY-MM-DD HH:MM:SS".
    pub label: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: Condition,
}

/// A single representative reading for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: Condition,
}

impl From<ForecastEntry> for ForecastDay {
    fn from(entry: ForecastEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            temperature: entry.temperature,
            feels_like: entry.feels_like,
            humidity: entry.humidity,
            wind_speed: entry.wind_speed,
            condition: entry.condition,
        }
    }
}

/// Current conditions and the daily forecast, always replaced together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}
