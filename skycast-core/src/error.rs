use thiserror::Error;

/// Failures talking to the weather service.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The current-weather endpoint rejected the city.
    #[error("City not found. Please check the spelling and try again.")]
    CityNotFound,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenWeather {endpoint} request failed with status {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Failed to parse OpenWeather {endpoint} response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl WeatherError {
    pub(crate) fn decode(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint,
            message: message.into(),
        }
    }
}
