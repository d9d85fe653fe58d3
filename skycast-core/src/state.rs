//! Top-level application state and the reducer that drives it.
//!
//! Every change to [`AppState`] goes through [`update`], which returns the
//! side effect (if any) for the driver to carry out.

use tracing::debug;

use crate::{WeatherError, model::WeatherReport};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    report: Option<WeatherReport>,
    loading: bool,
    error: Option<String>,
    latest_request: u64,
}

/// What the shell should render, by precedence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Loading,
    Error(&'a str),
    Result(&'a WeatherReport),
    Empty,
}

impl AppState {
    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sequence number of the most recently issued search.
    pub fn latest_request(&self) -> u64 {
        self.latest_request
    }

    pub fn view(&self) -> View<'_> {
        if self.loading {
            View::Loading
        } else if let Some(error) = self.error.as_deref() {
            View::Error(error)
        } else if let Some(report) = self.report.as_ref() {
            View::Result(report)
        } else {
            View::Empty
        }
    }
}

#[derive(Debug)]
pub enum Action {
    Search(String),
    WeatherLoaded {
        request: u64,
        city: String,
        result: Result<WeatherReport, WeatherError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchWeather { request: u64, city: String },
    /// Remember `city` as the last successful search.
    PersistCity(String),
}

pub fn update(state: &mut AppState, action: Action) -> Option<Effect> {
    match action {
        Action::Search(city) => {
            if city.trim().is_empty() {
                return None;
            }

            state.latest_request += 1;
            state.loading = true;
            state.error = None;

            Some(Effect::FetchWeather {
                request: state.latest_request,
                city,
            })
        }
        Action::WeatherLoaded {
            request,
            city,
            result,
        } => {
            if request != state.latest_request {
                debug!(
                    request,
                    latest = state.latest_request,
                    %city,
                    "Discarding stale weather response"
                );
                return None;
            }

            state.loading = false;
            match result {
                Ok(report) => {
                    state.report = Some(report);
                    state.error = None;
                    Some(Effect::PersistCity(city))
                }
                Err(e) => {
                    state.report = None;
                    state.error = Some(e.to_string());
                    None
                }
            }
        }
    }
}
