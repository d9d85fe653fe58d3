//! Plain-text rendering of fetched weather data.

use chrono::{Local, TimeZone};
use std::fmt::{Display, Write};

use crate::{
    model::{CurrentWeather, ForecastDay, IconSize},
    state::View,
};

pub const EMPTY_PROMPT: &str = "Enter a city name to get started";
pub const LOADING_TEXT: &str = "Loading weather...";

/// Halves round up, so -2.5 shows as -2.
fn whole_degrees(t: f64) -> i64 {
    (t + 0.5).floor() as i64
}

pub fn render_current(weather: &CurrentWeather) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}, {}", weather.city, weather.country);
    let _ = writeln!(
        out,
        "{}°C  {}",
        whole_degrees(weather.temperature),
        weather.condition.description
    );
    let _ = writeln!(
        out,
        "Humidity: {}%  Wind: {} m/s  Feels like: {:.1}°C",
        weather.humidity, weather.wind_speed, weather.feels_like
    );
    let _ = writeln!(out, "Icon: {}", weather.condition.icon_url(IconSize::Current));
    out
}

/// Forecast cards labelled with the weekday in the local time zone.
pub fn render_forecast(days: &[ForecastDay]) -> String {
    render_forecast_in(days, &Local)
}

pub fn render_forecast_in<Tz>(days: &[ForecastDay], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::from("5-Day Forecast\n");
    for day in days {
        let _ = writeln!(
            out,
            "{}  {:>4}°C  {}  ({})",
            day.timestamp.with_timezone(tz).format("%a"),
            whole_degrees(day.temperature),
            day.condition.description,
            day.condition.icon_url(IconSize::Forecast),
        );
    }
    out
}

pub fn render_view(view: View<'_>) -> String {
    match view {
        View::Loading => format!("{LOADING_TEXT}\n"),
        View::Error(message) => format!("{message}\n"),
        View::Result(report) => {
            let mut out = render_current(&report.current);
            if !report.forecast.is_empty() {
                out.push('\n');
                out.push_str(&render_forecast(&report.forecast));
            }
            out
        }
        View::Empty => format!("{EMPTY_PROMPT}\n"),
    }
}
