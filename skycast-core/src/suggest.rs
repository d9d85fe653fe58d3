//! Best-effort location suggestions for the search box.

use tracing::debug;

use crate::{model::LocationSuggestion, provider::WeatherApi};

/// Queries shorter than this (after trimming) never reach the network.
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum number of candidates requested from the geocoding endpoint.
pub const SUGGESTION_LIMIT: u8 = 5;

/// Fetch up to [`SUGGESTION_LIMIT`] candidate locations for `query`.
///
/// Failures of any kind degrade to an empty list.
pub async fn fetch_suggestions(api: &dyn WeatherApi, query: &str) -> Vec<LocationSuggestion> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    match api.geocode(query, SUGGESTION_LIMIT).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            debug!(query, error = %e, "Suggestion lookup failed");
            Vec::new()
        }
    }
}
