use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use inquire::{
    CustomUserError,
    autocompletion::{Autocomplete, Replacement},
};
use skycast_core::{
    LocationSuggestion, WeatherApi, search::DEBOUNCE_DELAY, suggest::fetch_suggestions,
};
use tokio::runtime::Handle;
use tracing::debug;

/// Tells whether the user is still typing.
pub trait KeystrokeWatch: Send + Sync {
    /// True when another key arrives within `window`. Must not consume the key.
    fn arrives_within(&self, window: Duration) -> bool;
}

/// Watches the terminal the prompt reads from.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalWatch;

impl KeystrokeWatch for TerminalWatch {
    fn arrives_within(&self, window: Duration) -> bool {
        crossterm::event::poll(window).unwrap_or(false)
    }
}

/// City suggestions for the interactive prompt.
///
/// The prompt asks for suggestions after every edit and cannot be refreshed
/// later, so the quiet period is waited out here: a lookup only runs once no
/// key follows within [`DEBOUNCE_DELAY`]. While typing continues the previous
/// list stays on screen.
///
/// The prompt runs on a blocking thread, so lookups are driven through the
/// runtime handle captured at construction.
#[derive(Clone)]
pub struct CityAutocomplete {
    api: Arc<dyn WeatherApi>,
    runtime: Handle,
    watch: Arc<dyn KeystrokeWatch>,
    last: Arc<Mutex<(String, Vec<LocationSuggestion>)>>,
}

impl CityAutocomplete {
    /// Must be called from within the Tokio runtime.
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self::with_watch(api, Handle::current(), Arc::new(TerminalWatch))
    }

    pub fn with_watch(
        api: Arc<dyn WeatherApi>,
        runtime: Handle,
        watch: Arc<dyn KeystrokeWatch>,
    ) -> Self {
        Self {
            api,
            runtime,
            watch,
            last: Arc::default(),
        }
    }

    fn cached(&self) -> (String, Vec<LocationSuggestion>) {
        self.last.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Map a submitted suggestion row back to the "name, country" search text.
    pub fn resolve(&self, answer: &str) -> String {
        let (_, suggestions) = self.cached();
        suggestions
            .iter()
            .find(|s| s.label() == answer)
            .map(LocationSuggestion::display_name)
            .unwrap_or_else(|| answer.to_string())
    }
}

impl Autocomplete for CityAutocomplete {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        let (query, cached) = self.cached();
        let suggestions = if query == input {
            cached
        } else if self.watch.arrives_within(DEBOUNCE_DELAY) {
            debug!(input, "Still typing, lookup deferred");
            cached
        } else {
            let fetched = self.runtime.block_on(fetch_suggestions(self.api.as_ref(), input));
            if let Ok(mut last) = self.last.lock() {
                *last = (input.to_string(), fetched.clone());
            }
            fetched
        };

        Ok(suggestions.iter().map(LocationSuggestion::label).collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion.map(|label| self.resolve(&label)))
    }
}
