//! Search box behaviour: debounced suggestions and keyboard navigation.
//!
//! [`SearchState`] is the pure state machine; [`SearchController`] owns it
//! together with the timers and runs the suggestion lookups.

use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::{
    debounce::Debouncer, model::LocationSuggestion, provider::WeatherApi,
    suggest::fetch_suggestions,
};

/// Quiet period after the last keystroke before suggestions are fetched.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// How long the list survives losing focus, so a pointer pick still lands.
pub const BLUR_GRACE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    TextChanged(String),
    Key(Key),
    /// Pointer selection of the suggestion at this index.
    Select(usize),
    Focus,
    Blur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Idle,
    SuggestionsVisible,
    Navigating(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Debounced suggestion lookup for this text.
    FetchSuggestions(String),
    HideAfterGrace,
    CancelHide,
    /// Run a weather search for this text.
    Search(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub command: Option<SearchCommand>,
    /// The key was consumed and the field's own handling must not run.
    pub prevent_default: bool,
}

impl Response {
    fn command(command: SearchCommand) -> Self {
        Self {
            command: Some(command),
            prevent_default: false,
        }
    }

    fn consumed(command: Option<SearchCommand>) -> Self {
        Self {
            command,
            prevent_default: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    suggestions: Vec<LocationSuggestion>,
    highlighted: Option<usize>,
    visible: bool,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[LocationSuggestion] {
        &self.suggestions
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Whether the suggestion list is on screen.
    pub fn is_visible(&self) -> bool {
        self.visible && !self.suggestions.is_empty()
    }

    pub fn mode(&self) -> SearchMode {
        match (self.is_visible(), self.highlighted) {
            (false, _) => SearchMode::Idle,
            (true, Some(index)) => SearchMode::Navigating(index),
            (true, None) => SearchMode::SuggestionsVisible,
        }
    }

    /// Pre-fill the field without triggering a lookup.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn handle(&mut self, event: InputEvent) -> Response {
        match event {
            InputEvent::TextChanged(text) => {
                self.visible = !text.is_empty();
                self.query = text.clone();
                Response::command(SearchCommand::FetchSuggestions(text))
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Select(index) => Response {
                command: self.commit(index),
                prevent_default: false,
            },
            InputEvent::Focus => {
                if !self.query.is_empty() && !self.suggestions.is_empty() {
                    self.visible = true;
                }
                Response::command(SearchCommand::CancelHide)
            }
            InputEvent::Blur => Response::command(SearchCommand::HideAfterGrace),
        }
    }

    fn handle_key(&mut self, key: Key) -> Response {
        if !self.is_visible() {
            return match key {
                Key::Enter => Response::command(SearchCommand::Search(self.query.clone())),
                _ => Response::default(),
            };
        }

        let len = self.suggestions.len();
        match key {
            Key::Down => {
                self.highlighted = Some(match self.highlighted {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                });
                Response::consumed(None)
            }
            Key::Up => {
                self.highlighted = Some(match self.highlighted {
                    Some(i) if i > 0 => i - 1,
                    _ => len - 1,
                });
                Response::consumed(None)
            }
            Key::Enter => {
                let command = match self.highlighted {
                    Some(index) => self.commit(index),
                    None => Some(SearchCommand::Search(self.query.clone())),
                };
                Response::consumed(command)
            }
            Key::Escape => {
                self.visible = false;
                self.highlighted = None;
                Response::default()
            }
        }
    }

    fn commit(&mut self, index: usize) -> Option<SearchCommand> {
        let suggestion = self.suggestions.get(index)?;
        self.query = suggestion.display_name();
        self.visible = false;
        self.highlighted = None;
        Some(SearchCommand::Search(self.query.clone()))
    }

    /// Install a fresh suggestion list; the highlight always resets.
    pub fn apply_suggestions(&mut self, suggestions: Vec<LocationSuggestion>) {
        self.visible = !suggestions.is_empty() && !self.query.is_empty();
        self.suggestions = suggestions;
        self.highlighted = None;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Completions posted back to the owner of a [`SearchController`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    SuggestionsLoaded {
        query: String,
        suggestions: Vec<LocationSuggestion>,
    },
    HideSuggestions,
}

/// What the owner has to act on after an input event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub search: Option<String>,
    pub prevent_default: bool,
}

#[derive(Debug)]
pub struct SearchController {
    state: SearchState,
    api: Arc<dyn WeatherApi>,
    events: UnboundedSender<SearchEvent>,
    debounce: Debouncer,
    blur_grace: Debouncer,
}

impl SearchController {
    pub fn new(api: Arc<dyn WeatherApi>, events: UnboundedSender<SearchEvent>) -> Self {
        Self {
            state: SearchState::default(),
            api,
            events,
            debounce: Debouncer::new(DEBOUNCE_DELAY),
            blur_grace: Debouncer::new(BLUR_GRACE),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.set_query(query);
    }

    pub fn handle(&mut self, event: InputEvent) -> Outcome {
        let response = self.state.handle(event);
        let mut outcome = Outcome {
            search: None,
            prevent_default: response.prevent_default,
        };

        match response.command {
            Some(SearchCommand::FetchSuggestions(query)) => self.schedule_lookup(query),
            Some(SearchCommand::HideAfterGrace) => {
                let events = self.events.clone();
                self.blur_grace.schedule(async move {
                    let _ = events.send(SearchEvent::HideSuggestions);
                });
            }
            Some(SearchCommand::CancelHide) => self.blur_grace.cancel(),
            Some(SearchCommand::Search(city)) => outcome.search = Some(city),
            None => {}
        }

        outcome
    }

    fn schedule_lookup(&mut self, query: String) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();

        self.debounce.schedule(async move {
            let suggestions = fetch_suggestions(api.as_ref(), &query).await;
            let _ = events.send(SearchEvent::SuggestionsLoaded { query, suggestions });
        });
    }

    /// Apply a completion produced by one of this controller's timers.
    pub fn apply(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::SuggestionsLoaded { query, suggestions } => {
                if query != self.state.query {
                    debug!(%query, "Dropping suggestions for outdated text");
                    return;
                }
                self.state.apply_suggestions(suggestions);
            }
            SearchEvent::HideSuggestions => self.state.hide(),
        }
    }
}
