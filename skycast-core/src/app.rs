//! Application shell: wires the search box, the reducer and the fetchers.

use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::{
    fetch::fetch_weather,
    provider::WeatherApi,
    search::{InputEvent, Outcome, SearchController, SearchEvent, SearchState},
    state::{Action, AppState, Effect, View, update},
    store::PreferenceStore,
};

/// Owns all UI state. Background tasks only do I/O and report back here.
#[derive(Debug)]
pub struct App {
    api: Arc<dyn WeatherApi>,
    store: Arc<dyn PreferenceStore>,
    state: AppState,
    search: SearchController,
    search_rx: UnboundedReceiver<SearchEvent>,
    actions_tx: UnboundedSender<Action>,
    actions_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(api: Arc<dyn WeatherApi>, store: Arc<dyn PreferenceStore>) -> Self {
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();

        Self {
            search: SearchController::new(Arc::clone(&api), search_tx),
            api,
            store,
            state: AppState::default(),
            search_rx,
            actions_tx,
            actions_rx,
        }
    }

    /// Restore the last searched city and look it up straight away.
    pub fn start(&mut self) {
        match self.store.last_city() {
            Ok(Some(city)) => {
                info!(%city, "Restoring last searched city");
                self.search.set_query(city.clone());
                self.dispatch(Action::Search(city));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not read last searched city"),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn search_state(&self) -> &SearchState {
        self.search.state()
    }

    pub fn view(&self) -> View<'_> {
        self.state.view()
    }

    /// Feed a search box event; searches it requests are started immediately.
    pub fn input(&mut self, event: InputEvent) -> Outcome {
        let outcome = self.search.handle(event);
        if let Some(city) = outcome.search.clone() {
            self.dispatch(Action::Search(city));
        }
        outcome
    }

    /// Search for `city` as if it had been typed and submitted.
    pub fn search_city(&mut self, city: &str) {
        self.search.set_query(city);
        self.dispatch(Action::Search(city.to_string()));
    }

    fn dispatch(&mut self, action: Action) {
        if let Some(effect) = update(&mut self.state, action) {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::FetchWeather { request, city } => {
                debug!(request, %city, "Starting weather search");
                let api = Arc::clone(&self.api);
                let actions = self.actions_tx.clone();

                tokio::spawn(async move {
                    let result = fetch_weather(api.as_ref(), &city).await;
                    let _ = actions.send(Action::WeatherLoaded {
                        request,
                        city,
                        result,
                    });
                });
            }
            Effect::PersistCity(city) => {
                if let Err(e) = self.store.set_last_city(&city) {
                    warn!(%city, error = %e, "Could not save last searched city");
                }
            }
        }
    }

    /// Wait for one background completion and apply it.
    pub async fn next_event(&mut self) {
        tokio::select! {
            Some(event) = self.search_rx.recv() => self.search.apply(event),
            Some(action) = self.actions_rx.recv() => self.dispatch(action),
            else => {}
        }
    }

    /// Apply completions until no weather search is in flight.
    pub async fn wait_idle(&mut self) {
        while self.state.is_loading() {
            self.next_event().await;
        }
    }
}
