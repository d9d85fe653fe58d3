use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use skycast_core::{App, Config, FileStore, View, api_from_config, view::render_view};
use tracing::debug;

use crate::complete::CityAutocomplete;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and 5-day forecast by city")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather and the 5-day forecast.
    Show {
        /// City name, e.g. "London, GB". Defaults to the last searched city.
        city: Option<String>,
    },

    /// Search cities with live suggestions until cancelled (Esc / Ctrl-C).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(city).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_app(config: &Config) -> anyhow::Result<App> {
    let api = api_from_config(config)?;
    let store = FileStore::from_default_location()?;
    Ok(App::new(api, Arc::new(store)))
}

async fn show(city: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut app = build_app(&config)?;
    debug!(?city, "Showing weather");

    match city {
        Some(city) => app.search_city(&city),
        None => app.start(),
    }
    app.wait_idle().await;

    print!("{}", shown(app.view())?);
    Ok(())
}

/// Text for a finished `show`; a failed search becomes the command error.
fn shown(view: View<'_>) -> anyhow::Result<String> {
    if let View::Error(message) = view {
        bail!("{message}");
    }
    Ok(render_view(view))
}

async fn interactive() -> anyhow::Result<()> {
    let config = Config::load()?;
    if !config.is_configured() {
        eprintln!("Hint: run `skycast configure` to store your OpenWeather API key.");
    }

    let mut app = build_app(&config)?;
    app.start();
    app.wait_idle().await;
    print!("{}", render_view(app.view()));

    let autocomplete = CityAutocomplete::new(api_from_config(&config)?);

    loop {
        let prompt_completer = autocomplete.clone();
        let initial = app.search_state().query().to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Text::new("City:")
                .with_initial_value(&initial)
                .with_autocomplete(prompt_completer)
                .prompt()
        })
        .await
        .context("Prompt task failed")?;

        let answer = match answer {
            Ok(answer) => answer,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        let city = autocomplete.resolve(&answer);
        debug!(%city, "Searching from prompt");
        app.search_city(&city);
        app.wait_idle().await;
        println!();
        print!("{}", render_view(app.view()));
    }

    Ok(())
}
