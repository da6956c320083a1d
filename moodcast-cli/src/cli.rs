use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use moodcast_core::{
    Config, Dashboard, MemoryStore, MirrorStore, Pipeline, provider_from_config, store_from_config,
};
use tracing::info;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "moodcast", version, about = "Weather dashboard with a mood playlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key, default city and mirror database.
    Configure,

    /// Show the dashboard for a city.
    Show {
        /// City name; defaults to the configured default city.
        city: Option<String>,

        /// Print the dashboard as JSON.
        #[arg(long)]
        json: bool,

        /// Mirror into memory instead of the configured database.
        #[arg(long)]
        offline: bool,
    },

    /// Prompt for cities repeatedly, refreshing the dashboard each time.
    Session {
        /// Mirror into memory instead of the configured database.
        #[arg(long)]
        offline: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json, offline } => {
                let config = Config::load()?;
                let city = city.unwrap_or_else(|| config.default_city.clone());
                let mut dash = dashboard(&config, offline)?;

                dash.select_city(&city);
                dash.settle().await;

                let view = dash.view();
                if json {
                    println!("{}", serde_json::to_string_pretty(&view)?);
                } else {
                    print!("{}", render::dashboard(&view));
                }
                Ok(())
            }
            Command::Session { offline } => {
                let config = Config::load()?;
                let mut dash = dashboard(&config, offline)?;

                dash.start();
                dash.settle().await;
                print!("{}", render::dashboard(&dash.view()));

                loop {
                    let input = match Text::new("Cari kota:").with_help_message("Esc to quit").prompt() {
                        Ok(input) => input,
                        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                            break;
                        }
                        Err(e) => return Err(e.into()),
                    };
                    if input.trim().is_empty() {
                        break;
                    }

                    dash.select_city(&input);
                    dash.settle().await;
                    print!("{}", render::dashboard(&dash.view()));
                }
                Ok(())
            }
        }
    }
}

fn dashboard(config: &Config, offline: bool) -> anyhow::Result<Dashboard> {
    let provider = provider_from_config(config)?;

    let store: Box<dyn MirrorStore> = if offline {
        Box::new(MemoryStore::new())
    } else {
        store_from_config(&config.store).context("Invalid mirror database configuration")?
    };

    let pipeline = Pipeline::new(Arc::from(provider), Arc::from(store));
    Ok(Dashboard::new(pipeline, &config.default_city))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let city = Text::new("Default city:").with_default(&config.default_city).prompt()?;
    if !city.trim().is_empty() {
        config.default_city = city.trim().to_string();
    }

    let current_url = config.store.database_url.clone().unwrap_or_default();
    let url = Text::new("Realtime database URL (empty to disable mirroring):")
        .with_default(&current_url)
        .prompt()?;
    config.store.database_url = Some(url.trim().to_string()).filter(|u| !u.is_empty());

    if config.is_store_configured() {
        let token = Password::new("Database auth token (optional):")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;
        config.store.auth_token = Some(token.trim().to_string()).filter(|t| !t.is_empty());
    }

    let path = config.save()?;
    info!(path = %path.display(), "configuration saved");
    println!("Configuration saved to {}", path.display());
    Ok(())
}
