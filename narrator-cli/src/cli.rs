use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text, validator::Validation};
use narrator_core::{Config, Orchestrator, UiState};

use crate::render::print_state;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "narrator",
    version,
    about = "Current weather for a city, described in plain language"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API credentials. Prompts for any key not given as a flag.
    Configure {
        /// OpenWeather API key.
        #[arg(long)]
        weather_key: Option<String>,

        /// Gemini API key.
        #[arg(long)]
        generation_key: Option<String>,

        /// Gemini model name, e.g. "gemini-1.5-flash".
        #[arg(long)]
        model: Option<String>,
    },

    /// Fetch and describe the weather for one city.
    Show {
        /// City name.
        city: String,
    },

    /// Ask for cities repeatedly until cancelled with Esc or Ctrl-C.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure { weather_key, generation_key, model } => {
                configure(weather_key, generation_key, model)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city } => {
                let orchestrator = orchestrator_from_disk()?;
                match follow(&orchestrator, &city).await? {
                    UiState::Success { .. } => Ok(ExitCode::SUCCESS),
                    _ => Ok(ExitCode::FAILURE),
                }
            }
            Command::Interactive => {
                let orchestrator = orchestrator_from_disk()?;
                interactive(&orchestrator).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn orchestrator_from_disk() -> anyhow::Result<Orchestrator> {
    let config = Config::load()?.with_env_overrides();
    Orchestrator::from_config(&config)
}

fn configure(
    weather_key: Option<String>,
    generation_key: Option<String>,
    model: Option<String>,
) -> anyhow::Result<()> {
    // Env overrides are not applied; only entered values reach the file.
    let mut config = Config::load()?;

    let weather_key = match weather_key {
        Some(key) => Some(key),
        None => prompt_key("OpenWeather API key:", config.weather.is_some())?,
    };
    if let Some(key) = weather_key {
        config.set_weather_api_key(key);
    }

    let generation_key = match generation_key {
        Some(key) => Some(key),
        None => prompt_key("Gemini API key:", config.generation.is_some())?,
    };
    if let Some(key) = generation_key {
        config.set_generation_api_key(key);
    }

    if let Some(model) = model {
        match config.generation.as_mut() {
            Some(generation) => generation.model = Some(model),
            None => bail!("Set a Gemini API key before choosing a model."),
        }
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    if !config.is_complete() {
        println!("Both an OpenWeather and a Gemini API key are needed before fetching weather.");
    }

    Ok(())
}

/// Ask for a key; an empty answer keeps the stored one when there is one.
fn prompt_key(message: &str, has_existing: bool) -> anyhow::Result<Option<String>> {
    let help = if has_existing { "Leave empty to keep the current key" } else { "Required" };

    let key = Password::new(message)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message(help)
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim();
    if key.is_empty() {
        if has_existing {
            return Ok(None);
        }
        bail!("An API key is required.");
    }

    Ok(Some(key.to_string()))
}

async fn interactive(orchestrator: &Orchestrator) -> anyhow::Result<()> {
    print_state(&orchestrator.current(), None);

    loop {
        let city = Text::new("City:")
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(Validation::Invalid("Enter a city name".into()))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .prompt();

        let city = match city {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        follow(orchestrator, &city).await?;
        println!();
    }

    Ok(())
}

/// Submit `city` and print every state observed until a terminal one.
async fn follow(orchestrator: &Orchestrator, city: &str) -> anyhow::Result<UiState> {
    let mut rx = orchestrator.subscribe();
    let Some(task) = orchestrator.submit(city) else {
        bail!("City name must not be empty.");
    };

    let last = loop {
        let state = rx.borrow_and_update().clone();
        print_state(&state, Some(city));
        if state.is_terminal() {
            break state;
        }
        rx.changed().await.context("Orchestrator stopped publishing state")?;
    };

    task.await.context("Weather request task failed")?;
    Ok(last)
}
