use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use std::path::PathBuf;
use weather_core::{
    Config, HistoryStore, Outcome, Session, TemperatureUnit, UnitsMode, WeatherView,
    provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default units.
    Configure,

    /// Show weather for a place.
    Show {
        /// City or place name.
        place: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Show weather for the current location, detected from your IP address.
    Here {
        #[command(flatten)]
        display: DisplayArgs,
    },

    /// List recent searches, most recent first.
    History,
}

#[derive(Debug, clap::Args)]
pub struct DisplayArgs {
    /// Units requested from the API: metric, imperial or standard.
    #[arg(long)]
    units: Option<String>,

    /// Display temperatures in °F.
    #[arg(long, short = 'f')]
    fahrenheit: bool,

    /// Print the view as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { place, display } => {
                let (session, json) = open_session(&display)?;
                let outcome = session.search(&place).await?;
                print_outcome(outcome, json)
            }
            Command::Here { display } => {
                let (session, json) = open_session(&display)?;
                let outcome = session.search_here().await?;
                print_outcome(outcome, json)
            }
            Command::History => {
                let config = Config::load().context("Failed to load configuration")?;
                let store = HistoryStore::open(history_path(&config));
                render::print_history(store.entries());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file().context("Failed to load configuration")?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let units = Select::new("Default units:", UnitsMode::all().to_vec())
        .prompt()
        .context("Failed to read units")?;
    config.units = units;

    config.validate()?;
    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Load and validate configuration, then wire the session. Fails before any
/// request if the configuration is incomplete.
fn open_session(args: &DisplayArgs) -> anyhow::Result<(Session, bool)> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(units) = &args.units {
        config.units = UnitsMode::try_from(units.as_str())?;
    }

    let provider = provider_from_config(&config)?;
    let history = HistoryStore::open(history_path(&config));
    tracing::debug!(history = %history.path().display(), units = %config.units, "session ready");

    let unit = if args.fahrenheit || config.units == UnitsMode::Imperial {
        TemperatureUnit::Fahrenheit
    } else {
        TemperatureUnit::Celsius
    };

    Ok((Session::new(provider, history, unit), args.json))
}

fn history_path(config: &Config) -> PathBuf {
    config.history_path().unwrap_or_else(|| PathBuf::from("search_history.json"))
}

fn print_outcome(outcome: Outcome, json: bool) -> anyhow::Result<()> {
    let view: WeatherView = match outcome {
        Outcome::Applied(view) => view,
        Outcome::Superseded => bail!("Weather lookup was superseded by a newer one"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_view(&view));
    }
    Ok(())
}
