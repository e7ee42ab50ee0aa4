use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, builder::PossibleValuesParser};
use inquire::{Password, PasswordDisplayMode, Text};
use skyview_core::{Config, Dashboard, ImageStrategy, LocationQuery};

use crate::render;

const IMAGE_KEY_PROMPT: &str = "Unsplash access key (leave empty to use the placeholder image):";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather API key and (optionally) the image access key.
    Configure,

    /// Show the dashboard for a place or a coordinate pair.
    Show(ShowArgs),

    /// Print where the configuration file lives.
    ConfigPath,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Place name, e.g. "London".
    #[arg(conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Background image strategy.
    #[arg(long, value_parser = strategy_values(), ignore_case = true)]
    pub strategy: Option<String>,

    /// Print the view-model as JSON instead of the text dashboard.
    #[arg(long)]
    pub json: bool,
}

fn strategy_values() -> PossibleValuesParser {
    PossibleValuesParser::new(ImageStrategy::all().iter().map(ImageStrategy::as_str))
}

impl ShowArgs {
    fn location(&self) -> anyhow::Result<LocationQuery> {
        match (&self.city, self.lat, self.lon) {
            (Some(city), _, _) if !city.trim().is_empty() => Ok(LocationQuery::name(city.trim())),
            (_, Some(lat), Some(lon)) => Ok(LocationQuery::coordinates(lat, lon)),
            _ => bail!("Provide a place name or both --lat and --lon."),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show(args) => show(args).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let weather_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read weather API key")?;
    cfg.set_weather_api_key(weather_key.trim().to_string());

    let image_key = Text::new(IMAGE_KEY_PROMPT)
        .prompt()
        .context("Failed to read image access key")?;
    if image_key.trim().is_empty() {
        cfg.images = None;
    } else {
        cfg.set_image_access_key(image_key.trim().to_string());
    }

    cfg.save()?;
    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let query = args.location()?;

    let mut cfg = Config::load_with_env()?;
    if let Some(strategy) = &args.strategy {
        cfg.image_strategy = Some(ImageStrategy::try_from(strategy.as_str())?.to_string());
    }

    let dashboard = Dashboard::from_config(&cfg)?;

    tracing::debug!(%query, "loading dashboard");
    let view = dashboard
        .load(&query)
        .await
        .with_context(|| format!("Could not load weather for {query}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::dashboard(&view));
    }

    Ok(())
}
