use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::source::{
    ImageSettings, ImageStrategy, LandmarkTable, WeatherSettings, image::DEFAULT_PLACEHOLDER_URL,
};

pub const WEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const IMAGE_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";
pub const IMAGE_STRATEGY_ENV: &str = "SKYVIEW_IMAGE_STRATEGY";

const DEFAULT_IMAGES_PER_PAGE: u8 = 5;

/// Weather provider credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherProviderConfig {
    pub api_key: String,
}

/// Image provider credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageProviderConfig {
    pub access_key: String,
}

/// Provider hosts. Overridable so the core can run against mock servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub weather_base_url: String,
    pub icon_base_url: String,
    pub image_base_url: String,
    pub placeholder_image_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            icon_base_url: "https://openweathermap.org".to_string(),
            image_base_url: "https://api.unsplash.com".to_string(),
            placeholder_image_url: DEFAULT_PLACEHOLDER_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// image_strategy = "landmark"
///
/// [weather]
/// api_key = "..."
///
/// [images]
/// access_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub weather: Option<WeatherProviderConfig>,
    pub images: Option<ImageProviderConfig>,

    /// "landmark" or "tiered".
    pub image_strategy: Option<String>,

    /// Whether to query the daily aggregate endpoint. Defaults to true.
    pub daily_forecast: Option<bool>,

    pub endpoints: Endpoints,
}

impl Config {
    /// Load config from disk (or defaults) and apply environment overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyview", "skyview")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override file values with non-empty variables from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(WEATHER_KEY_ENV) {
            self.set_weather_api_key(key);
        }
        if let Some(key) = non_empty(IMAGE_KEY_ENV) {
            self.set_image_access_key(key);
        }
        if let Some(strategy) = non_empty(IMAGE_STRATEGY_ENV) {
            self.image_strategy = Some(strategy);
        }
    }

    pub fn set_weather_api_key(&mut self, api_key: String) {
        self.weather = Some(WeatherProviderConfig { api_key });
    }

    pub fn set_image_access_key(&mut self, access_key: String) {
        self.images = Some(ImageProviderConfig { access_key });
    }

    pub fn weather_api_key(&self) -> Result<&str> {
        self.weather
            .as_ref()
            .map(|w| w.api_key.as_str())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No weather API key configured.\n\
                     Hint: run `skyview configure` or set {WEATHER_KEY_ENV}."
                )
            })
    }

    /// Absent key is fine: the image resolver falls back to the placeholder.
    pub fn image_access_key(&self) -> Option<&str> {
        self.images
            .as_ref()
            .map(|i| i.access_key.as_str())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn image_strategy(&self) -> Result<ImageStrategy> {
        match self.image_strategy.as_deref() {
            Some(s) => ImageStrategy::try_from(s),
            None => Ok(ImageStrategy::default()),
        }
    }

    pub fn daily_forecast_enabled(&self) -> bool {
        self.daily_forecast.unwrap_or(true)
    }

    pub fn weather_settings(&self) -> Result<WeatherSettings> {
        Ok(WeatherSettings {
            base_url: self.endpoints.weather_base_url.clone(),
            icon_base_url: self.endpoints.icon_base_url.clone(),
            api_key: self.weather_api_key()?.to_owned(),
            daily_forecast: self.daily_forecast_enabled(),
        })
    }

    pub fn image_settings(&self) -> Result<ImageSettings> {
        Ok(ImageSettings {
            base_url: self.endpoints.image_base_url.clone(),
            access_key: self.image_access_key().map(str::to_owned),
            placeholder_url: self.endpoints.placeholder_image_url.clone(),
            per_page: DEFAULT_IMAGES_PER_PAGE,
            strategy: self.image_strategy()?,
            landmarks: LandmarkTable::default(),
        })
    }
}
