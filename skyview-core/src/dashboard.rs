use anyhow::{Context, Result};

use crate::{
    Config,
    error::UpstreamError,
    http::HttpFetcher,
    model::{DashboardView, LocationQuery},
    source::{BackgroundSource, ImageResolver, WeatherAggregator, WeatherSource},
};

/// Weather first, then the background photo keyed on the resolved place
/// name and condition. Calls are strictly sequential.
#[derive(Debug)]
pub struct Dashboard {
    weather: Box<dyn WeatherSource>,
    images: Box<dyn BackgroundSource>,
}

impl Dashboard {
    pub fn new(weather: Box<dyn WeatherSource>, images: Box<dyn BackgroundSource>) -> Self {
        Self { weather, images }
    }

    /// Wire the real providers from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpFetcher::new().context("Failed to build HTTP client")?;

        let weather = WeatherAggregator::new(config.weather_settings()?, http.clone());
        let images = ImageResolver::new(config.image_settings()?, http);

        Ok(Self::new(Box::new(weather), Box::new(images)))
    }

    pub async fn load(&self, query: &LocationQuery) -> Result<DashboardView, UpstreamError> {
        let weather = self.weather.fetch_weather(query).await?;
        let background = self
            .images
            .resolve_image(&weather.name, &weather.condition)
            .await;

        Ok(DashboardView {
            weather,
            background,
        })
    }
}
