use crate::{
    error::UpstreamError,
    model::{ImageResult, LocationQuery, NormalizedWeather},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod image;
pub mod weather;

pub use image::{ImageResolver, ImageSettings, LandmarkTable};
pub use weather::{WeatherAggregator, WeatherSettings};

/// Produces the normalized weather record for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_weather(
        &self,
        query: &LocationQuery,
    ) -> Result<NormalizedWeather, UpstreamError>;
}

/// Produces a background photo for a place. Never fails.
#[async_trait]
pub trait BackgroundSource: Send + Sync + Debug {
    async fn resolve_image(&self, place: &str, condition: &str) -> ImageResult;
}

/// Which ordered search plan the image resolver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageStrategy {
    /// Landmark-keyword query, then a generic "city landmark" query.
    #[default]
    Landmark,
    /// Four increasingly generic place queries filtered for relevance,
    /// then a query keyed on the weather condition.
    Tiered,
}

impl ImageStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStrategy::Landmark => "landmark",
            ImageStrategy::Tiered => "tiered",
        }
    }

    pub const fn all() -> &'static [ImageStrategy] {
        &[ImageStrategy::Landmark, ImageStrategy::Tiered]
    }

    /// Comma-separated names, for error messages.
    pub fn names() -> String {
        Self::all()
            .iter()
            .map(ImageStrategy::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ImageStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ImageStrategy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let wanted = value.trim();

        Self::all()
            .iter()
            .copied()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown image strategy '{value}'. Supported strategies: {}.",
                    Self::names()
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_as_str_roundtrip() {
        for strategy in ImageStrategy::all() {
            let parsed =
                ImageStrategy::try_from(strategy.as_str()).expect("roundtrip should succeed");
            assert_eq!(*strategy, parsed);
        }
    }

    #[test]
    fn strategy_parse_is_case_insensitive() {
        let parsed = ImageStrategy::try_from(" Tiered").unwrap();
        assert_eq!(parsed, ImageStrategy::Tiered);
    }

    #[test]
    fn unknown_strategy_error_lists_every_strategy() {
        let err = ImageStrategy::try_from("random").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Unknown image strategy 'random'. Supported strategies: landmark, tiered."
        );
    }

    #[test]
    fn landmark_is_default() {
        assert_eq!(ImageStrategy::default(), ImageStrategy::Landmark);
    }
}
