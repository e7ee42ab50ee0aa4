use serde::{Deserialize, Serialize};

/// Where to look up weather: a free-text place or a coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationQuery {
    Name { name: String },
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name { name: name.into() }
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self::Coordinates { lat, lon }
    }

    /// Query parameters selecting the location on the current-conditions call.
    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Name { name } => vec![("q", name.clone())],
            Self::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name { name } => f.write_str(name),
            Self::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
        }
    }
}

/// One 3-hour forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub time: String,
    pub temp: f64,
    /// Bare provider icon code, e.g. `10d`.
    pub icon: String,
}

/// One day of the daily aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub day: String,
    pub temp: f64,
    /// Full icon URL.
    pub icon: String,
}

/// Display-ready weather for one query. Temperatures are Celsius and
/// unrounded; times are already shifted to the location's wall clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeather {
    pub lat: f64,
    pub lon: f64,
    /// UTC offset in seconds.
    pub timezone: i32,

    pub name: String,
    pub country: String,

    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub visibility: Option<u32>,
    pub wind_speed: f64,

    pub condition: String,
    pub description: String,
    pub icon: String,

    pub sunrise: String,
    pub sunset: String,
    pub formatted_local_time: String,

    pub hourly: Vec<HourlySample>,
    pub daily: Vec<DailySample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,
}

/// Everything the presentation layer needs for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub weather: NormalizedWeather,
    pub background: ImageResult,
}
