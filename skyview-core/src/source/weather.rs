use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    clock,
    error::{DegradedForecast, UpstreamError},
    http::HttpFetcher,
    model::{DailySample, HourlySample, LocationQuery, NormalizedWeather},
    units::{icon_url, kelvin_to_celsius},
};

use super::WeatherSource;

/// 24 hours at 3-hour resolution.
pub const HOURLY_SAMPLES: usize = 8;
pub const DAILY_SAMPLES: usize = 5;

const CURRENT: &str = "current";
const FORECAST: &str = "forecast";
const ONECALL: &str = "onecall";

#[derive(Debug, Clone)]
pub struct WeatherSettings {
    /// e.g. `https://api.openweathermap.org/data/2.5`
    pub base_url: String,
    /// e.g. `https://openweathermap.org`
    pub icon_base_url: String,
    pub api_key: String,
    /// Query the onecall endpoint for the daily aggregate.
    pub daily_forecast: bool,
}

/// Sequential current -> forecast -> daily pipeline against the weather
/// provider. Only the current-conditions call can fail the whole query.
#[derive(Debug, Clone)]
pub struct WeatherAggregator {
    settings: WeatherSettings,
    http: HttpFetcher,
}

impl WeatherAggregator {
    pub fn new(settings: WeatherSettings, http: HttpFetcher) -> Self {
        Self { settings, http }
    }

    pub async fn fetch_weather(
        &self,
        query: &LocationQuery,
    ) -> Result<NormalizedWeather, UpstreamError> {
        tracing::debug!(%query, "fetching current conditions");

        let raw = self.fetch_current(query).await?;
        let current = CurrentReading::from_raw(raw, &self.settings.icon_base_url)?;

        // Coordinates, not the name: they are unambiguous.
        let (lat, lon, offset) = (current.lat, current.lon, current.timezone);

        let hourly = match self.fetch_hourly(lat, lon, offset).await {
            Ok(samples) => samples,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    place = %current.name,
                    "hourly forecast unavailable, continuing without it"
                );
                Vec::new()
            }
        };

        let daily = if self.settings.daily_forecast {
            match self.fetch_daily(lat, lon, offset).await {
                Ok(samples) => samples,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        place = %current.name,
                        "daily forecast unavailable, continuing without it"
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        tracing::info!(
            place = %current.name,
            hourly = hourly.len(),
            daily = daily.len(),
            "weather normalized"
        );

        Ok(current.into_weather(hourly, daily))
    }

    async fn fetch_current(
        &self,
        query: &LocationQuery,
    ) -> Result<OwCurrentResponse, UpstreamError> {
        let url = self.endpoint_url("weather");
        let mut params = query.query_params();
        params.push(("appid", self.settings.api_key.clone()));

        let request = self.http.get(&url).query(&params);
        self.http.send_json(CURRENT, request).await
    }

    async fn fetch_hourly(
        &self,
        lat: f64,
        lon: f64,
        offset: i32,
    ) -> Result<Vec<HourlySample>, DegradedForecast> {
        let url = self.endpoint_url("forecast");
        let request = self.http.get(&url).query(&[
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", self.settings.api_key.clone()),
        ]);

        let payload: Value = self.http.send_json(FORECAST, request).await?;
        hourly_from_payload(&payload, offset)
    }

    async fn fetch_daily(
        &self,
        lat: f64,
        lon: f64,
        offset: i32,
    ) -> Result<Vec<DailySample>, DegradedForecast> {
        let url = self.endpoint_url("onecall");
        let request = self.http.get(&url).query(&[
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("exclude", "current,minutely,hourly,alerts".to_string()),
            ("appid", self.settings.api_key.clone()),
        ]);

        let payload: Value = self.http.send_json(ONECALL, request).await?;
        daily_from_payload(&payload, offset, &self.settings.icon_base_url)
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{path}", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WeatherSource for WeatherAggregator {
    async fn fetch_weather(
        &self,
        query: &LocationQuery,
    ) -> Result<NormalizedWeather, UpstreamError> {
        WeatherAggregator::fetch_weather(self, query).await
    }
}

type ClockFormat = fn(i64, i32) -> Option<String>;

/// Current conditions after unit conversion and time formatting, waiting
/// for the forecast samples.
#[derive(Debug)]
struct CurrentReading {
    lat: f64,
    lon: f64,
    timezone: i32,
    name: String,
    country: String,
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
    visibility: Option<u32>,
    wind_speed: f64,
    condition: String,
    description: String,
    icon: String,
    sunrise: String,
    sunset: String,
    formatted_local_time: String,
}

impl CurrentReading {
    fn from_raw(raw: OwCurrentResponse, icon_host: &str) -> Result<Self, UpstreamError> {
        let condition = raw
            .weather
            .into_iter()
            .next()
            .ok_or(UpstreamError::MissingField {
                endpoint: CURRENT,
                field: "weather[0]",
            })?;

        let offset = raw.timezone;
        let timestamp = |epoch: i64, field: &'static str, format: ClockFormat| {
            format(epoch, offset).ok_or(UpstreamError::InvalidTimestamp {
                endpoint: CURRENT,
                field,
            })
        };

        Ok(Self {
            lat: raw.coord.lat,
            lon: raw.coord.lon,
            timezone: offset,
            name: raw.name,
            country: raw.sys.country.unwrap_or_default(),
            temp: kelvin_to_celsius(raw.main.temp),
            feels_like: kelvin_to_celsius(raw.main.feels_like),
            temp_min: kelvin_to_celsius(raw.main.temp_min),
            temp_max: kelvin_to_celsius(raw.main.temp_max),
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            visibility: raw.visibility,
            wind_speed: raw.wind.speed,
            icon: icon_url(icon_host, &condition.icon),
            condition: condition.main,
            description: condition.description,
            sunrise: timestamp(raw.sys.sunrise, "sys.sunrise", clock::format_clock)?,
            sunset: timestamp(raw.sys.sunset, "sys.sunset", clock::format_clock)?,
            formatted_local_time: timestamp(raw.dt, "dt", clock::format_local_date_time)?,
        })
    }

    fn into_weather(self, hourly: Vec<HourlySample>, daily: Vec<DailySample>) -> NormalizedWeather {
        NormalizedWeather {
            lat: self.lat,
            lon: self.lon,
            timezone: self.timezone,
            name: self.name,
            country: self.country,
            temp: self.temp,
            feels_like: self.feels_like,
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            humidity: self.humidity,
            pressure: self.pressure,
            visibility: self.visibility,
            wind_speed: self.wind_speed,
            condition: self.condition,
            description: self.description,
            icon: self.icon,
            sunrise: self.sunrise,
            sunset: self.sunset,
            formatted_local_time: self.formatted_local_time,
            hourly,
            daily,
        }
    }
}

fn sequence<'a>(
    payload: &'a Value,
    endpoint: &'static str,
    field: &'static str,
) -> Result<&'a [Value], DegradedForecast> {
    payload
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(DegradedForecast::MissingSequence { endpoint, field })
}

/// First [`HOURLY_SAMPLES`] slots; malformed slots are dropped, never padded.
fn hourly_from_payload(
    payload: &Value,
    offset: i32,
) -> Result<Vec<HourlySample>, DegradedForecast> {
    let list = sequence(payload, FORECAST, "list")?;

    Ok(list
        .iter()
        .take(HOURLY_SAMPLES)
        .filter_map(|entry| {
            let entry = match OwForecastEntry::deserialize(entry) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping malformed forecast slot");
                    return None;
                }
            };
            let icon = entry.weather.into_iter().next()?.icon;

            Some(HourlySample {
                time: clock::format_clock(entry.dt, offset)?,
                temp: kelvin_to_celsius(entry.main.temp),
                icon,
            })
        })
        .collect())
}

fn daily_from_payload(
    payload: &Value,
    offset: i32,
    icon_host: &str,
) -> Result<Vec<DailySample>, DegradedForecast> {
    let list = sequence(payload, ONECALL, "daily")?;

    Ok(list
        .iter()
        .take(DAILY_SAMPLES)
        .filter_map(|entry| {
            let entry = match OwDailyEntry::deserialize(entry) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping malformed daily entry");
                    return None;
                }
            };
            let icon = entry.weather.into_iter().next()?.icon;

            Some(DailySample {
                day: clock::format_weekday(entry.dt, offset)?,
                temp: kelvin_to_celsius(entry.temp.day),
                icon: icon_url(icon_host, &icon),
            })
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    main: OwMain,
    name: String,
    dt: i64,
    sys: OwSys,
    #[serde(default)]
    weather: Vec<OwCondition>,
    wind: OwWind,
    visibility: Option<u32>,
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwSlotMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwIcon {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwSlotMain,
    #[serde(default)]
    weather: Vec<OwIcon>,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    day: f64,
}

#[derive(Debug, Deserialize)]
struct OwDailyEntry {
    dt: i64,
    temp: OwDailyTemp,
    #[serde(default)]
    weather: Vec<OwIcon>,
}
