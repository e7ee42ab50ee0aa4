//! Canned provider payloads shared by the integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};

pub const SUNRISE: i64 = 1_700_000_000;

pub fn current_json(name: &str, kelvin: f64, timezone: i32) -> Value {
    json!({
        "coord": { "lat": 51.51, "lon": -0.13 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "base": "stations",
        "main": {
            "temp": kelvin, "feels_like": kelvin - 1.0, "temp_min": kelvin - 2.0,
            "temp_max": kelvin + 2.0, "pressure": 1009, "humidity": 81
        },
        "visibility": 10000,
        "wind": { "speed": 5.66, "deg": 240 },
        "dt": SUNRISE,
        "sys": { "country": "GB", "sunrise": SUNRISE, "sunset": SUNRISE + 30_000 },
        "timezone": timezone,
        "id": 2643743,
        "name": name,
        "cod": 200
    })
}

pub fn forecast_json(slots: usize) -> Value {
    let list: Vec<Value> = (0..slots as i64)
        .map(|i| {
            json!({
                "dt": SUNRISE + i * 10_800,
                "main": { "temp": 280.15 + i as f64 },
                "weather": [{ "main": "Clouds", "icon": "04n" }]
            })
        })
        .collect();

    json!({ "cod": "200", "cnt": slots, "list": list })
}

pub fn onecall_json(days: usize) -> Value {
    let daily: Vec<Value> = (0..days as i64)
        .map(|i| {
            json!({
                "dt": SUNRISE + i * 86_400,
                "temp": { "day": 285.15, "min": 280.0, "max": 288.0 },
                "weather": [{ "main": "Clear", "icon": "01d" }]
            })
        })
        .collect();

    json!({ "lat": 51.51, "lon": -0.13, "timezone_offset": 0, "daily": daily })
}

pub fn photo_json(url: &str, description: Option<&str>, alt: Option<&str>) -> Value {
    json!({
        "id": "abc",
        "urls": { "raw": url, "regular": url },
        "description": description,
        "alt_description": alt,
        "tags": []
    })
}

pub fn search_json(results: Vec<Value>) -> Value {
    json!({ "total": results.len(), "total_pages": 1, "results": results })
}
