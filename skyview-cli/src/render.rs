//! Text rendering of the dashboard. Temperatures are rounded here and
//! nowhere else.

use std::fmt::Write;

use skyview_core::{DashboardView, NormalizedWeather};

/// Offsets of the morning / afternoon / evening estimates from the current reading.
const TODAY_PERIODS: [(&str, f64); 3] = [("Morning", -2.0), ("Afternoon", 2.0), ("Evening", -4.0)];

fn degrees(celsius: f64) -> String {
    format!("{}°", celsius.round() as i64)
}

pub fn dashboard(view: &DashboardView) -> String {
    let w = &view.weather;
    let mut out = String::new();

    let _ = writeln!(out, "{}", w.formatted_local_time);
    let _ = writeln!(out, "{}", place_line(w));
    let _ = writeln!(out, "{} ({})", w.condition, w.description);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {}   Real feel {}   Humidity {}%   Wind {} m/s",
        degrees(w.temp),
        degrees(w.feels_like),
        w.humidity,
        w.wind_speed
    );
    let _ = writeln!(
        out,
        "  Sunrise {}   Sunset {}   High {}   Low {}",
        w.sunrise,
        w.sunset,
        degrees(w.temp_max),
        degrees(w.temp_min)
    );

    let today: Vec<String> = TODAY_PERIODS
        .iter()
        .map(|(name, delta)| format!("{name} {}C", degrees(w.temp + delta)))
        .collect();
    let _ = writeln!(out, "  {}", today.join("   "));

    if !w.hourly.is_empty() {
        let _ = writeln!(out, "\nHourly");
        for h in &w.hourly {
            let temp = degrees(h.temp);
            let _ = writeln!(out, "  {:>8}  {:>5}  {}", h.time, temp, h.icon);
        }
    }

    if !w.daily.is_empty() {
        let _ = writeln!(out, "\nDaily");
        for d in &w.daily {
            let _ = writeln!(out, "  {:<10} {:>5}", d.day, degrees(d.temp));
        }
    }

    let _ = writeln!(out, "\nBackground: {}", view.background.url);
    out
}

fn place_line(w: &NormalizedWeather) -> String {
    if w.country.is_empty() {
        w.name.clone()
    } else {
        format!("{}, {}", w.name, w.country)
    }
}
