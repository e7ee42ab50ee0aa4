const KELVIN_OFFSET: f64 = 273.15;

/// Exact conversion; rounding belongs to the presentation layer.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// `{host}/img/wn/{code}@2x.png`
pub fn icon_url(icon_host: &str, code: &str) -> String {
    format!("{}/img/wn/{code}@2x.png", icon_host.trim_end_matches('/'))
}
