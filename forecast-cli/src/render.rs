//! Terminal rendering of the forecast view: unit conversion and formatting.

use chrono::{DateTime, FixedOffset, Timelike};
use forecast_core::{DayBucketer, ForecastView, Observation, Rendered};
use std::fmt::Write;

const MISSING: &str = "--";

pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - 273.15).floor() as i64
}

pub fn wind_speed_kmh(mps: f64) -> String {
    format!("{:.0}km/h", mps * 3.6)
}

pub fn meters_to_km(meters: f64) -> String {
    format!("{:.0}km", meters / 1000.0)
}

/// Swap the icon's `d`/`n` suffix to match the sample's local hour.
pub fn day_or_night_icon(icon: &str, hour: Option<u32>) -> String {
    let base = icon.strip_suffix(['d', 'n']).unwrap_or(icon);
    let is_day = hour.is_some_and(|h| (6..18).contains(&h));
    format!("{base}{}", if is_day { 'd' } else { 'n' })
}

fn fmt_time(time: Option<DateTime<FixedOffset>>, pattern: &str) -> String {
    time.map(|t| t.format(pattern).to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn icon_for(obs: &Observation, bucketer: &DayBucketer) -> String {
    let hour = bucketer.local_time(obs).map(|t| t.hour());
    day_or_night_icon(obs.condition_icon(), hour)
}

fn details(out: &mut String, obs: &Observation, view: &ForecastView) -> std::fmt::Result {
    let b = &view.bucketer;
    writeln!(
        out,
        "    Visibility {}  Humidity {:.0}%  Wind {}  Pressure {:.0} hPa  Sunrise {}  Sunset {}",
        meters_to_km(obs.visibility()),
        obs.humidity(),
        wind_speed_kmh(obs.wind_speed()),
        obs.pressure(),
        fmt_time(b.local_epoch(view.sunrise), "%-H:%M"),
        fmt_time(b.local_epoch(view.sunset), "%-H:%M"),
    )
}

fn write_view(out: &mut String, view: &ForecastView) -> std::fmt::Result {
    let b = &view.bucketer;
    let place = match (view.city.name(), view.city.country()) {
        ("", _) => "Unknown location".to_string(),
        (name, "") => name.to_string(),
        (name, country) => format!("{name}, {country}"),
    };
    writeln!(out, "{place}")?;

    let Some(current) = &view.current else {
        writeln!(out, "No forecast data for this location.")?;
        return Ok(());
    };

    let now = b.local_time(current);
    writeln!(
        out,
        "\n{} ({})",
        fmt_time(now, "%A"),
        fmt_time(now, "%d.%m.%Y")
    )?;
    writeln!(
        out,
        "  {}°  feels like {}°  {}°↓ {}°↑  {} [{}]",
        kelvin_to_celsius(current.temperature()),
        kelvin_to_celsius(current.feels_like()),
        kelvin_to_celsius(current.temp_min()),
        kelvin_to_celsius(current.temp_max()),
        current.condition_description(),
        icon_for(current, b),
    )?;
    details(out, current, view)?;

    writeln!(out)?;
    for obs in &view.hourly {
        writeln!(
            out,
            "  {:>9}  {:<3}  {:>4}°",
            fmt_time(b.local_time(obs), "%-I.%M %p"),
            icon_for(obs, b),
            kelvin_to_celsius(obs.temperature()),
        )?;
    }

    writeln!(out, "\nForecast ({} Day)", view.daily.len())?;
    for entry in &view.daily {
        let obs = &entry.observation;
        let t = b.local_time(obs);
        writeln!(
            out,
            "  {} {:<9} [{}]  {}°  feels like {}°  {}°↓ {}°↑  {}",
            fmt_time(t, "%d,%m"),
            fmt_time(t, "%A"),
            icon_for(obs, b),
            kelvin_to_celsius(obs.temperature()),
            kelvin_to_celsius(obs.feels_like()),
            kelvin_to_celsius(obs.temp_min()),
            kelvin_to_celsius(obs.temp_max()),
            obs.condition_description(),
        )?;
        details(out, obs, view)?;
    }

    Ok(())
}

pub fn render(rendered: Rendered<'_>) -> String {
    match rendered {
        Rendered::Idle => "Enter a location to see its forecast.".to_string(),
        Rendered::Loading => "Loading...".to_string(),
        Rendered::Failed(reason) => reason.to_string(),
        Rendered::Ready(view) => {
            let mut out = String::new();
            // Writing into a String cannot fail.
            let _ = write_view(&mut out, view);
            out
        }
    }
}
