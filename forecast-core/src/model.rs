use serde_json::Value;
use std::fmt;

use crate::access::{get_f64, get_i64, get_str, lookup, opt_i64};

/// Ordered forecast samples, ascending by timestamp.
pub type ForecastSeries = Vec<Observation>;

/// A location query as typed by the user; also the identity of a fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    query: String,
}

impl Location {
    /// Returns `None` for blank input, which never starts a fetch.
    pub fn parse(input: &str) -> Option<Self> {
        let query = input.trim();
        (!query.is_empty()).then(|| Self {
            query: query.to_string(),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

/// One 3-hour forecast sample.
///
/// The upstream record is kept as-is; accessors resolve missing or malformed
/// fields to the defaults below so nothing downstream ever sees a hole.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    record: Value,
}

impl Observation {
    pub const DEFAULT_KELVIN: f64 = 0.0;
    pub const DEFAULT_VISIBILITY_M: f64 = 10_000.0;
    pub const DEFAULT_WIND_SPEED_MPS: f64 = 1.64;
    pub const DEFAULT_ICON: &'static str = "01d";

    pub fn from_value(record: Value) -> Self {
        Self { record }
    }

    pub fn raw(&self) -> &Value {
        &self.record
    }

    /// Epoch seconds. This is the authoritative time of the sample.
    pub fn timestamp(&self) -> Option<i64> {
        opt_i64(&self.record, "dt")
    }

    /// Upstream's textual timestamp; display-only and may disagree with `dt`.
    pub fn timestamp_text(&self) -> &str {
        get_str(&self.record, "dt_txt", "")
    }

    pub fn temperature(&self) -> f64 {
        get_f64(&self.record, "main.temp", Self::DEFAULT_KELVIN)
    }

    pub fn feels_like(&self) -> f64 {
        get_f64(&self.record, "main.feels_like", Self::DEFAULT_KELVIN)
    }

    pub fn temp_min(&self) -> f64 {
        get_f64(&self.record, "main.temp_min", Self::DEFAULT_KELVIN)
    }

    pub fn temp_max(&self) -> f64 {
        get_f64(&self.record, "main.temp_max", Self::DEFAULT_KELVIN)
    }

    /// Relative humidity, percent.
    pub fn humidity(&self) -> f64 {
        get_f64(&self.record, "main.humidity", 0.0)
    }

    /// Sea-level pressure, hPa.
    pub fn pressure(&self) -> f64 {
        get_f64(&self.record, "main.pressure", 0.0)
    }

    pub fn visibility(&self) -> f64 {
        get_f64(&self.record, "visibility", Self::DEFAULT_VISIBILITY_M)
    }

    pub fn wind_speed(&self) -> f64 {
        get_f64(&self.record, "wind.speed", Self::DEFAULT_WIND_SPEED_MPS)
    }

    pub fn condition_icon(&self) -> &str {
        get_str(&self.record, "weather.0.icon", Self::DEFAULT_ICON)
    }

    pub fn condition_description(&self) -> &str {
        get_str(&self.record, "weather.0.description", "")
    }

    pub fn cloud_cover(&self) -> f64 {
        get_f64(&self.record, "clouds.all", 0.0)
    }

    /// Probability of precipitation in `[0, 1]`.
    pub fn precipitation_probability(&self) -> f64 {
        get_f64(&self.record, "pop", 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// City summary returned alongside the series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct City {
    record: Value,
}

impl City {
    /// Used for sunrise/sunset when upstream omits them.
    pub const DEFAULT_SUN_EPOCH: i64 = 1_702_989_452;

    pub fn from_value(record: Value) -> Self {
        Self { record }
    }

    pub fn name(&self) -> &str {
        get_str(&self.record, "name", "")
    }

    pub fn country(&self) -> &str {
        get_str(&self.record, "country", "")
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: get_f64(&self.record, "coord.lat", 0.0),
            lon: get_f64(&self.record, "coord.lon", 0.0),
        }
    }

    pub fn population(&self) -> i64 {
        get_i64(&self.record, "population", 0)
    }

    /// Shift from UTC in seconds.
    pub fn timezone_offset(&self) -> i64 {
        get_i64(&self.record, "timezone", 0)
    }

    pub fn sunrise(&self) -> i64 {
        get_i64(&self.record, "sunrise", Self::DEFAULT_SUN_EPOCH)
    }

    pub fn sunset(&self) -> i64 {
        get_i64(&self.record, "sunset", Self::DEFAULT_SUN_EPOCH)
    }
}

/// A successful fetch: the sample series plus its city summary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastPayload {
    pub series: ForecastSeries,
    pub city: City,
}

impl ForecastPayload {
    /// Build from the upstream body. A missing `list` is an empty series, not
    /// an error.
    pub fn from_value(body: Value) -> Self {
        let city = City::from_value(lookup(&body, "city").cloned().unwrap_or_default());

        let mut series: ForecastSeries = lookup(&body, "list")
            .and_then(Value::as_array)
            .map(|items| items.iter().cloned().map(Observation::from_value).collect())
            .unwrap_or_default();

        // Stable: equal timestamps keep upstream order, undated samples go last.
        series.sort_by_key(|obs| obs.timestamp().unwrap_or(i64::MAX));

        Self { series, city }
    }
}
