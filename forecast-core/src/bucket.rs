//! Calendar-day bucketing of forecast samples.
//!
//! Day keys and hours are always derived from the numeric epoch (`dt`), never
//! from the textual timestamp, and always in one zone per [`DayBucketer`].

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{City, Observation};

/// Day key used for samples whose timestamp is missing or unrepresentable.
pub const UNKNOWN_DAY: &str = "unknown";

/// Which zone day boundaries are computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayZone {
    #[default]
    Utc,
    /// The fixed offset upstream reports for the city (`city.timezone`).
    City,
}

impl DayZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayZone::Utc => "utc",
            DayZone::City => "city",
        }
    }
}

impl std::fmt::Display for DayZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DayZone {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "utc" => Ok(DayZone::Utc),
            "city" => Ok(DayZone::City),
            _ => Err(anyhow::anyhow!(
                "Unknown day zone '{value}'. Supported zones: utc, city."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucketer {
    offset: FixedOffset,
}

impl Default for DayBucketer {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayBucketer {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Offsets outside +/-24h are rejected by chrono; those fall back to UTC.
    pub fn with_offset_secs(secs: i64) -> Self {
        i32::try_from(secs)
            .ok()
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
            .unwrap_or_else(Self::utc)
    }

    pub fn for_city(zone: DayZone, city: &City) -> Self {
        match zone {
            DayZone::Utc => Self::utc(),
            DayZone::City => Self::with_offset_secs(city.timezone_offset()),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Zoned wall-clock time for an arbitrary epoch.
    pub fn local_epoch(&self, secs: i64) -> Option<DateTime<FixedOffset>> {
        DateTime::from_timestamp(secs, 0).map(|utc| utc.with_timezone(&self.offset))
    }

    pub fn local_time(&self, obs: &Observation) -> Option<DateTime<FixedOffset>> {
        obs.timestamp().and_then(|secs| self.local_epoch(secs))
    }

    /// `YYYY-MM-DD`, or [`UNKNOWN_DAY`] when the sample has no usable time.
    pub fn day_key(&self, obs: &Observation) -> String {
        self.local_time(obs)
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| UNKNOWN_DAY.to_string())
    }

    /// Hour in `0..=23`; undated samples count as hour 0.
    pub fn hour_of_day(&self, obs: &Observation) -> u32 {
        self.local_time(obs).map(|t| t.hour()).unwrap_or(0)
    }
}
