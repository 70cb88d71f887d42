use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::{FetchError, Result},
    model::{ForecastPayload, Location},
};

use super::ForecastSource;

pub const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// 7 days of 3-hour samples.
pub const DEFAULT_SAMPLE_COUNT: u32 = 56;

/// OpenWeather 5-day / 3-hour forecast endpoint. Temperatures stay in Kelvin.
#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    sample_count: u32,
    base_url: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String, sample_count: u32) -> Self {
        Self::with_base_url(api_key, sample_count, FORECAST_URL)
    }

    pub fn with_base_url(api_key: String, sample_count: u32, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            sample_count,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherSource {
    async fn fetch(&self, location: &Location) -> Result<ForecastPayload> {
        if self.api_key.is_empty() {
            return Err(FetchError::MissingApiKey);
        }

        info!(location = %location, cnt = self.sample_count, "fetching forecast");

        let cnt = self.sample_count.to_string();
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", location.query()),
                ("appid", self.api_key.as_str()),
                ("cnt", cnt.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        let payload = payload_from_response(status.as_u16(), &body)?;
        debug!(
            location = %location,
            samples = payload.series.len(),
            city = payload.city.name(),
            "forecast received"
        );

        Ok(payload)
    }
}

fn payload_from_response(status: u16, body: &str) -> Result<ForecastPayload> {
    if !(200..300).contains(&status) {
        return Err(FetchError::status(status, body));
    }

    let parsed: Value = serde_json::from_str(body)?;
    Ok(ForecastPayload::from_value(parsed))
}
