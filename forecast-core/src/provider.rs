use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::Result,
    model::{ForecastPayload, Location},
    provider::openweather::OpenWeatherSource,
};

pub mod openweather;

/// The fetch collaborator: turns a location query into a forecast payload.
///
/// Implementations own transport, timeouts and status handling. They do no
/// retries; a retry is a fresh submit from the user.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> Result<ForecastPayload>;
}

/// Construct the OpenWeather source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastSource>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `forecast configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    Ok(Box::new(OpenWeatherSource::new(
        api_key.to_owned(),
        config.sample_count,
    )))
}
