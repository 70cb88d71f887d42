use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, DayZone, ForecastSource, QueryCoordinator, Resolution, fetch_ticket,
    source_from_config,
};
use inquire::{InquireError, Password, Text};
use tracing::debug;

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "7-day weather forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key (and optionally a default location).
    Configure,

    /// Show the forecast for a location.
    Show {
        /// Location name; falls back to the configured default.
        location: Option<String>,

        /// Zone for day boundaries: "utc" or "city".
        #[arg(long)]
        zone: Option<String>,
    },

    /// Prompt for locations repeatedly; an empty entry exits.
    Interactive {
        /// Zone for day boundaries: "utc" or "city".
        #[arg(long)]
        zone: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, zone } => {
                let cfg = Config::load()?;
                let location = location
                    .or_else(|| cfg.default_location.clone())
                    .ok_or_else(|| {
                        anyhow!(
                            "No location given and no default configured.\n\
                             Hint: run `forecast show <LOCATION>` or `forecast configure`."
                        )
                    })?;

                let source = source_from_config(&cfg)?;
                let mut coordinator = QueryCoordinator::new(resolve_zone(&cfg, zone)?);

                run_cycle(&mut coordinator, source.as_ref(), &location).await;
                println!("{}", render(coordinator.rendered()));
                Ok(())
            }
            Command::Interactive { zone } => {
                let cfg = Config::load()?;
                let source = source_from_config(&cfg)?;
                let mut coordinator = QueryCoordinator::new(resolve_zone(&cfg, zone)?);
                interactive(&mut coordinator, source.as_ref()).await
            }
        }
    }
}

fn resolve_zone(cfg: &Config, flag: Option<String>) -> anyhow::Result<DayZone> {
    Ok(flag
        .map(|z| DayZone::try_from(z.as_str()))
        .transpose()?
        .unwrap_or(cfg.day_zone))
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    cfg.set_api_key(api_key.trim().to_string());

    let default_location = Text::new("Default location (optional):")
        .prompt()
        .context("Failed to read default location")?;
    let default_location = default_location.trim();
    if !default_location.is_empty() {
        cfg.default_location = Some(default_location.to_string());
    }

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// One submit → fetch → resolve pass.
async fn run_cycle(coordinator: &mut QueryCoordinator, source: &dyn ForecastSource, input: &str) {
    let Some(ticket) = coordinator.submit(input) else {
        return;
    };

    let (ticket, outcome) = fetch_ticket(source, ticket).await;
    if coordinator.resolve(&ticket, outcome) == Resolution::Stale {
        debug!(location = %ticket.location(), "response arrived after a newer submit");
    }
}

async fn interactive(
    coordinator: &mut QueryCoordinator,
    source: &dyn ForecastSource,
) -> anyhow::Result<()> {
    loop {
        let input = match Text::new("Location:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read location"),
        };
        if input.trim().is_empty() {
            break;
        }

        // Hide the previous location's forecast while the new one resolves.
        coordinator.set_location_changing(true);
        println!("{}", render(coordinator.rendered()));
        coordinator.set_location_changing(false);

        run_cycle(coordinator, source, &input).await;
        println!("{}\n", render(coordinator.rendered()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use forecast_core::{FetchError, ForecastPayload, Location, Rendered};

    #[derive(Debug)]
    struct Stub;

    #[async_trait]
    impl ForecastSource for Stub {
        async fn fetch(&self, location: &Location) -> Result<ForecastPayload, FetchError> {
            if location.query() == "Atlantis" {
                return Err(FetchError::MissingApiKey);
            }

            Ok(ForecastPayload::from_value(serde_json::json!({
                "city": { "name": location.query() },
                "list": [{ "dt": 1_702_976_400 }]
            })))
        }
    }

    #[test]
    fn zone_flag_overrides_config() {
        let cfg = Config::default();

        assert_eq!(resolve_zone(&cfg, None).unwrap(), DayZone::Utc);
        assert_eq!(resolve_zone(&cfg, Some("city".into())).unwrap(), DayZone::City);
        assert!(resolve_zone(&cfg, Some("mars".into())).is_err());
    }

    #[tokio::test]
    async fn cycle_renders_resolved_location() {
        let mut coordinator = QueryCoordinator::default();

        run_cycle(&mut coordinator, &Stub, "Paris").await;

        match coordinator.rendered() {
            Rendered::Ready(view) => assert_eq!(view.city.name(), "Paris"),
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failing_cycle_renders_generic_error() {
        let mut coordinator = QueryCoordinator::default();

        run_cycle(&mut coordinator, &Stub, "Atlantis").await;

        assert_eq!(render(coordinator.rendered()), "Error fetching data");
    }

    #[tokio::test]
    async fn blank_input_leaves_state_untouched() {
        let mut coordinator = QueryCoordinator::default();

        run_cycle(&mut coordinator, &Stub, "  ").await;

        assert_eq!(coordinator.rendered(), Rendered::Idle);
    }

    #[test]
    fn parses_show_with_zone() {
        let cli = Cli::try_parse_from(["forecast", "show", "Tokyo", "--zone", "city"]).unwrap();

        match cli.command {
            Command::Show { location, zone } => {
                assert_eq!(location.as_deref(), Some("Tokyo"));
                assert_eq!(zone.as_deref(), Some("city"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
