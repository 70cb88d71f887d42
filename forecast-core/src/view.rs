use crate::bucket::DayBucketer;
use crate::daily::{DailyEntry, select_daily};
use crate::model::{City, ForecastPayload, Observation};

/// Everything the renderer needs for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub city: City,
    /// First sample of the series, if any.
    pub current: Option<Observation>,
    /// The full 3-hour strip.
    pub hourly: Vec<Observation>,
    pub daily: Vec<DailyEntry>,
    pub sunrise: i64,
    pub sunset: i64,
    pub bucketer: DayBucketer,
}

impl ForecastView {
    /// Pure transform; an empty series gives no current sample and no days.
    pub fn build(series: &[Observation], city: &City, bucketer: DayBucketer) -> Self {
        Self {
            city: city.clone(),
            current: series.first().cloned(),
            hourly: series.to_vec(),
            daily: select_daily(series, &bucketer),
            sunrise: city.sunrise(),
            sunset: city.sunset(),
            bucketer,
        }
    }

    pub fn from_payload(payload: &ForecastPayload, bucketer: DayBucketer) -> Self {
        Self::build(&payload.series, &payload.city, bucketer)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DAY1: i64 = 1_702_944_000;

    fn payload() -> ForecastPayload {
        ForecastPayload::from_value(json!({
            "city": { "name": "Paris", "country": "FR", "sunrise": 1_702_971_000, "sunset": 1_703_001_000 },
            "list": [
                { "dt": DAY1 + 3 * 3600, "main": { "temp": 276.0 } },
                { "dt": DAY1 + 9 * 3600, "main": { "temp": 279.0 } },
                { "dt": DAY1 + 15 * 3600, "main": { "temp": 281.0 } },
                { "dt": DAY1 + 45 * 3600, "main": { "temp": 278.0 } },
            ]
        }))
    }

    #[test]
    fn empty_series_builds_empty_view() {
        let view = ForecastView::build(&[], &City::default(), DayBucketer::utc());

        assert!(view.current.is_none());
        assert!(view.daily.is_empty());
        assert!(view.hourly.is_empty());
        assert!(view.is_empty());
        assert_eq!(view.sunrise, City::DEFAULT_SUN_EPOCH);
    }

    #[test]
    fn current_is_first_sample_and_daily_is_selected() {
        let p = payload();
        let view = ForecastView::from_payload(&p, DayBucketer::utc());

        assert_eq!(view.current.as_ref(), p.series.first());
        assert_eq!(view.hourly.len(), 4);
        assert_eq!(view.daily.len(), 2);
        assert_eq!(view.daily[0].observation.temperature(), 279.0);
        assert_eq!(view.daily[1].observation.temperature(), 278.0);
        assert_eq!(view.sunrise, 1_702_971_000);
        assert_eq!(view.sunset, 1_703_001_000);
    }

    #[test]
    fn incomplete_current_sample_renders_with_defaults() {
        let p = ForecastPayload::from_value(json!({
            "list": [{ "dt": DAY1, "main": { "temp": 280.0 } }]
        }));

        let view = ForecastView::from_payload(&p, DayBucketer::utc());
        let current = view.current.expect("current sample");

        assert_eq!(current.visibility(), Observation::DEFAULT_VISIBILITY_M);
        assert_eq!(current.wind_speed(), Observation::DEFAULT_WIND_SPEED_MPS);
    }

    #[test]
    fn build_is_idempotent() {
        let p = payload();

        assert_eq!(
            ForecastView::from_payload(&p, DayBucketer::utc()),
            ForecastView::from_payload(&p, DayBucketer::utc())
        );
    }
}
