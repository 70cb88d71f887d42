//! Grouping samples by calendar day and picking one representative per day.

use tracing::debug;

use crate::bucket::DayBucketer;
use crate::model::Observation;

/// First hour that counts as daytime when choosing a day's representative.
pub const DAYTIME_START_HOUR: u32 = 6;

/// All samples sharing a day key, in series order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub key: String,
    pub observations: Vec<&'a Observation>,
}

/// The sample chosen to summarize one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntry {
    pub key: String,
    pub observation: Observation,
}

/// Groups `series` by day key. Groups are ordered by first appearance.
pub fn group_by_day<'a>(series: &'a [Observation], bucketer: &DayBucketer) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();

    for obs in series {
        let key = bucketer.day_key(obs);

        // ~7 groups at most, a linear probe beats hashing here.
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.observations.push(obs),
            None => groups.push(DayGroup {
                key,
                observations: vec![obs],
            }),
        }
    }

    groups
}

/// One entry per distinct day in `series`, in first-seen order.
///
/// Each day is represented by its first sample at or after
/// [`DAYTIME_START_HOUR`]. A day with no such sample (a partial last day, or
/// an undated bucket) falls back to its last sample.
pub fn select_daily(series: &[Observation], bucketer: &DayBucketer) -> Vec<DailyEntry> {
    let daily: Vec<DailyEntry> = group_by_day(series, bucketer)
        .into_iter()
        .filter_map(|group| {
            let pick = group
                .observations
                .iter()
                .find(|obs| bucketer.hour_of_day(obs) >= DAYTIME_START_HOUR)
                .or_else(|| group.observations.last())?;

            Some(DailyEntry {
                key: group.key,
                observation: (*pick).clone(),
            })
        })
        .collect();

    debug!(samples = series.len(), days = daily.len(), "selected daily representatives");
    daily
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::UNKNOWN_DAY;
    use serde_json::json;

    // 2023-12-19T00:00:00Z
    const DAY1: i64 = 1_702_944_000;
    const DAY2: i64 = DAY1 + 86_400;

    fn sample(dt: i64, temp: f64) -> Observation {
        Observation::from_value(json!({ "dt": dt, "main": { "temp": temp } }))
    }

    fn at(day: i64, hour: i64) -> Observation {
        sample(day + hour * 3600, hour as f64)
    }

    fn keys_and_hours(daily: &[DailyEntry], b: &DayBucketer) -> Vec<(String, u32)> {
        daily
            .iter()
            .map(|d| (d.key.clone(), b.hour_of_day(&d.observation)))
            .collect()
    }

    #[test]
    fn empty_series_yields_no_days() {
        assert!(select_daily(&[], &DayBucketer::utc()).is_empty());
        assert!(group_by_day(&[], &DayBucketer::utc()).is_empty());
    }

    #[test]
    fn picks_first_daytime_sample_or_falls_back_to_last() {
        let b = DayBucketer::utc();
        let series = vec![at(DAY1, 3), at(DAY1, 9), at(DAY1, 15), at(DAY2, 21)];

        let daily = select_daily(&series, &b);

        assert_eq!(
            keys_and_hours(&daily, &b),
            vec![("2023-12-19".to_string(), 9), ("2023-12-20".to_string(), 21)]
        );
    }

    #[test]
    fn night_only_day_falls_back_to_last_sample() {
        let b = DayBucketer::utc();
        let series = vec![at(DAY1, 0), at(DAY1, 3)];

        let daily = select_daily(&series, &b);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].observation, at(DAY1, 3));
    }

    #[test]
    fn first_qualifying_sample_wins_over_noon() {
        let b = DayBucketer::utc();
        let series = vec![at(DAY1, 6), at(DAY1, 12)];

        let daily = select_daily(&series, &b);

        assert_eq!(daily[0].observation, at(DAY1, 6));
    }

    #[test]
    fn single_partial_day_has_one_entry() {
        let b = DayBucketer::utc();
        let series = vec![at(DAY1, 18), at(DAY1, 21)];

        let daily = select_daily(&series, &b);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].observation, at(DAY1, 18));
    }

    #[test]
    fn duplicate_timestamps_select_first_in_order() {
        let b = DayBucketer::utc();
        let first = sample(DAY1 + 9 * 3600, 280.0);
        let dup = sample(DAY1 + 9 * 3600, 290.0);

        let daily = select_daily(&[first.clone(), dup], &b);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].observation, first);
    }

    #[test]
    fn gaps_are_tolerated() {
        let b = DayBucketer::utc();
        let day4 = DAY1 + 3 * 86_400;
        let series = vec![at(DAY1, 12), at(day4, 3), at(day4, 15)];

        let daily = select_daily(&series, &b);

        assert_eq!(
            keys_and_hours(&daily, &b),
            vec![("2023-12-19".to_string(), 12), ("2023-12-22".to_string(), 15)]
        );
    }

    #[test]
    fn undated_samples_share_fallback_bucket() {
        let b = DayBucketer::utc();
        let series = vec![
            at(DAY1, 9),
            Observation::from_value(json!({ "main": { "temp": 1.0 } })),
            Observation::from_value(json!({ "main": { "temp": 2.0 } })),
        ];

        let daily = select_daily(&series, &b);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[1].key, UNKNOWN_DAY);
        assert_eq!(daily[1].observation.temperature(), 2.0);
    }

    #[test]
    fn zone_decides_day_membership() {
        let series = vec![at(DAY1, 20), at(DAY1, 23), at(DAY2, 2)];

        let utc = select_daily(&series, &DayBucketer::utc());
        let tokyo = select_daily(&series, &DayBucketer::with_offset_secs(9 * 3600));

        assert_eq!(utc.len(), 2);
        // +9h: 05:00, 08:00, 11:00 all fall on the 20th; 08:00 is the first daytime one.
        assert_eq!(tokyo.len(), 1);
        assert_eq!(tokyo[0].observation, at(DAY1, 23));
    }

    #[test]
    fn daytime_representative_whenever_one_exists() {
        let b = DayBucketer::utc();
        let series: Vec<Observation> = (0..56).map(|i| at(DAY1, 2 + i * 3)).collect();

        let groups = group_by_day(&series, &b);
        let daily = select_daily(&series, &b);

        assert!(!daily.is_empty() && daily.len() <= groups.len());
        for (group, entry) in groups.iter().zip(&daily) {
            assert_eq!(group.key, entry.key);
            let has_daytime = group
                .observations
                .iter()
                .any(|o| b.hour_of_day(o) >= DAYTIME_START_HOUR);
            if has_daytime {
                assert!(b.hour_of_day(&entry.observation) >= DAYTIME_START_HOUR);
            } else {
                assert_eq!(&entry.observation, *group.observations.last().unwrap());
            }
        }
    }

    #[test]
    fn selection_is_idempotent() {
        let b = DayBucketer::utc();
        let series: Vec<Observation> = (0..20).map(|i| at(DAY1, i * 3)).collect();

        assert_eq!(select_daily(&series, &b), select_daily(&series, &b));
    }

    #[test]
    fn groups_keep_series_order() {
        let b = DayBucketer::utc();
        let series = vec![at(DAY1, 3), at(DAY1, 9), at(DAY2, 0)];

        let groups = group_by_day(&series, &b);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].observations, vec![&series[0], &series[1]]);
        assert_eq!(groups[1].observations, vec![&series[2]]);
    }
}
