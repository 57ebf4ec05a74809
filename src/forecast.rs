//! Daily aggregation of the provider's 3-hourly forecast feed.
//!
//! The forecast endpoint returns a flat list of readings, one every three
//! hours, starting at the next slot after the request and running out five
//! days. E.g. a request at 17:23 on 2023-11-20 yields:
//! - `list[0]` → 2023-11-20 18:00:00
//! - `list[1]` → 2023-11-20 21:00:00
//! - `list[2]` → 2023-11-21 00:00:00
//! - ... and so on, ~40 entries in total.
//!
//! The dashboard wants one card per upcoming day, so this module folds the
//! stream into per-day summaries in a single forward pass: entries still
//! belonging to "today" are skipped, and each change of weekday closes the
//! running day. The whole computation is pure; fetching lives in
//! [`crate::provider`] and presentation stays in the route layer.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::models::Observation;

// ---

/// Icon codes for the condition categories the dashboard can draw. A day
/// whose winning category is missing here gets no icon, not an error.
const WEATHER_ICONS: [(&str, &str); 6] = [
    ("Thunderstorm", "11d"),
    ("Drizzle", "09d"),
    ("Rain", "09d"),
    ("Snow", "13d"),
    ("Clear", "01d"),
    ("Clouds", "03d"),
];

/// Spread and mean of one metric over one day's readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    // ---
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// One forecast card's worth of data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    // ---
    /// Weekday name, e.g. "Tuesday".
    pub day: String,
    /// Calendar date as "DD/MM/YYYY".
    pub date: String,
    /// Icon code of the day's most frequent condition, if it has one.
    pub icon: Option<String>,
    pub temperature: MetricSummary,
    pub humidity: MetricSummary,
    pub wind: MetricSummary,
}

// ---

/// Summarize the forecast feed per upcoming day, using the local calendar
/// date as "today".
pub fn daily_forecast(list: &[Observation]) -> Vec<DailySummary> {
    // ---
    daily_forecast_at(Local::now().date_naive(), list)
}

/// Same as [`daily_forecast`] with an explicit reference date.
///
/// `list` must already be sorted ascending by timestamp; the provider
/// guarantees this and the pass never re-sorts. Entries sharing the
/// reference date's weekday are excluded, so a feed consisting only of
/// today's readings legitimately produces an empty result.
pub fn daily_forecast_at(reference: NaiveDate, list: &[Observation]) -> Vec<DailySummary> {
    // ---
    let mut days = Vec::new();
    let mut open: Option<DayAccumulator> = None;

    for obs in list {
        // Readings still belonging to today are not part of the outlook.
        if obs.timestamp.weekday() == reference.weekday() {
            continue;
        }

        open = Some(match open.take() {
            Some(mut acc) if acc.weekday == obs.timestamp.weekday() => {
                acc.fold(obs);
                acc
            }
            Some(acc) => {
                // Weekday changed: close the running day, then the boundary
                // reading becomes the first of the next one.
                days.push(acc.finish());
                DayAccumulator::open(obs)
            }
            None => DayAccumulator::open(obs),
        });
    }

    // The loop only flushes on boundaries; the last day is still open here.
    if let Some(acc) = open {
        days.push(acc.finish());
    }

    days
}

// ---

/// Running totals for one day's grouping window. Created on the first
/// reading of a day, consumed by [`DayAccumulator::finish`].
struct DayAccumulator {
    // ---
    weekday: chrono::Weekday,
    day: String,
    date: String,
    temperature: RunningMetric,
    humidity: RunningMetric,
    wind: RunningMetric,
    hours: u32,
    /// Count per condition category, in first-seen order. Insertion order
    /// breaks frequency ties, and a day holds at most eight readings, so a
    /// linear scan beats a map here.
    conditions: Vec<(String, u32)>,
}

impl DayAccumulator {
    // ---
    /// Start a new day keyed on this reading's weekday and fold the reading
    /// in as its first sample.
    fn open(obs: &Observation) -> Self {
        // ---
        let mut acc = DayAccumulator {
            weekday: obs.timestamp.weekday(),
            day: obs.timestamp.format("%A").to_string(),
            date: obs.timestamp.format("%d/%m/%Y").to_string(),
            temperature: RunningMetric::new(),
            humidity: RunningMetric::new(),
            wind: RunningMetric::new(),
            hours: 0,
            conditions: Vec::new(),
        };
        acc.fold(obs);
        acc
    }

    fn fold(&mut self, obs: &Observation) {
        // ---
        self.temperature.fold(obs.temperature);
        self.humidity.fold(obs.humidity);
        self.wind.fold(obs.wind_speed);
        self.hours += 1;

        match self
            .conditions
            .iter_mut()
            .find(|(name, _)| name == &obs.condition)
        {
            Some((_, count)) => *count += 1,
            None => self.conditions.push((obs.condition.clone(), 1)),
        }
    }

    fn finish(self) -> DailySummary {
        // ---
        let hours = f64::from(self.hours);
        let mut humidity = self.humidity.finish(hours);
        // Humidity keeps the dashboard's two-stage rounding: two decimals
        // like the other metrics, then once more to a whole number.
        humidity.average = humidity.average.round();

        DailySummary {
            day: self.day,
            date: self.date,
            icon: representative_icon(&self.conditions).map(str::to_owned),
            temperature: self.temperature.finish(hours),
            humidity,
            wind: self.wind.finish(hours),
        }
    }
}

/// Sum and bounds of a single metric while its day is still open.
struct RunningMetric {
    // ---
    sum: f64,
    min: f64,
    max: f64,
}

impl RunningMetric {
    // ---
    fn new() -> Self {
        Self {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// The first value seeds both bounds; later values only widen them.
    fn fold(&mut self, value: f64) {
        // ---
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn finish(&self, count: f64) -> MetricSummary {
        // ---
        MetricSummary {
            min: self.min,
            max: self.max,
            average: round2(self.sum / count),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pick the icon of the most frequent condition. Comparison is strictly
/// greater, so an exact tie keeps whichever category was counted first.
fn representative_icon(conditions: &[(String, u32)]) -> Option<&'static str> {
    // ---
    let mut winner: Option<&str> = None;
    let mut best = 0u32;

    for (name, count) in conditions {
        if *count > best {
            best = *count;
            winner = Some(name);
        }
    }

    let winner = winner?;
    WEATHER_ICONS
        .iter()
        .find(|(name, _)| *name == winner)
        .map(|(_, icon)| *icon)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::NaiveDateTime;

    /// Monday; the synthetic feeds below start on the evening of this day.
    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 11, 20).unwrap()
    }

    fn obs(timestamp: &str, temp: f64, humidity: f64, wind: f64, condition: &str) -> Observation {
        // ---
        Observation {
            timestamp: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap(),
            temperature: temp,
            humidity,
            wind_speed: wind,
            condition: condition.to_string(),
        }
    }

    /// Eight 3-hourly readings covering one full day.
    fn full_day(date: &str, temps: [f64; 8], condition: &str) -> Vec<Observation> {
        // ---
        temps
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                obs(
                    &format!("{} {:02}:00:00", date, i * 3),
                    t,
                    60.0,
                    3.5,
                    condition,
                )
            })
            .collect()
    }

    #[test]
    fn single_day_min_max_average() {
        // ---
        let list = full_day("2023-11-21", [10.0, 12.0, 14.0, 16.0, 15.0, 13.0, 11.0, 9.0], "Clear");
        let days = daily_forecast_at(reference(), &list);

        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.day, "Tuesday");
        assert_eq!(day.date, "21/11/2023");
        assert_eq!(day.temperature.min, 9.0);
        assert_eq!(day.temperature.max, 16.0);
        assert_eq!(day.temperature.average, 12.5);
    }

    #[test]
    fn todays_readings_are_excluded() {
        // ---
        // Two late readings on the reference Monday, then a full Tuesday.
        let mut list = vec![
            obs("2023-11-20 18:00:00", 99.0, 99.0, 99.0, "Thunderstorm"),
            obs("2023-11-20 21:00:00", 99.0, 99.0, 99.0, "Thunderstorm"),
        ];
        list.extend(full_day("2023-11-21", [10.0; 8], "Clear"));

        let days = daily_forecast_at(reference(), &list);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, "Tuesday");
        assert_eq!(days[0].temperature.max, 10.0);
        assert_eq!(days[0].icon.as_deref(), Some("01d"));
    }

    #[test]
    fn all_today_yields_empty_result() {
        // ---
        let list = vec![
            obs("2023-11-20 18:00:00", 12.0, 60.0, 3.0, "Clouds"),
            obs("2023-11-20 21:00:00", 11.0, 62.0, 2.8, "Clouds"),
        ];

        assert!(daily_forecast_at(reference(), &list).is_empty());
        assert!(daily_forecast_at(reference(), &[]).is_empty());
    }

    #[test]
    fn five_days_in_encounter_order() {
        // ---
        let mut list = Vec::new();
        for (i, date) in ["2023-11-21", "2023-11-22", "2023-11-23", "2023-11-24", "2023-11-25"]
            .iter()
            .enumerate()
        {
            list.extend(full_day(date, [10.0 + i as f64; 8], "Clouds"));
        }

        let days = daily_forecast_at(reference(), &list);

        assert_eq!(days.len(), 5);
        let names: Vec<&str> = days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(names, ["Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"]);
        assert_eq!(days[4].temperature.average, 14.0);
    }

    #[test]
    fn boundary_reading_counts_toward_the_new_day() {
        // ---
        // Tuesday's two evening slots, then Wednesday from midnight. The
        // midnight reading closes Tuesday and must only contribute to
        // Wednesday's averages.
        let list = vec![
            obs("2023-11-21 18:00:00", 10.0, 60.0, 3.0, "Rain"),
            obs("2023-11-21 21:00:00", 12.0, 60.0, 3.0, "Rain"),
            obs("2023-11-22 00:00:00", 20.0, 80.0, 5.0, "Clear"),
            obs("2023-11-22 03:00:00", 22.0, 80.0, 5.0, "Clear"),
        ];

        let days = daily_forecast_at(reference(), &list);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].temperature.average, 11.0);
        assert_eq!(days[0].temperature.max, 12.0);
        assert_eq!(days[1].temperature.average, 21.0);
        assert_eq!(days[1].temperature.min, 20.0);
    }

    #[test]
    fn icon_follows_condition_majority() {
        // ---
        let mut list = full_day("2023-11-21", [10.0; 8], "Rain");
        for entry in list.iter_mut().take(3) {
            entry.condition = "Clear".to_string();
        }

        // Rain 5, Clear 3.
        let days = daily_forecast_at(reference(), &list);
        assert_eq!(days[0].icon.as_deref(), Some("09d"));
    }

    #[test]
    fn condition_tie_keeps_first_seen_category() {
        // ---
        let list = vec![
            obs("2023-11-21 00:00:00", 10.0, 60.0, 3.0, "Clear"),
            obs("2023-11-21 03:00:00", 10.0, 60.0, 3.0, "Clouds"),
            obs("2023-11-21 06:00:00", 10.0, 60.0, 3.0, "Clear"),
            obs("2023-11-21 09:00:00", 10.0, 60.0, 3.0, "Clouds"),
            obs("2023-11-21 12:00:00", 10.0, 60.0, 3.0, "Clear"),
            obs("2023-11-21 15:00:00", 10.0, 60.0, 3.0, "Clouds"),
        ];

        let days = daily_forecast_at(reference(), &list);
        assert_eq!(days[0].icon.as_deref(), Some("01d"));

        let reversed: Vec<Observation> = list
            .iter()
            .enumerate()
            .map(|(i, o)| Observation {
                condition: if i % 2 == 0 { "Clouds" } else { "Clear" }.to_string(),
                ..o.clone()
            })
            .collect();

        let days = daily_forecast_at(reference(), &reversed);
        assert_eq!(days[0].icon.as_deref(), Some("03d"));
    }

    #[test]
    fn unmapped_condition_has_no_icon() {
        // ---
        let list = full_day("2023-11-21", [10.0; 8], "Mist");
        let days = daily_forecast_at(reference(), &list);

        assert_eq!(days[0].icon, None);
    }

    #[test]
    fn humidity_average_is_whole_valued() {
        // ---
        let mut list = full_day("2023-11-21", [10.0; 8], "Clear");
        for (entry, humidity) in list.iter_mut().zip([60.0, 65.0, 63.0, 58.0, 61.0, 62.0, 64.0, 59.0]) {
            entry.humidity = humidity;
        }

        let days = daily_forecast_at(reference(), &list);
        let humidity = &days[0].humidity;

        assert_eq!(humidity.average.fract(), 0.0);
        assert_eq!(humidity.average, 62.0);
        assert_eq!(humidity.min, 58.0);
        assert_eq!(humidity.max, 65.0);
    }

    #[test]
    fn bounds_always_bracket_the_average() {
        // ---
        let mut list = Vec::new();
        list.extend(full_day("2023-11-21", [3.2, -1.5, 0.0, 7.8, 4.4, 2.1, -0.5, 1.0], "Snow"));
        list.extend(full_day("2023-11-22", [12.7, 15.3, 18.1, 16.9, 14.2, 13.8, 12.9, 12.6], "Clear"));

        for day in daily_forecast_at(reference(), &list) {
            for metric in [&day.temperature, &day.humidity, &day.wind] {
                assert!(metric.min <= metric.average, "{:?}", metric);
                assert!(metric.average <= metric.max, "{:?}", metric);
            }
        }
    }

    #[test]
    fn averages_have_at_most_two_decimals() {
        // ---
        let list = vec![
            obs("2023-11-21 00:00:00", 10.0, 60.0, 3.1, "Clear"),
            obs("2023-11-21 03:00:00", 10.5, 61.0, 3.2, "Clear"),
            obs("2023-11-21 06:00:00", 10.25, 62.0, 3.3, "Clear"),
        ];

        let day = &daily_forecast_at(reference(), &list)[0];
        for average in [day.temperature.average, day.wind.average] {
            assert_eq!(round2(average), average);
        }
    }

    #[test]
    fn same_input_same_output() {
        // ---
        let mut list = full_day("2023-11-21", [10.0, 12.0, 14.0, 16.0, 15.0, 13.0, 11.0, 9.0], "Rain");
        list.extend(full_day("2023-11-22", [8.0; 8], "Snow"));

        let first = daily_forecast_at(reference(), &list);
        let second = daily_forecast_at(reference(), &list);
        assert_eq!(first, second);
    }
}
