use crate::extract::series::{minute_of_day, TimeSeries};
use serde::Serialize;
use std::collections::BTreeSet;

/// One time point of the joined series; quantities missing from a source
/// stay `None`, they are never defaulted to zero.
///
/// Serializes to one CSV line with `None` as an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRecord {
    pub time: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub radiation: Option<f64>,
}

/// Full outer join of the weather series (temperature, humidity) with the
/// radiation series on the `HH:MM` time key.
///
/// Every time present in at least one input contributes exactly one record;
/// no time key is ever fabricated. Records come back sorted by wall-clock
/// order (minutes since midnight), not by lexical string order, so `"9:00"`
/// sorts before `"10:00"`.
pub fn merge_series(
    temperature: &TimeSeries,
    humidity: &TimeSeries,
    radiation: &TimeSeries,
) -> Vec<MergedRecord> {
    let keys: BTreeSet<&str> = temperature
        .times()
        .chain(humidity.times())
        .chain(radiation.times())
        .map(String::as_str)
        .collect();

    let mut times: Vec<&str> = keys.into_iter().collect();
    times.sort_by_key(|time| minute_of_day(time).unwrap_or(u32::MAX));

    times
        .into_iter()
        .map(|time| MergedRecord {
            time: time.to_string(),
            temperature: temperature.get(time),
            humidity: humidity.get(time),
            radiation: radiation.get(time),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::columns::FieldKind;

    fn series(kind: FieldKind, points: &[(&str, f64)]) -> TimeSeries {
        let mut out = TimeSeries::new(kind);
        for (time, value) in points {
            out.insert(time.to_string(), *value);
        }
        out
    }

    fn empty(kind: FieldKind) -> TimeSeries {
        TimeSeries::new(kind)
    }

    #[test]
    fn overlapping_time_yields_a_single_full_record() {
        let temperature = series(FieldKind::Temperature, &[("13:00", 24.0)]);
        let radiation = series(FieldKind::Radiation, &[("13:00", 300.0)]);

        let records = merge_series(&temperature, &empty(FieldKind::Humidity), &radiation);

        assert_eq!(
            records,
            vec![MergedRecord {
                time: "13:00".to_string(),
                temperature: Some(24.0),
                humidity: None,
                radiation: Some(300.0),
            }]
        );
    }

    #[test]
    fn disjoint_series_yield_one_partial_record_each() {
        let temperature = series(FieldKind::Temperature, &[("01:00", 20.0), ("02:00", 21.0)]);
        let radiation = series(FieldKind::Radiation, &[("03:00", 0.14), ("04:00", 0.15)]);

        let records = merge_series(&temperature, &empty(FieldKind::Humidity), &radiation);

        assert_eq!(records.len(), 4);
        for record in &records[..2] {
            assert!(record.temperature.is_some());
            assert!(record.humidity.is_none());
            assert!(record.radiation.is_none());
        }
        for record in &records[2..] {
            assert!(record.temperature.is_none());
            assert!(record.radiation.is_some());
        }
    }

    #[test]
    fn output_is_wall_clock_sorted_not_lexical() {
        // Lexically "10:00" < "9:00"; chronologically the reverse.
        let temperature = series(
            FieldKind::Temperature,
            &[("10:00", 26.0), ("9:00", 24.0), ("23:00", 22.0)],
        );

        let records = merge_series(
            &temperature,
            &empty(FieldKind::Humidity),
            &empty(FieldKind::Radiation),
        );

        let times: Vec<&str> = records.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(times, vec!["9:00", "10:00", "23:00"]);
    }

    #[test]
    fn out_of_order_inputs_still_come_back_sorted() {
        let humidity = series(
            FieldKind::Humidity,
            &[("15:00", 70.0), ("06:00", 88.0), ("12:00", 75.0)],
        );
        let radiation = series(FieldKind::Radiation, &[("09:30", 0.13), ("00:15", 0.12)]);

        let records = merge_series(&empty(FieldKind::Temperature), &humidity, &radiation);

        let times: Vec<&str> = records.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(times, vec!["00:15", "06:00", "09:30", "12:00", "15:00"]);
    }

    #[test]
    fn no_time_key_is_fabricated() {
        let temperature = series(FieldKind::Temperature, &[("13:00", 24.0)]);
        let humidity = series(FieldKind::Humidity, &[("14:00", 75.0)]);

        let records = merge_series(&temperature, &humidity, &empty(FieldKind::Radiation));

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.time == "13:00" || r.time == "14:00"));
    }

    #[test]
    fn all_empty_inputs_merge_to_nothing() {
        let records = merge_series(
            &empty(FieldKind::Temperature),
            &empty(FieldKind::Humidity),
            &empty(FieldKind::Radiation),
        );
        assert!(records.is_empty());
    }
}
