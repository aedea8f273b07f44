use crate::extract::columns::{ColumnMapping, FieldKind};
use crate::extract::table::RawTable;
use chrono::NaiveTime;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// One parsed (time, value) pair for a single measured quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Normalized `HH:MM` time of day.
    pub time: String,
    pub value: f64,
    pub kind: FieldKind,
}

/// All observations of one measured quantity across the day, keyed by the
/// normalized `HH:MM` time string.
///
/// Inserting a duplicate time overwrites the earlier value; well-formed pages
/// do not produce duplicates, and later tables win when they do.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    kind: FieldKind,
    values: HashMap<String, f64>,
}

impl TimeSeries {
    pub fn new(kind: FieldKind) -> TimeSeries {
        TimeSeries {
            kind,
            values: HashMap::new(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn insert(&mut self, time: String, value: f64) {
        self.values.insert(time, value);
    }

    /// Value observed at `time`, if any.
    pub fn get(&self, time: &str) -> Option<f64> {
        self.values.get(time).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The time keys, in no particular order.
    pub fn times(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// The observations sorted chronologically.
    pub fn observations(&self) -> Vec<Observation> {
        let mut observations: Vec<Observation> = self
            .values
            .iter()
            .map(|(time, value)| Observation {
                time: time.clone(),
                value: *value,
                kind: self.kind,
            })
            .collect();
        observations.sort_by_key(|o| minute_of_day(&o.time).unwrap_or(u32::MAX));
        observations
    }

    /// Moves every entry of `other` into `self`; `other`'s entries win on
    /// duplicate times.
    pub fn extend_from(&mut self, other: TimeSeries) {
        self.values.extend(other.values);
    }
}

/// Series extracted from one matched table, plus the count of rows dropped
/// for an unparseable time cell.
#[derive(Debug)]
pub struct SeriesSet {
    pub series: Vec<TimeSeries>,
    pub skipped_rows: usize,
}

const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H%M", "%H:%M:%S", "%I:%M %p"];

/// Best-effort parse of a time cell into a normalized `"HH:MM"` string.
///
/// Accepts `"13:00"`, `"1300"`, `"13:00:00"`, `"1:00 PM"` and a bare hour
/// `"13"`; anything else is `None` and the caller skips the row.
pub fn parse_time(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return Some(time.format("%H:%M").to_string());
        }
    }
    // chrono needs both hour and minute for a NaiveTime, so bare-hour cells
    // are completed by hand.
    if let Ok(hour) = trimmed.parse::<u32>() {
        if hour < 24 {
            return Some(format!("{hour:02}:00"));
        }
    }
    None
}

static NUMBER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn number_pattern() -> &'static Regex {
    NUMBER_PATTERN.get_or_init(|| Regex::new(r"[-+]?\d*\.?\d+").expect("static pattern is valid"))
}

/// Pulls the first embedded decimal number out of a cell, dropping units and
/// annotations (`"24.5°C"` -> `24.5`, `"78%"` -> `78.0`). `None` when the
/// cell holds no number at all.
pub fn parse_value(text: &str) -> Option<f64> {
    let found = number_pattern().find(text.trim())?;
    found.as_str().parse::<f64>().ok()
}

/// Sort key for `HH:MM` strings: minutes since midnight.
///
/// Lexical order would put "10:00" before "9:00"; this never does.
pub(crate) fn minute_of_day(time: &str) -> Option<u32> {
    let (hour, minute) = time.split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

// Radiation cells and headers carry their unit; everything is normalized to
// microsieverts per hour.
const MICROSIEVERT_HINTS: [&str; 5] = [
    "\u{b5}sv",
    "\u{3bc}sv",
    "usv",
    "micro-sievert",
    "micro sievert",
];

pub(crate) fn radiation_scale(text: &str) -> Option<f64> {
    let lowered = text.to_lowercase();
    if MICROSIEVERT_HINTS.iter().any(|u| lowered.contains(u)) {
        Some(1.0)
    } else if lowered.contains("nsv") {
        Some(0.001)
    } else {
        None
    }
}

/// Turns a matched table into one [`TimeSeries`] per measured column.
///
/// Rows whose time cell fails [`parse_time`] are skipped whole and counted in
/// [`SeriesSet::skipped_rows`]; a value cell that fails [`parse_value`] only
/// omits that quantity at that time, the rest of the row still contributes.
pub fn extract_series(table: &RawTable, mapping: &ColumnMapping) -> SeriesSet {
    let mut series: Vec<TimeSeries> = mapping
        .value_columns()
        .map(|(_, kind)| TimeSeries::new(kind))
        .collect();
    let mut skipped_rows = 0;

    let Some(time_column) = mapping.time_column() else {
        return SeriesSet {
            series,
            skipped_rows,
        };
    };
    let header_scale = radiation_scale(&table.headers.join(" ")).unwrap_or(1.0);

    for row in &table.rows {
        let time_text = row.get(time_column).map(String::as_str).unwrap_or("");
        let Some(time) = parse_time(time_text) else {
            debug!("Skipping row with unparseable time cell {time_text:?}");
            skipped_rows += 1;
            continue;
        };

        for (slot, (column, kind)) in mapping.value_columns().enumerate() {
            let Some(cell) = row.get(column) else {
                continue;
            };
            match parse_value(cell) {
                Some(value) => {
                    let scale = if kind == FieldKind::Radiation {
                        radiation_scale(cell).unwrap_or(header_scale)
                    } else {
                        1.0
                    };
                    series[slot].insert(time.clone(), value * scale);
                }
                None => {
                    debug!("No numeric {kind} value at {time}: {cell:?}");
                }
            }
        }
    }

    SeriesSet {
        series,
        skipped_rows,
    }
}
