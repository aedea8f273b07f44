//! Decides which table columns carry which measured quantity.
//!
//! Header cells are matched case-insensitively against a fixed, ordered
//! keyword table; the first column matching a quantity's keywords claims it
//! and later matches for the same quantity are ignored. A table only counts
//! as a data table when a time column plus at least one measured quantity
//! were recognized.

use std::fmt;

/// The semantic role a table column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Time-of-day axis of the series.
    Time,
    /// Air temperature, degrees Celsius.
    Temperature,
    /// Relative humidity, percent.
    Humidity,
    /// Ambient gamma radiation, microsieverts per hour.
    Radiation,
}

impl FieldKind {
    /// Lowercase label used in CSV headers and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Time => "time",
            FieldKind::Temperature => "temperature",
            FieldKind::Humidity => "humidity",
            FieldKind::Radiation => "radiation",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Checked in this order per header cell; the first group whose keyword is a
// substring of the lowercased cell wins the column.
const KEYWORD_PRIORITY: [(FieldKind, &[&str]); 4] = [
    (FieldKind::Time, &["time", "hour"]),
    (FieldKind::Temperature, &["temperature", "temp"]),
    (FieldKind::Humidity, &["humidity", "rh"]),
    (
        FieldKind::Radiation,
        &["radiation", "solar", "uv", "\u{b5}sv", "\u{3bc}sv", "usv", "nsv", "sievert"],
    ),
];

// Heading keywords that let a table with a bare time column through when its
// value-column headers are unlabeled (see ColumnMapping::detect).
const WEATHER_HEADING_HINTS: [&str; 5] = ["weather", "yesterday", "temperature", "humidity", "rain"];
const RADIATION_HEADING_HINTS: [&str; 3] = ["radiation", "rad", "sievert"];

/// The per-table decision of which column index holds which [`FieldKind`].
///
/// An empty mapping means the table is not a data table and must be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    assignments: Vec<(usize, FieldKind)>,
}

impl ColumnMapping {
    /// Matches `headers` against the keyword table, producing the mapping for
    /// one table.
    ///
    /// Matching runs left to right; each quantity is claimed by the first
    /// column whose lowercased header contains one of its keywords, and each
    /// column claims at most one quantity (ties broken by the fixed priority
    /// order above).
    ///
    /// When the headers yield a time column but no measured quantity, the
    /// table's section `heading` is consulted: a weather-flavored heading
    /// assigns the first two unclaimed columns to temperature and humidity,
    /// a radiation-flavored heading assigns the first unclaimed column to
    /// radiation. Header matches are never overridden by the fallback.
    ///
    /// Returns the empty mapping unless the result has a time column and at
    /// least one measured quantity.
    pub fn detect(headers: &[String], heading: &str) -> ColumnMapping {
        let mut mapping = ColumnMapping::default();

        for (index, header) in headers.iter().enumerate() {
            let lowered = header.to_lowercase();
            for (kind, keywords) in KEYWORD_PRIORITY {
                if mapping.column_of(kind).is_some() {
                    continue;
                }
                if keywords.iter().any(|k| lowered.contains(k)) {
                    mapping.assignments.push((index, kind));
                    break;
                }
            }
        }

        if mapping.column_of(FieldKind::Time).is_some() && mapping.value_count() == 0 {
            mapping.apply_heading_fallback(headers.len(), heading);
        }

        if mapping.column_of(FieldKind::Time).is_none() || mapping.value_count() == 0 {
            return ColumnMapping::default();
        }
        mapping.assignments.sort_by_key(|(index, _)| *index);
        mapping
    }

    fn apply_heading_fallback(&mut self, column_count: usize, heading: &str) {
        let lowered = heading.to_lowercase();
        let unclaimed: Vec<usize> = (0..column_count)
            .filter(|index| self.kind_of(*index).is_none())
            .collect();

        if WEATHER_HEADING_HINTS.iter().any(|k| lowered.contains(k)) {
            if let Some(&first) = unclaimed.first() {
                self.assignments.push((first, FieldKind::Temperature));
            }
            if let Some(&second) = unclaimed.get(1) {
                self.assignments.push((second, FieldKind::Humidity));
            }
        } else if RADIATION_HEADING_HINTS.iter().any(|k| lowered.contains(k)) {
            if let Some(&first) = unclaimed.first() {
                self.assignments.push((first, FieldKind::Radiation));
            }
        }
    }

    /// Column index claimed by `kind`, if any.
    pub fn column_of(&self, kind: FieldKind) -> Option<usize> {
        self.assignments
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(index, _)| *index)
    }

    /// Quantity assigned to `index`, if any.
    pub fn kind_of(&self, index: usize) -> Option<FieldKind> {
        self.assignments
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, kind)| *kind)
    }

    /// Index of the time column.
    pub fn time_column(&self) -> Option<usize> {
        self.column_of(FieldKind::Time)
    }

    /// The measured (non-time) columns, in column order.
    pub fn value_columns(&self) -> impl Iterator<Item = (usize, FieldKind)> + '_ {
        self.assignments
            .iter()
            .copied()
            .filter(|(_, kind)| *kind != FieldKind::Time)
    }

    fn value_count(&self) -> usize {
        self.value_columns().count()
    }

    /// True when the table was not recognized as a data table.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (index, kind) in &self.assignments {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{kind}=col{index}")?;
            first = false;
        }
        Ok(())
    }
}
