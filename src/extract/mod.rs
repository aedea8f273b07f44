pub mod columns;
pub mod error;
pub mod series;
pub mod table;

use crate::extract::columns::{ColumnMapping, FieldKind};
use crate::extract::error::ExtractError;
use crate::extract::series::{extract_series, TimeSeries};
use crate::extract::table::scan_tables;
use log::{debug, info, warn};

/// Everything pulled out of one fetched page: one series per measured
/// quantity plus the count of rows dropped for unparseable time cells.
///
/// Series left empty simply had no matching table on the page.
#[derive(Debug)]
pub struct Extraction {
    pub temperature: TimeSeries,
    pub humidity: TimeSeries,
    pub radiation: TimeSeries,
    pub skipped_rows: usize,
}

impl Extraction {
    fn new() -> Extraction {
        Extraction {
            temperature: TimeSeries::new(FieldKind::Temperature),
            humidity: TimeSeries::new(FieldKind::Humidity),
            radiation: TimeSeries::new(FieldKind::Radiation),
            skipped_rows: 0,
        }
    }

    fn absorb(&mut self, series: TimeSeries) {
        match series.kind() {
            FieldKind::Temperature => self.temperature.extend_from(series),
            FieldKind::Humidity => self.humidity.extend_from(series),
            FieldKind::Radiation => self.radiation.extend_from(series),
            FieldKind::Time => {}
        }
    }

    /// Total number of observations across the three series.
    pub fn observation_count(&self) -> usize {
        self.temperature.len() + self.humidity.len() + self.radiation.len()
    }
}

/// Runs the full extraction over a fetched page: scan every table, match
/// columns, and accumulate the recognized series in document order.
///
/// This is a pure function of the HTML text; no network, no filesystem.
/// Later tables of the same quantity extend the earlier series and win on
/// duplicate times.
///
/// # Errors
///
/// Returns [`ExtractError::NoDataTables`] when not a single table had a time
/// column plus at least one recognized quantity. Row-level parse failures are
/// never fatal; they are counted and logged instead.
pub fn extract_from_html(html: &str) -> Result<Extraction, ExtractError> {
    let tables = scan_tables(html);
    info!("Scanned {} candidate tables", tables.len());

    let mut extraction = Extraction::new();
    let mut matched = 0;
    for (index, table) in tables.iter().enumerate() {
        let mapping = ColumnMapping::detect(&table.headers, &table.heading);
        if mapping.is_empty() {
            debug!("Table {index} has no recognizable columns, skipping");
            continue;
        }
        debug!("Table {index} ({} rows) mapped: {mapping}", table.row_count());
        matched += 1;

        let set = extract_series(table, &mapping);
        extraction.skipped_rows += set.skipped_rows;
        for series in set.series {
            extraction.absorb(series);
        }
    }

    if matched == 0 {
        return Err(ExtractError::NoDataTables {
            tables_seen: tables.len(),
        });
    }
    if extraction.skipped_rows > 0 {
        warn!(
            "Skipped {} rows with unparseable time cells",
            extraction.skipped_rows
        );
    }
    info!(
        "Matched {matched} of {} tables: {} temperature, {} humidity, {} radiation points",
        tables.len(),
        extraction.temperature.len(),
        extraction.humidity.len(),
        extraction.radiation.len(),
    );
    Ok(extraction)
}
