//! The main entry point for scraping the Hong Kong Observatory
//! "Yesterday's Weather" page. The [`HkoYesterday`] client fetches the page,
//! extracts the temperature, humidity and radiation series from its tables,
//! merges them on the time axis, and writes the CSV and chart artifacts.

use crate::error::HkoError;
use crate::extract::{extract_from_html, Extraction};
use crate::fetch::{PageFetcher, DEFAULT_TIMEOUT, HKO_YESTERDAY_URL};
use crate::merge::{merge_series, MergedRecord};
use crate::output::chart::render_chart;
use crate::output::csv::{write_merged_csv, write_radiation_csv, write_weather_csv};
use bon::bon;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

/// Paths and counts from one completed run, for callers that want to report
/// what was written.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub weather_csv: PathBuf,
    pub radiation_csv: PathBuf,
    pub merged_csv: PathBuf,
    pub chart: PathBuf,
    /// Number of merged time points written.
    pub merged_records: usize,
    /// Table rows dropped for an unparseable time cell.
    pub skipped_rows: usize,
}

/// The scraper client.
///
/// Create an instance with [`HkoYesterday::builder()`]; every knob has a
/// default, so `HkoYesterday::builder().build()?` gives the production
/// configuration (the live HKO page, `data/` for CSVs, `outputs/` for the
/// chart, a 20 second timeout).
///
/// # Examples
///
/// ```no_run
/// # use hko_yesterday::{HkoError, HkoYesterday};
/// #
/// # #[tokio::main]
/// # async fn main() -> Result<(), HkoError> {
/// let client = HkoYesterday::builder().build()?;
/// let report = client.run().await?;
/// println!("{} merged records", report.merged_records);
/// # Ok(())
/// # }
/// ```
pub struct HkoYesterday {
    fetcher: PageFetcher,
    url: String,
    data_dir: PathBuf,
    chart_dir: PathBuf,
}

#[bon]
impl HkoYesterday {
    /// Builds a client.
    ///
    /// # Arguments
    ///
    /// * `.url(String)`: Optional. Page to scrape. Defaults to the live HKO
    ///   "Yesterday's Weather" page.
    /// * `.data_dir(PathBuf)`: Optional. Directory for the three CSV files.
    ///   Defaults to `data/`, created on demand.
    /// * `.chart_dir(PathBuf)`: Optional. Directory for the PNG chart.
    ///   Defaults to `outputs/`, created on demand.
    /// * `.timeout(Duration)`: Optional. HTTP request timeout. Defaults to
    ///   20 seconds.
    ///
    /// # Errors
    ///
    /// Returns [`HkoError::Fetch`] when the HTTP client cannot be
    /// constructed.
    #[builder]
    pub fn new(
        url: Option<String>,
        data_dir: Option<PathBuf>,
        chart_dir: Option<PathBuf>,
        timeout: Option<Duration>,
    ) -> Result<Self, HkoError> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        Ok(Self {
            fetcher: PageFetcher::new(timeout)?,
            url: url.unwrap_or_else(|| HKO_YESTERDAY_URL.to_string()),
            data_dir: data_dir.unwrap_or_else(|| PathBuf::from("data")),
            chart_dir: chart_dir.unwrap_or_else(|| PathBuf::from("outputs")),
        })
    }

    /// Fetches the configured page and returns its HTML.
    ///
    /// # Errors
    ///
    /// Returns [`HkoError::Fetch`] on any network or HTTP failure; there is
    /// no retry.
    pub async fn fetch(&self) -> Result<String, HkoError> {
        Ok(self.fetcher.fetch(&self.url).await?)
    }

    /// Runs the whole pipeline: fetch, extract, merge, write CSVs, render
    /// the chart.
    ///
    /// # Errors
    ///
    /// * [`HkoError::Fetch`] when the page cannot be retrieved.
    /// * [`HkoError::Extract`] when no table on the page was recognizable.
    /// * [`HkoError::Output`] when a CSV or the chart cannot be written.
    ///
    /// Row-level parse failures never fail the run; they are counted in
    /// [`RunReport::skipped_rows`].
    pub async fn run(&self) -> Result<RunReport, HkoError> {
        let html = self.fetch().await?;
        self.process_html(&html)
    }

    /// Everything downstream of the fetch: extract the series from `html`
    /// and write all four artifacts.
    ///
    /// Useful on its own for running saved pages through the pipeline.
    pub fn process_html(&self, html: &str) -> Result<RunReport, HkoError> {
        let extraction = extract_from_html(html)?;
        let records = self.merge(&extraction);

        let weather_csv =
            write_weather_csv(&self.data_dir, &extraction.temperature, &extraction.humidity)?;
        let radiation_csv = write_radiation_csv(&self.data_dir, &extraction.radiation)?;
        let merged_csv = write_merged_csv(&self.data_dir, &records)?;
        let chart = render_chart(&self.chart_dir, &records)?;

        Ok(RunReport {
            weather_csv,
            radiation_csv,
            merged_csv,
            chart,
            merged_records: records.len(),
            skipped_rows: extraction.skipped_rows,
        })
    }

    fn merge(&self, extraction: &Extraction) -> Vec<MergedRecord> {
        let records = merge_series(
            &extraction.temperature,
            &extraction.humidity,
            &extraction.radiation,
        );
        info!("Merged {} time points", records.len());
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_from_html;
    use crate::merge::merge_series;
    use tempfile::TempDir;

    fn fixture_page(rows: &[(&str, f64, f64, f64)]) -> String {
        let mut weather = String::from(
            "<h3>Yesterday's Weather</h3><table>\
             <tr><th>Time</th><th>Air Temperature (&deg;C)</th><th>Relative Humidity (%)</th></tr>",
        );
        let mut radiation = String::from(
            "<h3>Radiation Level</h3><table>\
             <tr><th>Time</th><th>Radiation (&micro;Sv/h)</th></tr>",
        );
        for (time, temp, rh, rad) in rows {
            weather.push_str(&format!(
                "<tr><td>{time}</td><td>{temp}</td><td>{rh}</td></tr>"
            ));
            radiation.push_str(&format!("<tr><td>{time}</td><td>{rad}</td></tr>"));
        }
        weather.push_str("</table>");
        radiation.push_str("</table>");
        format!("<html><body>{weather}{radiation}</body></html>")
    }

    #[test]
    fn builder_accepts_custom_configuration() -> Result<(), HkoError> {
        let client = HkoYesterday::builder()
            .url("http://localhost:1/never-fetched.htm".to_string())
            .data_dir(PathBuf::from("/tmp/hko-test-data"))
            .chart_dir(PathBuf::from("/tmp/hko-test-charts"))
            .timeout(Duration::from_secs(5))
            .build()?;

        assert_eq!(client.url, "http://localhost:1/never-fetched.htm");
        assert_eq!(client.data_dir, PathBuf::from("/tmp/hko-test-data"));
        Ok(())
    }

    #[test]
    fn builder_defaults_point_at_the_live_page() -> Result<(), HkoError> {
        let client = HkoYesterday::builder().build()?;

        assert_eq!(client.url, HKO_YESTERDAY_URL);
        assert_eq!(client.data_dir, PathBuf::from("data"));
        assert_eq!(client.chart_dir, PathBuf::from("outputs"));
        Ok(())
    }

    #[test]
    fn fixture_with_shared_times_merges_one_record_per_row() {
        let html = fixture_page(&[
            ("06:00", 22.1, 88.0, 0.12),
            ("07:00", 22.8, 86.0, 0.12),
            ("08:00", 23.9, 83.0, 0.13),
            ("09:00", 25.0, 79.0, 0.14),
        ]);

        let extraction = extract_from_html(&html).unwrap();
        let records = merge_series(
            &extraction.temperature,
            &extraction.humidity,
            &extraction.radiation,
        );

        assert_eq!(records.len(), 4, "one merged record per fixture row");
        for record in &records {
            assert!(record.temperature.is_some());
            assert!(record.humidity.is_some());
            assert!(record.radiation.is_some());
        }
        assert_eq!(records[0].time, "06:00");
        assert_eq!(records[3].time, "09:00");
        assert_eq!(records[3].temperature, Some(25.0));
        assert_eq!(records[3].radiation, Some(0.14));
    }

    #[test]
    fn fixture_csvs_land_in_the_configured_directory() -> Result<(), HkoError> {
        let dir = TempDir::new().unwrap();
        let html = fixture_page(&[("06:00", 22.1, 88.0, 0.12), ("07:00", 22.8, 86.0, 0.12)]);

        let extraction = extract_from_html(&html)?;
        let records = merge_series(
            &extraction.temperature,
            &extraction.humidity,
            &extraction.radiation,
        );

        let weather = write_weather_csv(dir.path(), &extraction.temperature, &extraction.humidity)?;
        let radiation = write_radiation_csv(dir.path(), &extraction.radiation)?;
        let merged = write_merged_csv(dir.path(), &records)?;

        let weather_lines = std::fs::read_to_string(&weather).unwrap();
        let radiation_lines = std::fs::read_to_string(&radiation).unwrap();
        let merged_lines = std::fs::read_to_string(&merged).unwrap();

        assert_eq!(weather_lines.lines().count(), 3, "header plus two rows");
        assert_eq!(radiation_lines.lines().count(), 3);
        assert_eq!(merged_lines.lines().count(), 3);
        assert!(merged_lines.starts_with("time,temperature,humidity,radiation"));
        Ok(())
    }
}
