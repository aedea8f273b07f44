use crate::extract::series::{minute_of_day, TimeSeries};
use crate::merge::MergedRecord;
use crate::output::error::OutputError;
use log::info;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const WEATHER_CSV: &str = "yesterday_weather.csv";
pub const RADIATION_CSV: &str = "yesterday_radiation.csv";
pub const MERGED_CSV: &str = "yesterday_merged.csv";

#[derive(Serialize)]
struct WeatherRow<'a> {
    time: &'a str,
    temperature: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Serialize)]
struct RadiationRow<'a> {
    time: &'a str,
    radiation: Option<f64>,
}

fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(dir).map_err(|e| OutputError::DirCreation(dir.to_path_buf(), e))
}

fn open_writer(path: &Path) -> Result<csv::Writer<fs::File>, OutputError> {
    csv::Writer::from_path(path).map_err(|e| OutputError::CsvWrite(path.to_path_buf(), e))
}

fn finish_writer(mut writer: csv::Writer<fs::File>, path: &Path) -> Result<(), OutputError> {
    writer
        .flush()
        .map_err(|e| OutputError::CsvFlush(path.to_path_buf(), e))
}

// The csv crate only emits the header on the first serialized record, so
// empty outputs need it written by hand to keep the header-row contract.
fn write_header_only(
    writer: &mut csv::Writer<fs::File>,
    path: &Path,
    header: &[&str],
) -> Result<(), OutputError> {
    writer
        .write_record(header)
        .map_err(|e| OutputError::CsvWrite(path.to_path_buf(), e))
}

fn chronological_times<'a>(series: &[&'a TimeSeries]) -> Vec<&'a str> {
    let keys: BTreeSet<&str> = series
        .iter()
        .flat_map(|s| s.times())
        .map(String::as_str)
        .collect();
    let mut times: Vec<&str> = keys.into_iter().collect();
    times.sort_by_key(|time| minute_of_day(time).unwrap_or(u32::MAX));
    times
}

/// Writes `yesterday_weather.csv` (`time,temperature,humidity`) under `dir`,
/// one line per time present in either series, chronologically ordered.
pub fn write_weather_csv(
    dir: &Path,
    temperature: &TimeSeries,
    humidity: &TimeSeries,
) -> Result<PathBuf, OutputError> {
    ensure_dir(dir)?;
    let path = dir.join(WEATHER_CSV);
    let mut writer = open_writer(&path)?;

    let times = chronological_times(&[temperature, humidity]);
    if times.is_empty() {
        write_header_only(&mut writer, &path, &["time", "temperature", "humidity"])?;
    }
    for time in times {
        writer
            .serialize(WeatherRow {
                time,
                temperature: temperature.get(time),
                humidity: humidity.get(time),
            })
            .map_err(|e| OutputError::CsvWrite(path.clone(), e))?;
    }
    finish_writer(writer, &path)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Writes `yesterday_radiation.csv` (`time,radiation`) under `dir`.
pub fn write_radiation_csv(dir: &Path, radiation: &TimeSeries) -> Result<PathBuf, OutputError> {
    ensure_dir(dir)?;
    let path = dir.join(RADIATION_CSV);
    let mut writer = open_writer(&path)?;

    let observations = radiation.observations();
    if observations.is_empty() {
        write_header_only(&mut writer, &path, &["time", "radiation"])?;
    }
    for observation in &observations {
        writer
            .serialize(RadiationRow {
                time: &observation.time,
                radiation: Some(observation.value),
            })
            .map_err(|e| OutputError::CsvWrite(path.clone(), e))?;
    }
    finish_writer(writer, &path)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Writes `yesterday_merged.csv` (`time,temperature,humidity,radiation`)
/// under `dir`; missing quantities become empty cells.
pub fn write_merged_csv(dir: &Path, records: &[MergedRecord]) -> Result<PathBuf, OutputError> {
    ensure_dir(dir)?;
    let path = dir.join(MERGED_CSV);
    let mut writer = open_writer(&path)?;

    if records.is_empty() {
        write_header_only(
            &mut writer,
            &path,
            &["time", "temperature", "humidity", "radiation"],
        )?;
    }
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| OutputError::CsvWrite(path.clone(), e))?;
    }
    finish_writer(writer, &path)?;
    info!("Wrote {}", path.display());
    Ok(path)
}
