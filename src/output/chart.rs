use crate::extract::series::minute_of_day;
use crate::merge::MergedRecord;
use crate::output::error::OutputError;
use log::info;
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const CHART_PNG: &str = "yesterday_weather_radiation.png";

const CHART_SIZE: (u32, u32) = (1800, 900);
const TEMPERATURE_COLOR: RGBColor = RGBColor(0xd6, 0x27, 0x28);
const HUMIDITY_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
const RADIATION_COLOR: RGBColor = RGBColor(0x2c, 0xa0, 0x2c);

/// Renders `yesterday_weather_radiation.png` under `dir`.
///
/// Temperature and humidity share the left axis, radiation gets the right
/// axis, and the x axis is the wall-clock time of day. Runs of missing
/// values break the drawn line instead of plotting zero.
pub fn render_chart(dir: &Path, records: &[MergedRecord]) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir).map_err(|e| OutputError::DirCreation(dir.to_path_buf(), e))?;
    let path = dir.join(CHART_PNG);
    draw(&path, records).map_err(|e| OutputError::ChartRender(path.clone(), e))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

fn draw(
    path: &Path,
    records: &[MergedRecord],
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = x_bounds(records);
    let left_range = value_bounds(
        records
            .iter()
            .flat_map(|r| [r.temperature, r.humidity])
            .flatten(),
    );
    let right_range = value_bounds(records.iter().filter_map(|r| r.radiation));

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Yesterday in Hong Kong: Weather and Radiation Level",
            ("sans-serif", 36),
        )
        .margin(24)
        .x_label_area_size(56)
        .y_label_area_size(64)
        .right_y_label_area_size(64)
        .build_cartesian_2d(x_range.clone(), left_range)?
        .set_secondary_coord(x_range, right_range);

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&|minute| format!("{:02}:{:02}", minute / 60, minute % 60))
        .x_desc("Time")
        .y_desc("Temperature (\u{b0}C) / Relative Humidity (%)")
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc("Radiation (\u{b5}Sv/h)")
        .draw()?;

    // --- Left axis: temperature and humidity ---
    let mut labeled = false;
    for segment in segments(records, |r| r.temperature) {
        let drawn = chart.draw_series(LineSeries::new(segment, TEMPERATURE_COLOR.stroke_width(2)))?;
        if !labeled {
            drawn
                .label("Temperature (\u{b0}C)")
                .legend(|(x, y)| legend_line(x, y, TEMPERATURE_COLOR));
            labeled = true;
        }
    }
    let mut labeled = false;
    for segment in segments(records, |r| r.humidity) {
        let drawn = chart.draw_series(LineSeries::new(segment, HUMIDITY_COLOR.stroke_width(2)))?;
        if !labeled {
            drawn
                .label("Relative Humidity (%)")
                .legend(|(x, y)| legend_line(x, y, HUMIDITY_COLOR));
            labeled = true;
        }
    }

    // --- Right axis: radiation ---
    let mut labeled = false;
    for segment in segments(records, |r| r.radiation) {
        let drawn =
            chart.draw_secondary_series(LineSeries::new(segment, RADIATION_COLOR.stroke_width(2)))?;
        if !labeled {
            drawn
                .label("Radiation (\u{b5}Sv/h)")
                .legend(|(x, y)| legend_line(x, y, RADIATION_COLOR));
            labeled = true;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn legend_line(x: i32, y: i32, color: RGBColor) -> PathElement<(i32, i32)> {
    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
}

/// Splits one quantity into runs of consecutive present values; a missing
/// value ends the current run so the plot shows a gap there.
fn segments(
    records: &[MergedRecord],
    field: impl Fn(&MergedRecord) -> Option<f64>,
) -> Vec<Vec<(u32, f64)>> {
    let mut runs = Vec::new();
    let mut current: Vec<(u32, f64)> = Vec::new();
    for record in records {
        let Some(minute) = minute_of_day(&record.time) else {
            continue;
        };
        match field(record) {
            Some(value) => current.push((minute, value)),
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn x_bounds(records: &[MergedRecord]) -> Range<u32> {
    let minutes: Vec<u32> = records
        .iter()
        .filter_map(|r| minute_of_day(&r.time))
        .collect();
    match (minutes.iter().min(), minutes.iter().max()) {
        (Some(&min), Some(&max)) if min < max => min..max,
        (Some(&min), Some(_)) => min..min + 1,
        _ => 0..24 * 60,
    }
}

fn value_bounds(values: impl Iterator<Item = f64>) -> Range<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut any = false;
    for value in values {
        any = true;
        min = min.min(value);
        max = max.max(value);
    }
    if !any {
        return 0.0..1.0;
    }
    if min == max {
        return min - 1.0..max + 1.0;
    }
    let padding = (max - min) * 0.05;
    min - padding..max + padding
}
