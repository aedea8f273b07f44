mod error;
mod extract;
mod fetch;
mod hko;
mod merge;
mod output;

pub use error::HkoError;
pub use hko::*;

pub use extract::columns::{ColumnMapping, FieldKind};
pub use extract::error::ExtractError;
pub use extract::series::{extract_series, parse_time, parse_value, Observation, SeriesSet, TimeSeries};
pub use extract::table::{scan_tables, RawTable};
pub use extract::{extract_from_html, Extraction};

pub use fetch::{FetchError, PageFetcher, DEFAULT_TIMEOUT, HKO_YESTERDAY_URL};

pub use merge::{merge_series, MergedRecord};

pub use output::chart::{render_chart, CHART_PNG};
pub use output::csv::{
    write_merged_csv, write_radiation_csv, write_weather_csv, MERGED_CSV, RADIATION_CSV,
    WEATHER_CSV,
};
pub use output::error::OutputError;
