use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write CSV file '{0}'")]
    CsvWrite(PathBuf, #[source] csv::Error),

    #[error("Failed to flush CSV file '{0}'")]
    CsvFlush(PathBuf, #[source] std::io::Error),

    #[error("Failed to render chart '{0}'")]
    ChartRender(PathBuf, #[source] Box<dyn std::error::Error + Send + Sync>),
}
