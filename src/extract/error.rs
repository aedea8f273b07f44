use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    // The scanner itself never fails; this is the table-level fatal case.
    #[error("No data table with a recognizable time column found ({tables_seen} tables scanned)")]
    NoDataTables { tables_seen: usize },
}
