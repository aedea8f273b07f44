use crate::extract::error::ExtractError;
use crate::fetch::FetchError;
use crate::output::error::OutputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HkoError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
