//! The one failure the pipeline surfaces: an upload it cannot read.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file type `{0}` (expected .csv or a spreadsheet workbook)")]
    UnsupportedFormat(String),

    #[error("the file is empty")]
    Empty,

    #[error("could not read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("the workbook has no sheets")]
    NoSheets,
}
