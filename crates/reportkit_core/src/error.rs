//! Error type shared by the layout engine and both renderer kernels.

use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report has no columns; at least one column is required.")]
    NoColumns,

    #[error("Invalid layout policy: {0}")]
    InvalidLayoutPolicy(String),

    #[error("Index overflow: {0}")]
    IndexOverflow(String),

    #[error("xlsx write error: {0}")]
    Xlsx(String),

    #[error("pdf write error: {0}")]
    Pdf(String),

    #[error("DataFrame conversion error: {0}")]
    Frame(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
