use std::path::PathBuf;

use thiserror::Error;

/// Failures of the summarize → chart → assemble pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("column '{0}' does not exist in the dataset")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric and cannot be used as the y axis")]
    NonNumericColumn(String),

    #[error("unsupported chart kind '{0}' (expected Line, Bar or Scatter)")]
    UnsupportedChartKind(String),

    #[error("logo must be a PNG or JPEG image")]
    UnsupportedLogo,

    #[error("{0} was derived from a different dataset than the one being reported")]
    StaleArtifact(&'static str),

    #[error("chart drawing failed: {0}")]
    Chart(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
