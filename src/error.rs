//! Error types
//!
//! Fatal failures are reported as [`StatsError`]. Per-row problems with the
//! target field are [`InvalidValue`]s, which the driver recovers from by
//! skipping the row. [`ErrorKind`] is the flat classification host adapters
//! translate into their own error idiom.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Classification of every failure the pipeline can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The header lacks the target column
    MissingColumn,
    /// A row failed structural decoding
    MalformedRow,
    /// A target field was missing, empty or not a finite number (non-fatal)
    InvalidValue,
    /// The input could not be opened or read
    SourceUnavailable,
    /// No valid sample was found
    InsufficientData,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ErrorKind::MissingColumn => "missing column",
            ErrorKind::MalformedRow => "malformed row",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::SourceUnavailable => "source unavailable",
            ErrorKind::InsufficientData => "insufficient data",
        };
        f.write_str(name)
    }
}

/// Fatal error aborting a whole computation
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("column {column:?} not found in header")]
    MissingColumn { column: String },

    #[error("malformed row{}: {source}", line_suffix(*.line))]
    MalformedRow {
        line: Option<u64>,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read {}: {source}", display_path(.path))]
    SourceUnavailable {
        /// `None` when reading from an in-memory buffer or a caller's reader
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("not enough data: no valid numeric values")]
    InsufficientData,
}

impl StatsError {
    /// The flat kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatsError::MissingColumn { .. } => ErrorKind::MissingColumn,
            StatsError::MalformedRow { .. } => ErrorKind::MalformedRow,
            StatsError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            StatsError::InsufficientData => ErrorKind::InsufficientData,
        }
    }

    /// Classify an error raised by the CSV decoder
    ///
    /// I/O failures mean the source itself went away; everything else is a
    /// structural problem with the row being decoded.
    pub(crate) fn from_csv(err: csv::Error, path: Option<&std::path::Path>) -> Self {
        let line = err.position().map(csv::Position::line);
        if !err.is_io_error() {
            return StatsError::MalformedRow { line, source: err };
        }
        let source = match err.into_kind() {
            csv::ErrorKind::Io(source) => source,
            other => io::Error::other(format!("{other:?}")),
        };
        StatsError::SourceUnavailable {
            path: path.map(ToOwned::to_owned),
            source,
        }
    }
}

impl From<InsufficientData> for StatsError {
    fn from(_: InsufficientData) -> Self {
        StatsError::InsufficientData
    }
}

fn line_suffix(line: Option<u64>) -> String {
    match line {
        Some(line) => format!(" at line {line}"),
        None => String::new(),
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!("{:?}", path.display().to_string()),
        None => "input".to_string(),
    }
}

/// Reason a row's target field was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidValue {
    #[error("field is missing")]
    Missing,

    #[error("field is empty")]
    Empty,

    #[error("{0:?} is not a number")]
    NotANumber(String),

    #[error("{0:?} is not a finite number")]
    NonFinite(String),
}

impl InvalidValue {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidValue
    }
}

/// The accumulator was handed NaN or an infinity
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("sample {0} is not a finite number")]
pub struct NonFiniteSample(pub f64);

impl From<NonFiniteSample> for InvalidValue {
    fn from(rejected: NonFiniteSample) -> Self {
        InvalidValue::NonFinite(rejected.0.to_string())
    }
}

/// No sample was accumulated, so no statistic can be derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not enough data")]
pub struct InsufficientData;
