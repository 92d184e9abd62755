//! # Colstats
//!
//! Single-pass descriptive statistics over one numeric CSV column.
//!
//! Colstats reads CSV lazily, extracts one named column, and folds every
//! finite value into a numerically stable moment accumulator. The full
//! dataset is never held in memory.
//!
//! ## Features
//!
//! - **Nine statistics**: count, min, max, sum, mean, variance, standard
//!   deviation, skewness and excess kurtosis
//! - **Stable accumulation**: higher-order Welford updates, no sums of raw powers
//! - **Lazy input**: files, strings and readers share one [`CsvSource`]
//! - **Classified errors**: every failure maps to an [`ErrorKind`]
//! - **Mergeable**: partial [`Moments`] from separate partitions combine exactly
//!
//! ## Quick Start
//!
//! ```rust
//! use colstats::prelude::*;
//!
//! let csv = "Timestamp,Amount Received\n\
//!            2022/09/01 00:20,3697.34\n\
//!            2022/09/01 00:20,0.01\n\
//!            2022/09/01 00:00,14675.57\n";
//!
//! let stats = calculate_stats_from_str(csv, "Amount Received").unwrap();
//! assert_eq!(stats.count, 3);
//! assert_eq!(stats.min, 0.01);
//! assert_eq!(stats.max, 14675.57);
//! assert!((stats.kurtosis + 1.5).abs() < 1e-9);
//! ```
//!
//! ## Error handling
//!
//! Rows whose target field is missing, empty or not a finite number are
//! skipped. A missing column, a structurally malformed row or an unreadable
//! source aborts the computation, and so does ending up with no valid value:
//!
//! ```rust
//! use colstats::{calculate_stats_from_str, ErrorKind};
//!
//! let err = calculate_stats_from_str("id,Amount Received\n", "Amount Received").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InsufficientData);
//!
//! let err = calculate_stats_from_str("id,amount\n1,2\n", "Amount Received").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MissingColumn);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize` for [`Statistics`] and [`Report`]
//! - `cli` (default): the `colstats` command-line tool

pub mod traits;

pub mod compute;
pub mod error;
pub mod source;
pub mod statistics;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::compute::{
        calculate_stats, calculate_stats_from_file, calculate_stats_from_str, compute_report,
        compute_statistics, Report, DEFAULT_COLUMN,
    };
    pub use crate::error::{ErrorKind, InvalidValue, StatsError};
    pub use crate::source::{CsvRow, CsvSource, SourceConfig};
    pub use crate::statistics::{Moments, Statistics};
}

pub use compute::{
    calculate_stats, calculate_stats_from_file, calculate_stats_from_file_with_config,
    calculate_stats_from_str, calculate_stats_from_str_with_config, calculate_stats_with_config,
    compute_report, compute_statistics, Report, DEFAULT_COLUMN,
};
pub use error::{ErrorKind, InvalidValue, StatsError};
pub use source::{CsvSource, SourceConfig};
pub use statistics::{Moments, Statistics};
