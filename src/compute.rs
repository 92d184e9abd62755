//! The statistics driver: rows in, [`Statistics`] out
//!
//! Rows are pulled one at a time; a row whose target field is missing,
//! empty or not a finite number is skipped, and any error yielded by the
//! row sequence aborts the computation.

use std::io::Read;
use std::path::Path;

use crate::error::{InvalidValue, StatsError};
use crate::source::{extract_sample, CsvSource, SourceConfig};
use crate::statistics::{Moments, Statistics};
use crate::traits::Row;

/// Column the bundled tool reports on when none is given
pub const DEFAULT_COLUMN: &str = "Amount Received";

/// Statistics plus row accounting for one computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub statistics: Statistics,
    /// Rows pulled from the source
    pub rows_read: u64,
    /// Rows whose target field was missing, empty or not a finite number
    pub rows_skipped: u64,
}

#[cfg(feature = "serde")]
impl serde::Serialize for Report {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Report", 3)?;
        state.serialize_field("statistics", &self.statistics)?;
        state.serialize_field("rows_read", &self.rows_read)?;
        state.serialize_field("rows_skipped", &self.rows_skipped)?;
        state.end()
    }
}

/// Compute statistics over `target_column` of a lazy row sequence
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use colstats::compute_statistics;
///
/// let rows = ["1.0", "oops", "3.0"].into_iter().map(|amount| {
///     let row: HashMap<String, String> = [("amount".to_string(), amount.to_string())].into();
///     Ok::<_, colstats::StatsError>(row)
/// });
///
/// let stats = compute_statistics(rows, "amount").unwrap();
/// assert_eq!(stats.count, 2);
/// assert_eq!(stats.mean, 2.0);
/// ```
pub fn compute_statistics<I, R>(rows: I, target_column: &str) -> Result<Statistics, StatsError>
where
    I: IntoIterator<Item = Result<R, StatsError>>,
    R: Row,
{
    compute_report(rows, target_column).map(|report| report.statistics)
}

/// Like [`compute_statistics`], also reporting how many rows were skipped
pub fn compute_report<I, R>(rows: I, target_column: &str) -> Result<Report, StatsError>
where
    I: IntoIterator<Item = Result<R, StatsError>>,
    R: Row,
{
    let mut moments = Moments::new();
    let mut rows_read = 0u64;
    let mut rows_skipped = 0u64;

    for row in rows {
        let row = row?;
        rows_read += 1;

        let accepted = extract_sample(row.field(target_column))
            .and_then(|sample| moments.add(sample).map_err(InvalidValue::from));
        if let Err(reason) = accepted {
            rows_skipped += 1;
            log::debug!("skipping row {}: {}: {}", rows_read, target_column, reason);
        }
    }

    log::debug!(
        "column {:?}: {} rows read, {} skipped",
        target_column,
        rows_read,
        rows_skipped
    );

    let statistics = moments.finalize()?;
    Ok(Report {
        statistics,
        rows_read,
        rows_skipped,
    })
}

/// Statistics of `column` in the CSV file at `path`
pub fn calculate_stats_from_file(
    path: impl AsRef<Path>,
    column: &str,
) -> Result<Statistics, StatsError> {
    calculate_stats_from_file_with_config(path, column, &SourceConfig::default())
}

pub fn calculate_stats_from_file_with_config(
    path: impl AsRef<Path>,
    column: &str,
    config: &SourceConfig,
) -> Result<Statistics, StatsError> {
    let source = CsvSource::from_path(path, column, config)?;
    compute_statistics(source, column)
}

/// Statistics of `column` in an in-memory CSV document
pub fn calculate_stats_from_str(text: &str, column: &str) -> Result<Statistics, StatsError> {
    calculate_stats_from_str_with_config(text, column, &SourceConfig::default())
}

pub fn calculate_stats_from_str_with_config(
    text: &str,
    column: &str,
    config: &SourceConfig,
) -> Result<Statistics, StatsError> {
    let source = CsvSource::from_text(text, column, config)?;
    compute_statistics(source, column)
}

/// Statistics of `column` in CSV read from `reader`
pub fn calculate_stats<R: Read>(reader: R, column: &str) -> Result<Statistics, StatsError> {
    calculate_stats_with_config(reader, column, &SourceConfig::default())
}

pub fn calculate_stats_with_config<R: Read>(
    reader: R,
    column: &str,
    config: &SourceConfig,
) -> Result<Statistics, StatsError> {
    let source = CsvSource::from_reader(reader, column, config)?;
    compute_statistics(source, column)
}
