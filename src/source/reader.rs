//! Lazy CSV row source over files, buffers and arbitrary readers

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::StatsError;
use crate::traits::Row;

/// Parsing options shared by every [`CsvSource`] constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Field delimiter
    pub delimiter: u8,
    /// Quote character
    pub quote: u8,
    /// Trim surrounding whitespace from header names and fields
    pub trim: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: true,
        }
    }
}

impl SourceConfig {
    /// Comma separated, double-quoted, trimmed
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(true)
            .flexible(false)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .trim(if self.trim { Trim::All } else { Trim::None });
        builder
    }
}

/// Column name to field position, first occurrence wins
#[derive(Debug, Default)]
struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    fn new(headers: &StringRecord) -> Self {
        let mut positions = HashMap::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            positions.entry(name.to_string()).or_insert(i);
        }
        Self { positions }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

/// One decoded CSV record
#[derive(Debug, Clone)]
pub struct CsvRow {
    record: StringRecord,
    header: Arc<HeaderIndex>,
}

impl CsvRow {
    /// Line on which the record started, if known
    pub fn line(&self) -> Option<u64> {
        self.record.position().map(csv::Position::line)
    }

    /// Raw fields in column order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.record.iter()
    }
}

impl Row for CsvRow {
    fn field(&self, name: &str) -> Option<&str> {
        self.header
            .position(name)
            .and_then(|i| self.record.get(i))
    }
}

/// Lazy sequence of rows decoded from CSV text
///
/// The header is read and checked for the target column when the source is
/// built; rows are decoded one at a time as the iterator is pulled, so a
/// consumer may stop early without reading the rest of the input.
///
/// A structural failure (field count differing from the header, invalid
/// UTF-8) is yielded once as [`StatsError::MalformedRow`], after which the
/// iterator is exhausted.
///
/// # Example
///
/// ```
/// use colstats::source::{CsvSource, SourceConfig};
/// use colstats::traits::Row;
///
/// let text = "name,amount\na,1.5\nb,2.5\n";
/// let source = CsvSource::from_text(text, "amount", &SourceConfig::default()).unwrap();
///
/// let amounts: Vec<String> = source
///     .map(|row| row.unwrap().field("amount").unwrap().to_string())
///     .collect();
/// assert_eq!(amounts, ["1.5", "2.5"]);
/// ```
#[derive(Debug)]
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    header: Arc<HeaderIndex>,
    column: String,
    path: Option<PathBuf>,
    done: bool,
}

impl CsvSource<File> {
    /// Open a file; failure to open is [`StatsError::SourceUnavailable`]
    pub fn from_path(
        path: impl AsRef<Path>,
        column: &str,
        config: &SourceConfig,
    ) -> Result<Self, StatsError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StatsError::SourceUnavailable {
            path: Some(path.to_owned()),
            source,
        })?;
        Self::build(file, column, config, Some(path.to_owned()))
    }
}

impl<'a> CsvSource<&'a [u8]> {
    /// Parse an in-memory CSV document
    pub fn from_text(text: &'a str, column: &str, config: &SourceConfig) -> Result<Self, StatsError> {
        Self::build(text.as_bytes(), column, config, None)
    }
}

impl<R: Read> CsvSource<R> {
    /// Parse CSV from any reader
    pub fn from_reader(reader: R, column: &str, config: &SourceConfig) -> Result<Self, StatsError> {
        Self::build(reader, column, config, None)
    }

    fn build(
        input: R,
        column: &str,
        config: &SourceConfig,
        path: Option<PathBuf>,
    ) -> Result<Self, StatsError> {
        let mut reader = config.reader_builder().from_reader(input);
        let headers = reader
            .headers()
            .map_err(|err| StatsError::from_csv(err, path.as_deref()))?;

        // Zero-byte input has no header at all: no rows, not a missing column
        let empty = headers.is_empty();
        let header = HeaderIndex::new(headers);
        if !empty && header.position(column).is_none() {
            return Err(StatsError::MissingColumn {
                column: column.to_string(),
            });
        }

        log::debug!(
            "reading column {:?} from {}",
            column,
            path.as_deref()
                .map_or_else(|| "input".to_string(), |p| p.display().to_string())
        );

        Ok(Self {
            reader,
            header: Arc::new(header),
            column: column.to_string(),
            path,
            done: empty,
        })
    }

    /// Name of the target column
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Path of the underlying file, if the source was opened from one
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<CsvRow, StatsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => Some(Ok(CsvRow {
                record,
                header: Arc::clone(&self.header),
            })),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(StatsError::from_csv(err, self.path.as_deref())))
            }
        }
    }
}

impl<R: Read> FusedIterator for CsvSource<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const HEADER: &str = "Timestamp,Amount Received,Currency";

    fn source(text: &str) -> Result<CsvSource<&[u8]>, StatsError> {
        CsvSource::from_text(text, "Amount Received", &SourceConfig::default())
    }

    #[test]
    fn test_rows_by_name() {
        let text = format!("{HEADER}\n2022/09/01,3697.34,USD\n2022/09/02,0.01,EUR\n");
        let rows: Vec<CsvRow> = source(&text).unwrap().map(Result::unwrap).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field("Amount Received"), Some("3697.34"));
        assert_eq!(rows[1].field("Currency"), Some("EUR"));
        assert_eq!(rows[1].field("Nope"), None);
        assert_eq!(rows[0].line(), Some(2));
        assert_eq!(rows[1].fields().count(), 3);
    }

    #[test]
    fn test_missing_column() {
        let err = source("a,b,c\n1,2,3\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingColumn);
    }

    #[test]
    fn test_zero_bytes_has_no_rows() {
        let mut rows = source("").unwrap();
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_header_only() {
        let mut rows = source(HEADER).unwrap();
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_unequal_lengths_is_malformed_and_fuses() {
        let text = format!("{HEADER}\nx,1.0,USD\ny,2.0\nz,3.0,USD\n");
        let mut rows = source(&text).unwrap();

        assert!(rows.next().unwrap().is_ok());
        match rows.next() {
            Some(Err(StatsError::MalformedRow { line, .. })) => assert_eq!(line, Some(3)),
            other => panic!("expected malformed row, got {:?}", other),
        }
        assert!(rows.next().is_none());
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut bytes = b"Amount Received,Note\n1.0,ok\n2.0,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.push(b'\n');

        let mut rows =
            CsvSource::from_reader(bytes.as_slice(), "Amount Received", &SourceConfig::default())
                .unwrap();

        assert!(rows.next().unwrap().is_ok());
        let err = rows.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRow);
    }

    #[test]
    fn test_origin() {
        let text = format!("{HEADER}\n");
        let buffered = source(&text).unwrap();
        assert_eq!(buffered.column(), "Amount Received");
        assert_eq!(buffered.path(), None);

        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/test.csv");
        let file =
            CsvSource::from_path(&path, "Amount Received", &SourceConfig::default()).unwrap();
        assert_eq!(file.path(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_file() {
        let err = CsvSource::from_path(
            "definitely/not/here.csv",
            "Amount Received",
            &SourceConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    }

    #[test]
    fn test_config() {
        let text = "id; Amount Received \n1; 5.5 \n";

        let trimmed = SourceConfig::new().with_delimiter(b';');
        let mut rows = CsvSource::from_text(text, "Amount Received", &trimmed).unwrap();
        assert_eq!(
            rows.next().unwrap().unwrap().field("Amount Received"),
            Some("5.5")
        );

        let raw = SourceConfig::new().with_delimiter(b';').with_trim(false);
        let err = CsvSource::from_text(text, "Amount Received", &raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingColumn);
    }

    #[test]
    fn test_quoted_fields() {
        let text = "name,Amount Received\n\"Smith, J\",\"12.5\"\n";
        let mut rows = source(text).unwrap();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.field("name"), Some("Smith, J"));
        assert_eq!(row.field("Amount Received"), Some("12.5"));
    }
}
