//! CSV row source
//!
//! A single [`CsvSource`] type turns a file, an in-memory string or any
//! [`std::io::Read`] into a lazy sequence of [`CsvRow`]s. All constructors
//! share the same decoding and error classification:
//!
//! - a header lacking the target column fails construction with
//!   `MissingColumn` before any row is read;
//! - a structurally broken row is yielded as `MalformedRow`;
//! - a target field that is not a finite number is left for
//!   [`extract_sample`] to report as a skippable [`InvalidValue`].
//!
//! [`InvalidValue`]: crate::error::InvalidValue

mod reader;
mod value;

pub use reader::{CsvRow, CsvSource, SourceConfig};
pub use value::extract_sample;
