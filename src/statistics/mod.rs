//! Statistical summaries for streaming data
//!
//! This module provides the single-pass accumulator and the finalizer that
//! turns its state into the reported statistics.
//!
//! # Example
//!
//! ```
//! use colstats::statistics::Moments;
//!
//! let mut moments = Moments::new();
//!
//! for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     moments.add(value).unwrap();
//! }
//!
//! let stats = moments.finalize().unwrap();
//! println!("Mean: {}", stats.mean);
//! println!("Stddev: {}", stats.standard_deviation);
//! println!("Skewness: {}", stats.skewness);
//! println!("Kurtosis: {}", stats.kurtosis);
//! ```

mod finalize;
mod moments;

pub use finalize::Statistics;
pub use moments::Moments;
