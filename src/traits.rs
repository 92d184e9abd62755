//! Core traits for the statistics pipeline
//!
//! [`Accumulator`] is the seam for one-pass aggregators and [`Row`] is the
//! seam between a row source and the statistics driver.

use core::fmt::Debug;
use std::collections::{BTreeMap, HashMap};

use crate::error::NonFiniteSample;

/// Core trait for single-pass accumulators
pub trait Accumulator: Clone + Debug {
    /// The type of sample this accumulator consumes
    type Sample;

    /// Add a sample to the accumulator
    ///
    /// Returns an error, leaving the state untouched, if the sample cannot
    /// take part in the aggregation.
    fn update(&mut self, sample: Self::Sample) -> Result<(), NonFiniteSample>;

    /// Merge another accumulator into this one
    fn merge(&mut self, other: &Self);

    /// Reset to the empty state
    fn clear(&mut self);

    /// Number of samples accepted
    fn count(&self) -> u64;

    /// Check if no sample has been accepted
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// A single input record: a mapping from column name to raw text
pub trait Row {
    /// Raw text of the named field, or `None` if the row has no such field
    fn field(&self, name: &str) -> Option<&str>;
}

impl Row for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Row for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: Row + ?Sized> Row for &T {
    fn field(&self, name: &str) -> Option<&str> {
        (**self).field(name)
    }
}
