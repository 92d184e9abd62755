//! Final statistics derived from a completed [`Moments`] accumulator

use crate::error::InsufficientData;
use crate::statistics::Moments;

/// Descriptive statistics of one column
///
/// Variance, skewness and kurtosis are population statistics (normalized by
/// `count`); kurtosis is excess kurtosis, so a normal distribution scores 0.
/// When every sample is identical the spread is zero and variance, standard
/// deviation, skewness and kurtosis are all reported as `0.0`. No field is
/// ever NaN; `sum` and `variance` saturate to infinity when the true value
/// is beyond `f64` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub mean: f64,
    pub variance: f64,
    pub standard_deviation: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

impl Statistics {
    /// Derive statistics from a completed accumulator
    ///
    /// Fails only when no sample was accumulated.
    pub fn from_moments(moments: &Moments) -> Result<Self, InsufficientData> {
        let (Some(min), Some(max)) = (moments.min(), moments.max()) else {
            return Err(InsufficientData);
        };

        let count = moments.len();
        let n = count as f64;
        let sum = moments.sum();
        // Sums relative to a power-of-two scale; the standardized moments
        // are scale free and the scale is multiplied back in exactly
        let (scale, m2, m3, m4) = moments.scaled_sums();

        let spread = m2 / n;
        let variance = spread * scale * scale;
        let standard_deviation = spread.sqrt() * scale;
        let (skewness, kurtosis) = if (m2 * m2).is_normal() {
            (n.sqrt() * m3 / m2.powf(1.5), n * m4 / (m2 * m2) - 3.0)
        } else {
            (0.0, 0.0)
        };

        Ok(Self {
            count,
            min,
            max,
            sum,
            mean: moments.mean().unwrap_or(min),
            variance,
            standard_deviation,
            skewness,
            kurtosis,
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Statistics {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Statistics", 9)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("min", &self.min)?;
        state.serialize_field("max", &self.max)?;
        state.serialize_field("sum", &self.sum)?;
        state.serialize_field("mean", &self.mean)?;
        state.serialize_field("variance", &self.variance)?;
        state.serialize_field("standard_deviation", &self.standard_deviation)?;
        state.serialize_field("skewness", &self.skewness)?;
        state.serialize_field("kurtosis", &self.kurtosis)?;
        state.end()
    }
}
