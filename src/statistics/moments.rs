//! Running central moments (mean, variance, skewness, kurtosis, min, max, sum)
//!
//! Computes streaming moments using the higher-order extension of Welford's
//! numerically stable online algorithm. Supports merging of partial results.

use crate::error::{InsufficientData, NonFiniteSample};
use crate::statistics::Statistics;
use crate::traits::Accumulator;

/// Running moments calculator
///
/// Tracks count, min, max, sum and the second, third and fourth central
/// moment sums in a single pass with O(1) memory. Each update folds the new
/// value into the running mean first and corrects the higher moment sums
/// from the lower ones, so no sum of raw powers is ever formed and large
/// offsets do not cancel catastrophically.
///
/// # Example
///
/// ```
/// use colstats::statistics::Moments;
///
/// let mut moments = Moments::new();
///
/// for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     moments.add(value).unwrap();
/// }
///
/// let stats = moments.finalize().unwrap();
/// assert!((stats.mean - 5.0).abs() < 1e-12);
/// assert!((stats.variance - 4.0).abs() < 1e-12);
/// assert!((stats.standard_deviation - 2.0).abs() < 1e-12);
/// assert_eq!(stats.min, 2.0);
/// assert_eq!(stats.max, 9.0);
/// ```
#[derive(Clone, Debug)]
pub struct Moments {
    /// Number of values seen
    count: u64,
    /// Minimum value
    min: f64,
    /// Maximum value
    max: f64,
    /// Running total
    sum: f64,
    /// Running mean
    mean: f64,
    /// Power of two at or below the largest magnitude seen, zero until a
    /// non-zero value arrives. The moment sums below are kept in units of
    /// this scale so they neither overflow nor underflow.
    scale: f64,
    /// Sum of squared differences from the mean, over `scale^2`
    m2: f64,
    /// Sum of cubed differences from the mean, over `scale^3`
    m3: f64,
    /// Sum of fourth powers of differences from the mean, over `scale^4`
    m4: f64,
}

const EXPONENT_BITS: u64 = 0x7ff0_0000_0000_0000;

/// Largest power of two not above `|value|`, clamped to the smallest normal
/// number, or zero for zero.
fn binade(value: f64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    f64::from_bits(value.to_bits() & EXPONENT_BITS).max(f64::MIN_POSITIVE)
}

impl Default for Moments {
    fn default() -> Self {
        Self::new()
    }
}

impl Moments {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            mean: 0.0,
            scale: 0.0,
            m2: 0.0,
            m3: 0.0,
            m4: 0.0,
        }
    }

    /// Add a value
    ///
    /// NaN and infinities are rejected and leave the state untouched.
    pub fn add(&mut self, value: f64) -> Result<(), NonFiniteSample> {
        if !value.is_finite() {
            return Err(NonFiniteSample(value));
        }

        if self.count == 0 {
            self.count = 1;
            self.min = value;
            self.max = value;
            self.sum = value;
            self.mean = value;
            self.scale = binade(value);
            return Ok(());
        }

        let n1 = self.count as f64;
        self.count += 1;
        let n = self.count as f64;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.sum += value;

        self.rescale(binade(value));
        if self.scale == 0.0 {
            // Every value so far is zero
            return Ok(());
        }

        // Dividing by a power of two is exact, so this is (value - mean) / scale
        let delta = value / self.scale - self.mean / self.scale;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        // delta^2 * (n-1)/n, never negative
        let term1 = delta * delta_n * n1;

        // m4 and m3 read the previous m2/m3, so update from the top down
        self.m4 += term1 * delta_n2 * (n * n - 3.0 * n + 3.0) + 6.0 * delta_n2 * self.m2
            - 4.0 * delta_n * self.m3;
        self.m3 += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        self.m2 += term1;
        self.mean += delta_n * self.scale;

        Ok(())
    }

    /// Get the number of values
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the minimum value
    pub fn min(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.min)
        }
    }

    /// Get the maximum value
    pub fn max(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.max)
        }
    }

    /// Get the sum of all values
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Get the running mean, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean)
        }
    }

    /// Central moment sums `(m2, m3, m4)`
    ///
    /// These are raw sums and saturate to infinity when the data spread is
    /// beyond `f64` range; [`Moments::finalize`] works on scaled sums instead.
    pub fn central_sums(&self) -> (f64, f64, f64) {
        let s = self.scale;
        (self.m2 * s * s, self.m3 * s * s * s, self.m4 * s * s * s * s)
    }

    /// Scale and the central moment sums expressed in units of it
    pub(crate) fn scaled_sums(&self) -> (f64, f64, f64, f64) {
        (self.scale, self.m2, self.m3, self.m4)
    }

    /// Widen the scale to `magnitude` if it is larger, converting the sums
    fn rescale(&mut self, magnitude: f64) {
        if magnitude <= self.scale {
            return;
        }
        if self.scale > 0.0 {
            // Powers of two: exact unless the old spread becomes negligible
            let r = self.scale / magnitude;
            let r2 = r * r;
            self.m2 *= r2;
            self.m3 *= r2 * r;
            self.m4 *= r2 * r2;
        }
        self.scale = magnitude;
    }

    /// Derive the final [`Statistics`]
    pub fn finalize(&self) -> Result<Statistics, InsufficientData> {
        Statistics::from_moments(self)
    }

    /// Merge with another accumulator using the pairwise update
    ///
    /// Uses Chan et al.'s combination for the mean and m2, extended to m3
    /// and m4 by Pébay.
    pub fn merge_moments(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }

        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let mut other = other.clone();
        other.rescale(self.scale);
        self.rescale(other.scale);
        let s = self.scale;

        let na = self.count as f64;
        let nb = other.count as f64;
        let n = na + nb;

        let delta = if s > 0.0 {
            other.mean / s - self.mean / s
        } else {
            0.0
        };
        let delta2 = delta * delta;
        let delta3 = delta * delta2;
        let delta4 = delta2 * delta2;

        let shift = delta * (nb / n) * s;
        let mean = if shift.is_finite() {
            self.mean + shift
        } else {
            self.mean * (na / n) + other.mean * (nb / n)
        };
        let m2 = self.m2 + other.m2 + delta2 * na * nb / n;
        let m3 = self.m3
            + other.m3
            + delta3 * na * nb * (na - nb) / (n * n)
            + 3.0 * delta * (na * other.m2 - nb * self.m2) / n;
        let m4 = self.m4
            + other.m4
            + delta4 * na * nb * (na * na - na * nb + nb * nb) / (n * n * n)
            + 6.0 * delta2 * (na * na * other.m2 + nb * nb * self.m2) / (n * n)
            + 4.0 * delta * (na * other.m3 - nb * self.m3) / n;

        self.count += other.count;
        self.sum += other.sum;
        self.mean = mean;
        self.m2 = m2;
        self.m3 = m3;
        self.m4 = m4;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

impl Accumulator for Moments {
    type Sample = f64;

    fn update(&mut self, sample: Self::Sample) -> Result<(), NonFiniteSample> {
        self.add(sample)
    }

    fn merge(&mut self, other: &Self) {
        self.merge_moments(other);
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moments_of(values: &[f64]) -> Moments {
        let mut moments = Moments::new();
        for &v in values {
            moments.add(v).unwrap();
        }
        moments
    }

    #[test]
    fn test_basic() {
        let moments = moments_of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert_eq!(moments.len(), 8);
        assert!((moments.mean().unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(moments.sum(), 40.0);
        assert_eq!(moments.min(), Some(2.0));
        assert_eq!(moments.max(), Some(9.0));

        // Deviations: -3, -1, -1, -1, 0, 0, 2, 4
        let (m2, m3, m4) = moments.central_sums();
        assert!((m2 - 32.0).abs() < 1e-9);
        assert!((m3 - 42.0).abs() < 1e-9);
        assert!((m4 - 356.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_value() {
        let moments = moments_of(&[42.0]);

        assert_eq!(moments.len(), 1);
        assert_eq!(moments.mean(), Some(42.0));
        assert_eq!(moments.central_sums(), (0.0, 0.0, 0.0));
        assert_eq!(moments.min(), Some(42.0));
        assert_eq!(moments.max(), Some(42.0));
    }

    #[test]
    fn test_empty() {
        let moments = Moments::new();

        assert!(moments.is_empty());
        assert_eq!(moments.mean(), None);
        assert_eq!(moments.min(), None);
        assert_eq!(moments.max(), None);
        assert_eq!(moments.sum(), 0.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut moments = moments_of(&[1.0, 2.0]);
        let before = moments.clone();

        assert_eq!(moments.add(f64::INFINITY), Err(NonFiniteSample(f64::INFINITY)));
        assert_eq!(
            moments.add(f64::NEG_INFINITY),
            Err(NonFiniteSample(f64::NEG_INFINITY))
        );
        assert!(moments.add(f64::NAN).is_err());

        assert_eq!(moments.len(), before.len());
        assert_eq!(moments.sum(), before.sum());
        assert_eq!(moments.central_sums(), before.central_sums());
        assert_eq!(moments.max(), Some(2.0));
    }

    #[test]
    fn test_merge() {
        let mut left = moments_of(&[1.0, 2.0, 3.0]);
        let right = moments_of(&[4.0, 5.0, 6.0, 10.0]);
        let whole = moments_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 10.0]);

        Accumulator::merge(&mut left, &right);

        assert_eq!(left.len(), 7);
        assert_eq!(left.min(), Some(1.0));
        assert_eq!(left.max(), Some(10.0));
        assert!((left.sum() - 31.0).abs() < 1e-12);

        let (a2, a3, a4) = left.central_sums();
        let (b2, b3, b4) = whole.central_sums();
        assert!((a2 - b2).abs() < 1e-9, "m2: {} vs {}", a2, b2);
        assert!((a3 - b3).abs() < 1e-9, "m3: {} vs {}", a3, b3);
        assert!((a4 - b4).abs() < 1e-9, "m4: {} vs {}", a4, b4);
    }

    #[test]
    fn test_merge_empty() {
        let mut moments = moments_of(&[1.0, 2.0]);
        moments.merge_moments(&Moments::new());
        assert_eq!(moments.len(), 2);
        assert_eq!(moments.mean(), Some(1.5));

        let mut empty = Moments::new();
        empty.merge_moments(&moments);
        assert_eq!(empty.len(), 2);
        assert_eq!(empty.central_sums(), moments.central_sums());
    }

    #[test]
    fn test_clear() {
        let mut moments = moments_of(&[1.0, 2.0, 3.0]);

        moments.clear();

        assert!(Accumulator::is_empty(&moments));
        assert_eq!(moments.min(), None);
        assert_eq!(moments.sum(), 0.0);
    }

    #[test]
    fn test_numerical_stability() {
        // Large offset: naive sums of powers would lose the spread entirely
        let base = 1e6;
        let mut moments = Moments::new();
        for i in 0..1000 {
            moments.add(base + (i % 10) as f64).unwrap();
        }

        let stats = moments.finalize().unwrap();
        assert!((stats.mean - (base + 4.5)).abs() < 1e-6);
        assert!(
            (stats.variance - 8.25).abs() < 1e-6,
            "variance: {}",
            stats.variance
        );
        assert!(stats.skewness.abs() < 1e-6);
        // Discrete uniform over 10 points
        assert!((stats.kurtosis - (-1.224_242_424_242_424_2)).abs() < 1e-6);
    }

    #[test]
    fn test_first_sample_seeds_mean() {
        // Squaring this overflows, so the first sample must not be squared
        let moments = moments_of(&[1e155]);

        assert_eq!(moments.mean(), Some(1e155));
        assert_eq!(moments.central_sums(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_extreme_magnitudes_stay_finite() {
        let moments = moments_of(&[1e200, -1e200, 5e199]);

        let (scale, m2, m3, m4) = moments.scaled_sums();
        assert!(scale > 0.0);
        assert!(m2.is_finite() && m3.is_finite() && m4.is_finite());
        // Raw sums are out of range
        assert_eq!(moments.central_sums().0, f64::INFINITY);
        assert!(moments.mean().unwrap().is_finite());
    }

    #[test]
    fn test_merge_across_scales() {
        let mut small = moments_of(&[1e-150, 2e-150, 3e-150]);
        let large = moments_of(&[1e150, -1e150]);
        let whole = moments_of(&[1e-150, 2e-150, 3e-150, 1e150, -1e150]);

        small.merge_moments(&large);

        let merged = small.finalize().unwrap();
        let sequential = whole.finalize().unwrap();
        assert_eq!(merged.count, 5);
        assert!((merged.standard_deviation / sequential.standard_deviation - 1.0).abs() < 1e-12);
        assert!((merged.kurtosis - sequential.kurtosis).abs() < 1e-9);
    }

    #[test]
    fn test_m2_never_negative() {
        let mut moments = Moments::new();
        for v in [0.1, 0.1, 0.1, 0.1 + 1e-17, 0.1] {
            moments.add(v).unwrap();
            assert!(moments.central_sums().0 >= 0.0);
        }
    }
}
