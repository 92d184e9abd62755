//! Extraction of one numeric sample from a raw field

use crate::error::InvalidValue;

/// Parse the raw target field of one row into a finite sample
///
/// Surrounding whitespace is ignored. NaN and infinities parse as numbers
/// but are rejected here so that only finite values reach the accumulator.
///
/// ```
/// use colstats::error::InvalidValue;
/// use colstats::source::extract_sample;
///
/// assert_eq!(extract_sample(Some(" 12.5 ")), Ok(12.5));
/// assert_eq!(extract_sample(Some("")), Err(InvalidValue::Empty));
/// assert_eq!(extract_sample(None), Err(InvalidValue::Missing));
/// ```
pub fn extract_sample(raw: Option<&str>) -> Result<f64, InvalidValue> {
    let text = raw.ok_or(InvalidValue::Missing)?.trim();
    if text.is_empty() {
        return Err(InvalidValue::Empty);
    }

    let value: f64 = text
        .parse()
        .map_err(|_| InvalidValue::NotANumber(text.to_string()))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidValue::NonFinite(text.to_string()))
    }
}
