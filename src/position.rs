//! Placement of numeric values on a categorical (bar-indexed) axis.
//!
//! A count plot draws the sorted unique values of a column at evenly spaced
//! slots `0, 1, .., n-1` even when the values themselves are unevenly spaced.
//! [`position`] maps a raw value such as the mean onto that slot space.

/// Fractional slot index of `value` among the ascending `unique_vals`.
///
/// Exact matches return their index, values between two entries are
/// interpolated linearly between the two slots, and values outside the
/// range clamp to the first or last slot. Returns `None` for an empty list
/// or a NaN value.
pub fn position(value: f64, unique_vals: &[f64]) -> Option<f64> {
    if unique_vals.is_empty() || value.is_nan() {
        return None;
    }

    if let Some(i) = unique_vals.iter().position(|&v| v == value) {
        return Some(i as f64);
    }

    // First entry strictly greater than the value.
    let next = unique_vals.partition_point(|&v| v <= value);
    match next {
        0 => Some(0.0),
        i if i == unique_vals.len() => Some((unique_vals.len() - 1) as f64),
        i => {
            let prev = unique_vals[i - 1];
            let ratio = (value - prev) / (unique_vals[i] - prev);
            Some((i - 1) as f64 + ratio)
        }
    }
}
