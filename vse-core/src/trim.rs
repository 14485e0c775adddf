//! Removal of zero padding from fixed-width sample arrays.
//!
//! The hardware fills unused slots of its fixed-size float arrays with zeros.
//! Only the boundary runs are removed; zeros between real values stay where
//! they are.

/// Magnitude at or below which a value counts as padding.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

#[inline]
fn is_padding(value: f32, tolerance: f64) -> bool {
    (value as f64).abs() <= tolerance
}

/// Returns the sub-slice left after dropping leading and trailing near-zero runs.
pub fn trimmed(values: &[f32], tolerance: f64) -> &[f32] {
    let Some(start) = values.iter().position(|&v| !is_padding(v, tolerance)) else {
        return &[];
    };
    // A non-padding value exists, so rposition always finds one.
    let end = values
        .iter()
        .rposition(|&v| !is_padding(v, tolerance))
        .unwrap_or(start);
    &values[start..=end]
}

/// Owned variant of [`trimmed`].
pub fn trim_zeros(values: &[f32], tolerance: f64) -> Vec<f32> {
    trimmed(values, tolerance).to_vec()
}
