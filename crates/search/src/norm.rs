//! Field-length norm: matches in short fields count for more.

/// `round3(1 / tokens^(0.5 * weight))`, where tokens are runs of non-space
/// characters. Returns `None` for fields with no tokens (blank fields are not
/// indexed).
pub fn field_norm(value: &str, weight: f64) -> Option<f64> {
    let tokens = value.split(' ').filter(|t| !t.is_empty()).count();
    if tokens == 0 {
        return None;
    }

    let raw = 1.0 / (tokens as f64).powf(0.5 * weight);
    Some((raw * 1000.0).round() / 1000.0)
}
