//! Price presentation.
//!
//! Prices are kept as plain `f64` currency values in state. Rounding to two
//! decimals happens here, at presentation time only.

/// Render a price as `$X.XX`.
pub fn format_price(value: f64) -> String {
    // Avoid printing "-0.00" for tiny negative float noise.
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("${rounded:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_price(9.99), "$9.99");
        assert_eq!(format_price(19.98), "$19.98");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(3.0), "$3.00");
    }

    #[test]
    fn hides_float_noise() {
        assert_eq!(format_price(0.1 + 0.2), "$0.30");
        assert_eq!(format_price(-0.000_000_1), "$0.00");
    }
}
