//! Numeric input coercion for values arriving from a host UI.
//!
//! Hosts send plain JSON numbers. Garbage never reaches the state: it is
//! replaced by the last valid value and logged.

/// Epoch milliseconds from a raw host number.
///
/// Non-finite, negative or out-of-range values fall back to `last_valid`.
pub fn coerce_epoch_ms(raw: f64, last_valid: i64) -> i64 {
    if !raw.is_finite() || raw < 0.0 || raw >= i64::MAX as f64 {
        log::warn!("Invalid timestamp {} ms; keeping last valid value {}", raw, last_valid);
        return last_valid;
    }
    raw.round() as i64
}

/// Whole count in `1..=max` (periods, squad sizes) from a raw host number.
///
/// Anything non-finite or outside the range falls back to `fallback`.
pub fn coerce_count(raw: f64, fallback: u32, max: u32) -> u32 {
    let rounded = raw.round();
    if !raw.is_finite() || rounded < 1.0 || rounded > f64::from(max) {
        log::warn!("Invalid count {}; using {}", raw, fallback);
        return fallback;
    }
    rounded as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_coercion() {
        assert_eq!(coerce_epoch_ms(1_500.4, 0), 1_500);
        assert_eq!(coerce_epoch_ms(f64::NAN, 42), 42);
        assert_eq!(coerce_epoch_ms(f64::INFINITY, 42), 42);
        assert_eq!(coerce_epoch_ms(-1.0, 42), 42);
        assert_eq!(coerce_epoch_ms(0.0, 42), 0);
    }

    #[test]
    fn test_count_coercion() {
        assert_eq!(coerce_count(3.0, 2, 8), 3);
        assert_eq!(coerce_count(2.6, 2, 8), 3);
        assert_eq!(coerce_count(0.0, 2, 8), 2);
        assert_eq!(coerce_count(0.4, 2, 8), 2);
        assert_eq!(coerce_count(f64::NEG_INFINITY, 2, 8), 2);
        assert_eq!(coerce_count(-4.0, 2, 8), 2);
    }

    #[test]
    fn test_count_above_max_falls_back() {
        assert_eq!(coerce_count(8.0, 3, 8), 8);
        assert_eq!(coerce_count(9.0, 3, 8), 3);
        assert_eq!(coerce_count(20_000_000.0, 3, 8), 3);
        assert_eq!(coerce_count(f64::MAX, 3, 8), 3);
    }
}
