/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Round to 2 decimal places (half away from zero)
pub fn round2(value: f64) -> f64 {
    crate::money::to_f64(crate::money::to_decimal(value))
}

/// Percentage of `part` in `whole`, rounded to 2 places; 0 when `whole` is 0
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(20.0), 20.0);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(2, 2), 100.0);
    }
}
