//! Number formatting shared by step messages and frames.

/// Format a quantity: whole numbers without decimals, others with two.
pub fn amount(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// Format nanoseconds as seconds with six decimals.
pub fn execution_time(nanoseconds: u64) -> String {
    format!("{:.6} s", nanoseconds as f64 / 1_000_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_amounts_drop_decimals() {
        assert_eq!(amount(17.0), "17");
        assert_eq!(amount(-3.0), "-3");
        assert_eq!(amount(12.5), "12.50");
    }

    #[test]
    fn execution_time_in_seconds() {
        assert_eq!(execution_time(1_500_000), "0.001500 s");
        assert_eq!(execution_time(0), "0.000000 s");
    }
}
