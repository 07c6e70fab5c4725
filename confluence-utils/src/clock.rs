use chrono::{DateTime, TimeZone, Utc};

/// Wall clock in unix milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert unix milliseconds for display, `None` if out of range.
pub fn millis_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_monotonic_enough() {
        let t1 = now_millis();
        let t2 = now_millis();
        assert!(t2 >= t1);
        assert!(t1 > 1_600_000_000_000);
    }

    #[test]
    fn test_millis_to_datetime() {
        let dt = millis_to_datetime(1_000).unwrap();
        assert_eq!("1970-01-01 00:00:01", dt.format("%Y-%m-%d %H:%M:%S").to_string());
    }
}
