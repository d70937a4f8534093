use chrono::{DateTime, Utc};

/// `MM:SS`, with minutes zero-padded and unbounded (`60:00`, `125:07`).
#[must_use]
pub fn format_countdown(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn countdown_is_zero_padded() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(9), "00:09");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(3599), "59:59");
    }

    #[test]
    fn countdown_minutes_are_unbounded() {
        assert_eq!(format_countdown(3600), "60:00");
        assert_eq!(format_countdown(7507), "125:07");
    }

    #[test]
    fn datetime_is_readable() {
        assert_eq!(format_datetime(fixed_now()), "2023-11-14 22:13:20 UTC");
    }
}
