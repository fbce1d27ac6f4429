//! Timestamp display in the local time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a stored UTC timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the system
/// time zone. Plan `created_at`/`updated_at` are shown through this.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zoned = self.0.to_zoned(TimeZone::system());
        write!(f, "{}", zoned.strftime("%Y-%m-%d %H:%M:%S %Z"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_date_time_shape() {
        let ts: Timestamp = "2024-05-04T12:00:00Z".parse().expect("timestamp");
        let text = LocalDateTime(&ts).to_string();
        // Date part may shift with the zone, the layout does not.
        let (date, rest) = text.split_at(10);
        assert_eq!(date.len(), 10);
        assert_eq!(&rest[..1], " ");
        assert_eq!(rest[1..].split(' ').next().map(str::len), Some(8));
    }
}
