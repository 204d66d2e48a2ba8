//! Time range handling for metadata requests

use chrono::{DateTime, Utc};

/// The dashboard time range a query is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Length of the range in milliseconds
    pub fn duration_millis(&self) -> i64 {
        (self.to - self.from).num_milliseconds()
    }

    /// Whole-second window covering this range
    pub fn window(&self) -> TimeWindow {
        normalize(self)
    }
}

/// `start`/`end` parameters in Unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// Query parameters in the order the backend documents them
    pub fn params(&self) -> [(&'static str, String); 2] {
        [
            ("start", self.start.to_string()),
            ("end", self.end.to_string()),
        ]
    }
}

/// Convert a range into whole seconds that fully cover it: the start is
/// floored and the end is ceiled.
pub fn normalize(range: &TimeRange) -> TimeWindow {
    TimeWindow {
        start: floor_seconds(&range.from),
        end: ceil_seconds(&range.to),
    }
}

fn floor_seconds(instant: &DateTime<Utc>) -> i64 {
    // chrono keeps sub-second nanos non-negative, so this is already a floor
    instant.timestamp()
}

fn ceil_seconds(instant: &DateTime<Utc>) -> i64 {
    if instant.timestamp_subsec_nanos() > 0 {
        instant.timestamp() + 1
    } else {
        instant.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_millis(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_start_floors_end_ceils() {
        let range = TimeRange::new(at_millis(10_900), at_millis(11_100));
        assert_eq!(normalize(&range), TimeWindow { start: 10, end: 12 });
    }

    #[test]
    fn test_whole_seconds_are_unchanged() {
        let range = TimeRange::new(at_millis(10_000), at_millis(20_000));
        assert_eq!(range.window(), TimeWindow { start: 10, end: 20 });
    }

    #[test]
    fn test_sub_second_window_covers_both_ends() {
        let range = TimeRange::new(at_millis(1_000), at_millis(1_700));
        assert_eq!(range.window(), TimeWindow { start: 1, end: 2 });
    }

    #[test]
    fn test_before_epoch() {
        let range = TimeRange::new(at_millis(-1_500), at_millis(-500));
        assert_eq!(range.window(), TimeWindow { start: -2, end: 0 });
    }

    #[test]
    fn test_params() {
        let window = TimeWindow { start: 10, end: 12 };
        assert_eq!(
            window.params(),
            [("start", "10".to_string()), ("end", "12".to_string())]
        );
    }

    #[test]
    fn test_duration_millis() {
        let range = TimeRange::new(at_millis(0), at_millis(3_600_000));
        assert_eq!(range.duration_millis(), 3_600_000);
    }
}
