//! Builders shared by the statistic unit tests.

use chrono::NaiveDateTime;

use crate::catalog::City;
use crate::record::{RecordSet, Trip};

/// Trip starting at `start` (`%Y-%m-%d %H:%M:%S`).
pub fn trip(start: &str, from: &str, to: &str, duration: f64) -> Trip {
    let start_time = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
    Trip::new(start_time, from, to, duration)
}

/// Trip on an arbitrary date at the given hour.
pub fn trip_at_hour(hour: u32) -> Trip {
    trip(&format!("2017-03-06 {hour:02}:00:00"), "A", "B", 60.0)
}

pub fn record_set(city: City, trips: Vec<Trip>) -> RecordSet {
    RecordSet::new(city, trips)
}
