//! Descriptive statistics over a loaded [`RecordSet`](crate::record::RecordSet).
//!
//! Four independent groups: times of travel, station popularity, trip
//! duration and rider demographics. Each is a pure function of the record set
//! and returns a structured result; printing is left to [`crate::output`].
//! [`Report`] bundles all four for one query.

pub mod duration;
pub mod report;
pub mod station;
pub mod time;
pub mod types;
pub mod user;
pub mod utility;

#[cfg(test)]
pub(crate) mod test_utils;

pub use duration::trip_duration_stats;
pub use report::{Report, ReportSummary};
pub use station::station_stats;
pub use time::time_stats;
pub use types::{Demographics, DurationStats, Mode, StationStats, TimeStats, UserStats, ValueCount};
pub use user::user_stats;
