//! Result types produced by the statistic groups.

use serde::Serialize;

use crate::filter::Day;

/// The most frequent value of a column and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mode<T> {
    pub value: T,
    pub count: usize,
}

/// One entry of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Most frequent times of travel.
///
/// Month and day are only computed when the query did not already fix them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// Lowercase month name, e.g. `"march"`.
    pub most_common_month: Option<Mode<String>>,
    pub most_common_day: Option<Mode<Day>>,
    pub most_common_hour: Mode<u32>,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub most_common_start_station: Mode<String>,
    pub most_common_end_station: Mode<String>,
    /// `"<start> To <end>"`
    pub most_common_trip: Mode<String>,
}

/// Total and average trip duration, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    pub total_duration: f64,
    pub mean_duration: f64,
}

/// Rider breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_type_counts: Vec<ValueCount>,
    /// `None` for cities whose logs have no gender / birth year columns.
    pub demographics: Option<Demographics>,
}

impl UserStats {
    /// Count for one user type, if it occurred.
    pub fn user_type_count(&self, user_type: &str) -> Option<usize> {
        find_count(&self.user_type_counts, user_type)
    }
}

/// Gender and birth-year figures, available for chicago and new york city.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Demographics {
    pub gender_counts: Vec<ValueCount>,
    pub earliest_birth_year: Option<i32>,
    pub latest_birth_year: Option<i32>,
    pub most_common_birth_year: Option<Mode<i32>>,
}

impl Demographics {
    pub fn gender_count(&self, gender: &str) -> Option<usize> {
        find_count(&self.gender_counts, gender)
    }
}

fn find_count(counts: &[ValueCount], value: &str) -> Option<usize> {
    counts.iter().find(|c| c.value == value).map(|c| c.count)
}
