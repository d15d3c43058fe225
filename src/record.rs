//! Trip records and the filtered record sets built from them.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::catalog::City;
use crate::filter::{Day, TripFilter};

/// A single trip with the calendar fields derived from its start time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    /// Seconds
    pub trip_duration: f64,
    pub user_type: Option<String>,

    // chicago and new york city only
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    // derived from start_time
    pub month: u32,
    pub day_of_week: Day,
    pub hour: u32,
}

impl Trip {
    pub fn new(
        start_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        trip_duration: f64,
    ) -> Self {
        Trip {
            start_time,
            start_station: start_station.into(),
            end_station: end_station.into(),
            trip_duration,
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            day_of_week: Day::from(start_time.weekday()),
            hour: start_time.hour(),
        }
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birth_year(mut self, birth_year: i32) -> Self {
        self.birth_year = Some(birth_year);
        self
    }

    /// Start and end station joined the way trips are reported: `"<start> To <end>"`.
    pub fn route(&self) -> String {
        format!("{} To {}", self.start_station, self.end_station)
    }
}

/// Trips of one city in source-file order, possibly narrowed by a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    city: City,
    trips: Vec<Trip>,
}

impl RecordSet {
    pub fn new(city: City, trips: Vec<Trip>) -> Self {
        Self { city, trips }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trip> {
        self.trips.iter()
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Trips matching `filter`, keeping their relative order. `self` is untouched.
    pub fn filter(&self, filter: &TripFilter) -> RecordSet {
        RecordSet {
            city: self.city,
            trips: self
                .trips
                .iter()
                .filter(|trip| filter.matches(trip))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Trip;
    type IntoIter = std::slice::Iter<'a, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_fields() {
        let trip = create_trip("2017-06-10 14:05:09", "A", "B");
        assert_eq!(trip.month, 6);
        assert_eq!(trip.day_of_week, Day::Saturday);
        assert_eq!(trip.hour, 14);
    }

    #[test]
    fn test_route() {
        let trip = create_trip("2017-06-10 14:05:09", "Canal St", "Clinton St");
        assert_eq!(trip.route(), "Canal St To Clinton St");
    }

    #[test]
    fn test_filter_preserves_order_and_source() {
        let set = RecordSet::new(
            City::Chicago,
            vec![
                create_trip("2017-03-06 08:00:00", "first", "x"),
                create_trip("2017-01-02 08:00:00", "skipped", "x"),
                create_trip("2017-03-13 08:00:00", "second", "x"),
            ],
        );

        let march = set.filter(&TripFilter::all().with_month(3));
        let names: Vec<_> = march.iter().map(|t| t.start_station.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(march.city(), City::Chicago);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let set = RecordSet::new(
            City::Washington,
            vec![
                create_trip("2017-03-06 08:00:00", "a", "x"),
                create_trip("2017-03-07 08:00:00", "b", "x"),
                create_trip("2017-04-03 08:00:00", "c", "x"),
            ],
        );
        let filter = TripFilter::all().with_month(3).with_day(Day::Monday);

        let once = set.filter(&filter);
        let twice = once.filter(&filter);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }

    fn create_trip(start: &str, from: &str, to: &str) -> Trip {
        let start_time = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
        Trip::new(start_time, from, to, 60.0)
    }
}
