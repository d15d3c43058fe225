//! Month and day-of-week filters applied after loading a trip log.
//!
//! The interactive prompts only offer the first six months of the year, so
//! [`TripFilter::parse`] rejects anything past June. Month names for display
//! still cover the whole year since the derived month of a trip can be any
//! calendar month.

use chrono::Weekday;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{BikeshareError, Result};
use crate::record::Trip;

/// Keyword meaning "no filter" for both month and day.
pub const ALL: &str = "all";

/// Lowercase month names, January first.
pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Number of months, counted from January, that can be selected as a filter.
pub const SELECTABLE_MONTHS: usize = 6;

/// Name of a 1-based month index, or `None` outside 1..=12.
pub fn month_name(index: u32) -> Option<&'static str> {
    let idx = usize::try_from(index).ok()?.checked_sub(1)?;
    MONTHS.get(idx).copied()
}

/// Uppercases the first letter of every whitespace-separated word and
/// lowercases the rest: `"moNDay"` becomes `"Monday"`.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Day of the week a trip started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Capitalized name, e.g. `"Monday"`.
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = BikeshareError;

    /// Accepts any casing; the input is title-cased before matching.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = title_case(s);
        Day::ALL
            .into_iter()
            .find(|day| day.name() == wanted)
            .ok_or_else(|| BikeshareError::InvalidFilter(format!("unknown day `{}`", s.trim())))
    }
}

/// Optional month and day restriction. `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TripFilter {
    /// 1-based month index, always within the selectable months.
    pub month: Option<u32>,
    pub day: Option<Day>,
}

impl TripFilter {
    /// Filter that keeps every trip.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a filter from the strings supplied by the prompt or CLI.
    ///
    /// # Errors
    ///
    /// Returns [`BikeshareError::InvalidFilter`] when either value is neither
    /// `"all"` nor one of the selectable months / days.
    pub fn parse(month: &str, day: &str) -> Result<Self> {
        Ok(Self {
            month: parse_month(month)?,
            day: parse_day(day)?,
        })
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_day(mut self, day: Day) -> Self {
        self.day = Some(day);
        self
    }

    pub fn matches(&self, trip: &Trip) -> bool {
        if let Some(month) = self.month {
            if trip.month != month {
                return false;
            }
        }

        if let Some(day) = self.day {
            if trip.day_of_week != day {
                return false;
            }
        }

        true
    }

    /// Lowercase month name or `"all"`.
    pub fn month_label(&self) -> &'static str {
        self.month.and_then(month_name).unwrap_or(ALL)
    }

    /// Lowercase day name or `"all"`.
    pub fn day_label(&self) -> String {
        match self.day {
            Some(day) => day.name().to_lowercase(),
            None => ALL.to_string(),
        }
    }
}

/// Resolves a month name to its 1-based index within the selectable months.
pub fn parse_month(month: &str) -> Result<Option<u32>> {
    let wanted = month.trim().to_lowercase();
    if wanted == ALL {
        return Ok(None);
    }

    MONTHS[..SELECTABLE_MONTHS]
        .iter()
        .position(|name| *name == wanted)
        .map(|idx| Some(idx as u32 + 1))
        .ok_or_else(|| BikeshareError::InvalidFilter(format!("unknown month `{}`", month.trim())))
}

pub fn parse_day(day: &str) -> Result<Option<Day>> {
    if day.trim().eq_ignore_ascii_case(ALL) {
        return Ok(None);
    }
    day.parse().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), Some("january"));
        assert_eq!(month_name(12), Some("december"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("monday"), "Monday");
        assert_eq!(title_case("sUNDAY"), "Sunday");
        assert_eq!(title_case("new york city"), "New York City");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_parse_all() {
        assert_eq!(TripFilter::parse("all", "all").unwrap(), TripFilter::all());
        assert_eq!(TripFilter::parse("ALL", " All ").unwrap(), TripFilter::all());
    }

    #[test]
    fn test_parse_month_index() {
        assert_eq!(parse_month("january").unwrap(), Some(1));
        assert_eq!(parse_month("March").unwrap(), Some(3));
        assert_eq!(parse_month("june").unwrap(), Some(6));
    }

    #[test]
    fn test_parse_month_outside_selectable_range() {
        let err = parse_month("july").unwrap_err();
        assert!(matches!(err, BikeshareError::InvalidFilter(_)));
        assert!(parse_month("smarch").is_err());
    }

    #[test]
    fn test_parse_day_case_insensitive() {
        assert_eq!(parse_day("monday").unwrap(), Some(Day::Monday));
        assert_eq!(parse_day("SATURDAY").unwrap(), Some(Day::Saturday));
        assert!(matches!(parse_day("funday"), Err(BikeshareError::InvalidFilter(_))));
    }

    #[test]
    fn test_day_from_weekday() {
        // 2017-01-01 was a Sunday
        let date = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        assert_eq!(Day::from(chrono::Datelike::weekday(&date)), Day::Sunday);
    }

    #[test]
    fn test_matches() {
        let monday_in_march = create_trip("2017-03-06 08:15:00");
        let tuesday_in_march = create_trip("2017-03-07 08:15:00");
        let monday_in_january = create_trip("2017-01-02 08:15:00");

        let filter = TripFilter::all().with_month(3).with_day(Day::Monday);
        assert!(filter.matches(&monday_in_march));
        assert!(!filter.matches(&tuesday_in_march));
        assert!(!filter.matches(&monday_in_january));
        assert!(TripFilter::all().matches(&monday_in_january));
    }

    #[test]
    fn test_labels() {
        let filter = TripFilter::parse("april", "friday").unwrap();
        assert_eq!(filter.month_label(), "april");
        assert_eq!(filter.day_label(), "friday");
        assert_eq!(TripFilter::all().month_label(), "all");
        assert_eq!(TripFilter::all().day_label(), "all");
    }

    fn create_trip(start: &str) -> Trip {
        let start_time = chrono::NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
        Trip::new(start_time, "A", "B", 60.0)
    }
}
