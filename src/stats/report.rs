use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::City;
use crate::error::Result;
use crate::filter::TripFilter;
use crate::record::RecordSet;
use crate::stats::types::{DurationStats, StationStats, TimeStats, UserStats};
use crate::stats::{station_stats, time_stats, trip_duration_stats, user_stats};

/// All four statistic groups for one query.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub city: City,
    pub filter: TripFilter,
    pub trips: usize,
    pub time: TimeStats,
    pub station: StationStats,
    pub duration: DurationStats,
    pub user: UserStats,
}

impl Report {
    /// Computes every group over `records`.
    ///
    /// # Errors
    ///
    /// [`crate::error::BikeshareError::EmptyData`] when `records` is empty,
    /// since time, station and duration figures need at least one trip.
    pub fn compute(records: &RecordSet, filter: &TripFilter) -> Result<Self> {
        let report = Report {
            generated_at: Utc::now(),
            city: records.city(),
            filter: *filter,
            trips: records.len(),
            time: time_stats(records, filter)?,
            station: station_stats(records)?,
            duration: trip_duration_stats(records)?,
            user: user_stats(records, records.city()),
        };

        info!(city = %report.city, trips = report.trips, "Report computed");
        Ok(report)
    }
}

/// Flat one-row view of a [`Report`], suitable for CSV.
#[derive(Debug, Default, Serialize)]
pub struct ReportSummary {
    pub generated_at: Option<DateTime<Utc>>,
    pub city: String,
    pub month: String,
    pub day: String,
    pub trips: usize,

    pub most_common_month: Option<String>,
    pub most_common_day: Option<String>,
    pub most_common_hour: u32,

    pub most_common_start_station: String,
    pub most_common_end_station: String,
    pub most_common_trip: String,

    pub total_duration: f64,
    pub mean_duration: f64,

    pub subscribers: Option<usize>,
    pub customers: Option<usize>,
    pub earliest_birth_year: Option<i32>,
    pub latest_birth_year: Option<i32>,
    pub most_common_birth_year: Option<i32>,
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        let demographics = report.user.demographics.as_ref();

        ReportSummary {
            generated_at: Some(report.generated_at),
            city: report.city.to_string(),
            month: report.filter.month_label().to_string(),
            day: report.filter.day_label(),
            trips: report.trips,
            most_common_month: report.time.most_common_month.as_ref().map(|m| m.value.clone()),
            most_common_day: report.time.most_common_day.as_ref().map(|d| d.value.to_string()),
            most_common_hour: report.time.most_common_hour.value,
            most_common_start_station: report.station.most_common_start_station.value.clone(),
            most_common_end_station: report.station.most_common_end_station.value.clone(),
            most_common_trip: report.station.most_common_trip.value.clone(),
            total_duration: report.duration.total_duration,
            mean_duration: report.duration.mean_duration,
            subscribers: report.user.user_type_count("Subscriber"),
            customers: report.user.user_type_count("Customer"),
            earliest_birth_year: demographics.and_then(|d| d.earliest_birth_year),
            latest_birth_year: demographics.and_then(|d| d.latest_birth_year),
            most_common_birth_year: demographics
                .and_then(|d| d.most_common_birth_year.as_ref())
                .map(|m| m.value),
        }
    }
}
