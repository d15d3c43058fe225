use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::record::RecordSet;
use crate::stats::types::DurationStats;

/// Total and mean trip duration in seconds, summed in record order.
///
/// # Errors
///
/// [`BikeshareError::EmptyData`] if `records` is empty.
#[tracing::instrument(skip_all, fields(trips = records.len()))]
pub fn trip_duration_stats(records: &RecordSet) -> Result<DurationStats> {
    if records.is_empty() {
        return Err(BikeshareError::EmptyData { statistic: "trip duration stats" });
    }

    let trips = records.len();
    let total_duration: f64 = records.iter().map(|t| t.trip_duration).sum();
    let mean_duration = total_duration / trips as f64;

    debug!(total_duration, mean_duration, "Trip duration stats computed");
    Ok(DurationStats {
        trips,
        total_duration,
        mean_duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::City;
    use crate::stats::test_utils::{record_set, trip};

    #[test]
    fn test_total_and_mean() {
        let set = record_set(
            City::Chicago,
            vec![
                trip("2017-03-06 08:00:00", "A", "B", 900.0),
                trip("2017-03-06 08:00:00", "A", "B", 600.0),
                trip("2017-03-06 08:00:00", "A", "B", 300.0),
            ],
        );
        let stats = trip_duration_stats(&set).unwrap();

        assert_eq!(stats.trips, 3);
        assert_eq!(stats.total_duration, 1800.0);
        assert_eq!(stats.mean_duration, 600.0);
    }

    #[test]
    fn test_mean_is_total_over_count() {
        let set = record_set(
            City::Washington,
            vec![
                trip("2017-03-06 08:00:00", "A", "B", 489.066),
                trip("2017-03-06 08:00:00", "A", "B", 402.549),
                trip("2017-03-06 08:00:00", "A", "B", 637.251),
            ],
        );
        let stats = trip_duration_stats(&set).unwrap();
        assert_eq!(stats.mean_duration, stats.total_duration / 3.0);
    }

    #[test]
    fn test_empty_records() {
        let set = record_set(City::Chicago, vec![]);
        assert!(trip_duration_stats(&set).unwrap_err().is_empty_data());
    }
}
