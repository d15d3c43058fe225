use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::filter::{TripFilter, month_name};
use crate::record::RecordSet;
use crate::stats::types::{Mode, TimeStats};
use crate::stats::utility::{mode_lowest, mode_lowest_by_key};

/// Most frequent month, day of week and start hour.
///
/// The month is only reported when `filter` does not fix a month, and the day
/// only when it does not fix a day. Ties go to the lowest month or hour, and
/// to the alphabetically first day name.
///
/// # Errors
///
/// [`BikeshareError::EmptyData`] if `records` is empty.
#[tracing::instrument(skip_all, fields(trips = records.len()))]
pub fn time_stats(records: &RecordSet, filter: &TripFilter) -> Result<TimeStats> {
    let most_common_hour = mode_lowest(records.iter().map(|t| t.hour))
        .ok_or(BikeshareError::EmptyData { statistic: "time stats" })?;

    let most_common_month = if filter.month.is_none() {
        mode_lowest(records.iter().map(|t| t.month)).map(|m| Mode {
            value: month_name(m.value).unwrap_or("unknown").to_string(),
            count: m.count,
        })
    } else {
        None
    };

    let most_common_day = if filter.day.is_none() {
        mode_lowest_by_key(records.iter().map(|t| t.day_of_week), |d| d.name())
    } else {
        None
    };

    debug!(hour = most_common_hour.value, "Time stats computed");
    Ok(TimeStats {
        most_common_month,
        most_common_day,
        most_common_hour,
    })
}
