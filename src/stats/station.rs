use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::record::RecordSet;
use crate::stats::types::StationStats;
use crate::stats::utility::mode_first_seen;

/// Most used start station, end station and start/end pair.
///
/// The pair is counted per trip (`"<start> To <end>"`), so it is the most
/// frequent actual route rather than a combination of the two station modes.
/// Ties go to the value that appears first in `records`.
///
/// # Errors
///
/// [`BikeshareError::EmptyData`] if `records` is empty.
#[tracing::instrument(skip_all, fields(trips = records.len()))]
pub fn station_stats(records: &RecordSet) -> Result<StationStats> {
    let empty = || BikeshareError::EmptyData { statistic: "station stats" };

    let most_common_start_station =
        mode_first_seen(records.iter().map(|t| t.start_station.clone())).ok_or_else(empty)?;
    let most_common_end_station =
        mode_first_seen(records.iter().map(|t| t.end_station.clone())).ok_or_else(empty)?;
    let most_common_trip = mode_first_seen(records.iter().map(|t| t.route())).ok_or_else(empty)?;

    debug!(trip = %most_common_trip.value, "Station stats computed");
    Ok(StationStats {
        most_common_start_station,
        most_common_end_station,
        most_common_trip,
    })
}
