use tracing::debug;

use crate::catalog::City;
use crate::record::RecordSet;
use crate::stats::types::{Demographics, UserStats, ValueCount};
use crate::stats::utility::{mode_lowest, value_counts};

/// User type counts, plus gender counts and birth-year figures for cities
/// that record them.
///
/// Never fails: an empty set gives empty counts and absent birth years.
/// Missing cells are left out of every figure.
#[tracing::instrument(skip_all, fields(city = %city, trips = records.len()))]
pub fn user_stats(records: &RecordSet, city: City) -> UserStats {
    let user_type_counts = counts_of(records.iter().filter_map(|t| t.user_type.as_deref()));

    let demographics = if city.has_demographics() {
        Some(demographics(records))
    } else {
        None
    };

    debug!(user_types = user_type_counts.len(), "User stats computed");
    UserStats {
        user_type_counts,
        demographics,
    }
}

fn demographics(records: &RecordSet) -> Demographics {
    let gender_counts = counts_of(records.iter().filter_map(|t| t.gender.as_deref()));
    let birth_years: Vec<i32> = records.iter().filter_map(|t| t.birth_year).collect();

    Demographics {
        gender_counts,
        earliest_birth_year: birth_years.iter().copied().min(),
        latest_birth_year: birth_years.iter().copied().max(),
        most_common_birth_year: mode_lowest(birth_years),
    }
}

fn counts_of<'a>(values: impl Iterator<Item = &'a str>) -> Vec<ValueCount> {
    value_counts(values)
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect()
}
