//! Output formatting and persistence for query results.
//!
//! Supports plain-text rendering, JSON serialization, and CSV append of a
//! one-row [`ReportSummary`].

use anyhow::Result;
use std::fmt::Write as _;
use tracing::debug;

use crate::filter::title_case;
use crate::raw::RawPage;
use crate::stats::{
    DurationStats, Report, ReportSummary, StationStats, TimeStats, UserStats, ValueCount,
};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Separator printed between statistic groups.
pub const RULE: &str = "----------------------------------------";

pub fn render_time_stats(stats: &TimeStats) -> String {
    let mut out = String::new();
    if let Some(month) = &stats.most_common_month {
        let _ = writeln!(
            out,
            "The most common month is: {} ({} trips)",
            title_case(&month.value),
            month.count
        );
    }
    if let Some(day) = &stats.most_common_day {
        let _ = writeln!(out, "The most common day of week is: {} ({} trips)", day.value, day.count);
    }
    let _ = writeln!(
        out,
        "The most common start hour is: {} ({} trips)",
        stats.most_common_hour.value, stats.most_common_hour.count
    );
    out
}

pub fn render_station_stats(stats: &StationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Most commonly used start station: {} ({} trips)",
        stats.most_common_start_station.value, stats.most_common_start_station.count
    );
    let _ = writeln!(
        out,
        "Most commonly used end station: {} ({} trips)",
        stats.most_common_end_station.value, stats.most_common_end_station.count
    );
    let _ = writeln!(
        out,
        "Most frequent trip: {} ({} trips)",
        stats.most_common_trip.value, stats.most_common_trip.count
    );
    out
}

pub fn render_duration_stats(stats: &DurationStats) -> String {
    format!(
        "Total travel time: {} seconds\nMean travel time: {} seconds\n",
        stats.total_duration, stats.mean_duration
    )
}

pub fn render_user_stats(stats: &UserStats) -> String {
    let mut out = String::from("Counts of user types:\n");
    push_counts(&mut out, &stats.user_type_counts);

    if let Some(demo) = &stats.demographics {
        out.push_str("Counts of gender:\n");
        push_counts(&mut out, &demo.gender_counts);

        let _ = writeln!(out, "Earliest year of birth: {}", year_or_na(demo.earliest_birth_year));
        let _ = writeln!(out, "Most recent year of birth: {}", year_or_na(demo.latest_birth_year));
        let _ = writeln!(
            out,
            "Most common year of birth: {}",
            year_or_na(demo.most_common_birth_year.as_ref().map(|m| m.value))
        );
    }
    out
}

fn push_counts(out: &mut String, counts: &[ValueCount]) {
    if counts.is_empty() {
        out.push_str("  (none)\n");
    }
    for entry in counts {
        let _ = writeln!(out, "  {:<12} {}", entry.value, entry.count);
    }
}

fn year_or_na(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "n/a".to_string())
}

/// Full plain-text report, one section per statistic group.
pub fn render_report(report: &Report) -> String {
    let sections = [
        ("The Most Frequent Times of Travel", render_time_stats(&report.time)),
        ("The Most Popular Stations and Trip", render_station_stats(&report.station)),
        ("Trip Duration", render_duration_stats(&report.duration)),
        ("User Stats", render_user_stats(&report.user)),
    ];

    let mut out = format!(
        "{} trips for {} (month: {}, day: {})\n{RULE}\n",
        report.trips,
        title_case(report.city.name()),
        report.filter.month_label(),
        report.filter.day_label()
    );
    for (title, body) in sections {
        let _ = write!(out, "\n{title}\n\n{body}{RULE}\n");
    }
    out
}

/// Renders a page of raw rows as aligned columns with row indices.
pub fn render_raw_page(page: &RawPage<'_>) -> String {
    let mut widths: Vec<usize> = page.headers.iter().map(|h| h.chars().count()).collect();
    for row in page.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let index_width = (page.offset + page.rows.len()).to_string().len();

    let mut out = String::new();
    let _ = write!(out, "{:index_width$}", "");
    for (header, width) in page.headers.iter().zip(widths.iter().copied()) {
        let _ = write!(out, "  {header:<width$}");
    }
    out.push('\n');

    for (n, row) in page.rows.iter().enumerate() {
        let _ = write!(out, "{:>index_width$}", page.offset + n);
        for (cell, width) in row.iter().zip(widths.iter().copied()) {
            let _ = write!(out, "  {cell:<width$}");
        }
        out.push('\n');
    }
    out
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Serializes a report as pretty-printed JSON.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Appends a [`ReportSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, summary: &ReportSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}
