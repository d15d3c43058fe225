//! Reads a city's trip log and narrows it to the requested month and day.

use chrono::NaiveDateTime;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::catalog::{City, CityCatalog};
use crate::error::{BikeshareError, Result};
use crate::filter::TripFilter;
use crate::record::{RecordSet, Trip};

/// Columns every city's trip log must have.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Start Time",
    "Start Station",
    "End Station",
    "Trip Duration",
    "User Type",
];

/// Extra columns present for cities with rider demographics.
pub const DEMOGRAPHIC_COLUMNS: [&str; 2] = ["Gender", "Birth Year"];

/// Accepted `Start Time` layouts, tried in order.
static START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// One row as it appears in the CSV, before timestamps are parsed.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    // stored as floats, e.g. "1985.0"
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

impl RawTrip {
    fn into_trip(self, city: City, source: &Path, line: Option<u64>) -> Result<Trip> {
        let start_time = parse_start_time(&self.start_time).ok_or_else(|| {
            BikeshareError::malformed(
                source,
                line,
                format!("unparsable Start Time `{}`", self.start_time),
            )
        })?;

        let mut trip = Trip::new(
            start_time,
            self.start_station,
            self.end_station,
            self.trip_duration,
        );
        trip.user_type = self.user_type;

        if city.has_demographics() {
            trip.gender = self.gender;
            trip.birth_year = match self.birth_year {
                Some(year) if year.is_nan() => {
                    warn!(?line, "Treating NaN Birth Year as missing");
                    None
                }
                Some(year) if year.is_finite() && year.fract() == 0.0 => Some(year as i32),
                Some(year) => {
                    return Err(BikeshareError::malformed(
                        source,
                        line,
                        format!("Birth Year `{year}` is not a whole year"),
                    ));
                }
                None => None,
            };
        }

        Ok(trip)
    }
}

/// Parses a `Start Time` cell using the first matching layout.
pub fn parse_start_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Opens a trip log, transparently decompressing `.gz` files.
pub(crate) fn open_source(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

pub(crate) fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Reads every trip in `reader`, in order.
///
/// `source` is only used to label errors.
///
/// # Errors
///
/// [`BikeshareError::MalformedInput`] if a required column is missing, or a
/// row has the wrong number of fields, an unparsable `Start Time`, a
/// non-numeric field or a fractional `Birth Year`. Nothing is
/// returned for a partially readable file.
pub fn read_trips<R: Read>(reader: R, city: City, source: &Path) -> Result<Vec<Trip>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();

    let demographic: &[&str] = if city.has_demographics() {
        &DEMOGRAPHIC_COLUMNS
    } else {
        &[]
    };
    for column in REQUIRED_COLUMNS.iter().chain(demographic) {
        if !headers.iter().any(|h| h == *column) {
            return Err(BikeshareError::malformed(
                source,
                None,
                format!("missing column `{column}` for {city}"),
            ));
        }
    }

    let mut trips = Vec::new();
    let mut record = csv::StringRecord::new();

    while read_row(&mut rdr, &mut record, source)? {
        let line = record.position().map(|p| p.line());
        let raw: RawTrip = record
            .deserialize(Some(&headers))
            .map_err(|e| BikeshareError::malformed(source, line, e.to_string()))?;
        trips.push(raw.into_trip(city, source, line)?);
    }

    debug!(city = %city, trips = trips.len(), "Trip log parsed");
    Ok(trips)
}

/// Reads the next row, labelling ragged rows with their line number.
fn read_row<R: Read>(
    rdr: &mut csv::Reader<R>,
    record: &mut csv::StringRecord,
    source: &Path,
) -> Result<bool> {
    rdr.read_record(record).map_err(|e| {
        if e.is_io_error() {
            return BikeshareError::Csv(e);
        }
        let line = e.position().map(|p| p.line());
        BikeshareError::malformed(source, line, e.to_string())
    })
}

/// Reads the trip log at `path`.
pub fn read_trips_from_path(path: &Path, city: City) -> Result<Vec<Trip>> {
    let reader = open_source(path)?;
    read_trips(reader, city, path)
}

/// Loads record sets for the cities in a [`CityCatalog`].
#[derive(Debug, Clone)]
pub struct Loader {
    catalog: CityCatalog,
}

impl Loader {
    pub fn new(catalog: CityCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    /// Loads `city` and keeps the trips matching `month` and `day`.
    ///
    /// Each argument is either `"all"` or a name (case-insensitive): a month
    /// from January to June, or a day of the week.
    ///
    /// # Errors
    ///
    /// [`BikeshareError::UnknownCity`] / [`BikeshareError::InvalidFilter`] for
    /// values outside the catalog, [`BikeshareError::MalformedInput`] for a bad
    /// source file, and IO errors if the file cannot be opened.
    #[tracing::instrument(skip(self))]
    pub fn load(&self, city: &str, month: &str, day: &str) -> Result<RecordSet> {
        let city: City = city.parse()?;
        let filter = TripFilter::parse(month, day)?;
        self.load_filtered(city, &filter)
    }

    /// Loads `city` and applies an already-parsed filter.
    #[tracing::instrument(skip(self, city), fields(city = %city))]
    pub fn load_filtered(&self, city: City, filter: &TripFilter) -> Result<RecordSet> {
        let all = self.load_all(city)?;
        let filtered = all.filter(filter);

        info!(
            total = all.len(),
            kept = filtered.len(),
            month = filter.month_label(),
            day = %filter.day_label(),
            "Trip log loaded"
        );
        Ok(filtered)
    }

    /// Loads every trip of `city` without filtering.
    pub fn load_all(&self, city: City) -> Result<RecordSet> {
        let path = self.catalog.path_for(city);
        debug!(path = %path.display(), "Reading trip log");
        let trips = read_trips_from_path(&path, city)?;
        Ok(RecordSet::new(city, trips))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Day;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-03-06 08:15:00,2017-03-06 08:30:00,900,Canal St,Clinton St,Subscriber,Male,1985.0
2,2017-01-02 17:05:00,2017-01-02 17:20:00,600,Clinton St,Canal St,Customer,,
3,2017-03-07 09:45:00,2017-03-07 10:05:00,1200,Canal St,Lake St,Subscriber,Female,1990.0
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
0,2017-06-21 08:36:34,2017-06-21 08:44:43,489.5,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn test_read_trips_chicago() {
        let trips = read_trips(CHICAGO.as_bytes(), City::Chicago, Path::new("chicago.csv")).unwrap();

        assert_eq!(trips.len(), 3);
        assert_eq!(trips[0].start_station, "Canal St");
        assert_eq!(trips[0].trip_duration, 900.0);
        assert_eq!(trips[0].gender.as_deref(), Some("Male"));
        assert_eq!(trips[0].birth_year, Some(1985));
        assert_eq!(trips[0].month, 3);
        assert_eq!(trips[0].day_of_week, Day::Monday);
        assert_eq!(trips[0].hour, 8);

        assert_eq!(trips[1].user_type.as_deref(), Some("Customer"));
        assert_eq!(trips[1].gender, None);
        assert_eq!(trips[1].birth_year, None);
    }

    #[test]
    fn test_read_trips_washington_has_no_demographics() {
        let trips =
            read_trips(WASHINGTON.as_bytes(), City::Washington, Path::new("washington.csv")).unwrap();

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].trip_duration, 489.5);
        assert_eq!(trips[0].gender, None);
        assert_eq!(trips[0].birth_year, None);
    }

    #[test]
    fn test_missing_demographic_column_for_chicago() {
        let err = read_trips(WASHINGTON.as_bytes(), City::Chicago, Path::new("chicago.csv")).unwrap_err();

        match err {
            BikeshareError::MalformedInput { line, reason, .. } => {
                assert_eq!(line, None);
                assert!(reason.contains("Gender"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unparsable_start_time_fails_whole_load() {
        let data = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-03-06 08:15:00,900,A,B,Subscriber
not a date,900,A,B,Subscriber
";
        let err = read_trips(data.as_bytes(), City::Washington, Path::new("washington.csv")).unwrap_err();

        match err {
            BikeshareError::MalformedInput { line, reason, .. } => {
                assert_eq!(line, Some(3));
                assert!(reason.contains("not a date"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_duration_is_malformed() {
        let data = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-03-06 08:15:00,soon,A,B,Subscriber
";
        let err = read_trips(data.as_bytes(), City::Washington, Path::new("washington.csv")).unwrap_err();
        assert!(matches!(err, BikeshareError::MalformedInput { line: Some(2), .. }));
    }

    #[test]
    fn test_fractional_birth_year_is_malformed() {
        let data = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-03-06 08:15:00,900,A,B,Subscriber,Male,1985.0
2017-03-06 09:15:00,900,A,B,Subscriber,Male,1985.6
";
        let err = read_trips(data.as_bytes(), City::Chicago, Path::new("chicago.csv")).unwrap_err();

        match err {
            BikeshareError::MalformedInput { line, reason, .. } => {
                assert_eq!(line, Some(3));
                assert!(reason.contains("1985.6"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_whole_birth_year_is_kept_exactly() {
        let data = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-03-06 08:15:00,900,A,B,Subscriber,Male,1985.0
2017-03-06 09:15:00,900,A,B,Subscriber,Female,1999
";
        let trips = read_trips(data.as_bytes(), City::NewYorkCity, Path::new("nyc.csv")).unwrap();
        assert_eq!(trips[0].birth_year, Some(1985));
        assert_eq!(trips[1].birth_year, Some(1999));
    }

    #[test]
    fn test_row_with_wrong_field_count_is_malformed() {
        let data = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-03-06 08:15:00,900,A,Subscriber
";
        let err = read_trips(data.as_bytes(), City::Washington, Path::new("washington.csv")).unwrap_err();
        assert!(matches!(err, BikeshareError::MalformedInput { line: Some(2), .. }));
    }

    #[test]
    fn test_parse_start_time_formats() {
        assert!(parse_start_time("2017-03-06 08:15:00").is_some());
        assert!(parse_start_time("2017-03-06 08:15:00.250").is_some());
        assert!(parse_start_time("2017-03-06T08:15:00").is_some());
        assert!(parse_start_time("3/6/2017 08:15").is_some());
        assert!(parse_start_time("yesterday").is_none());
    }

    #[test]
    fn test_loader_filters_month_and_day() {
        let dir = temp_dir("bikeshare_stats_test_loader_filter");
        fs::write(dir.join("chicago.csv"), CHICAGO).unwrap();

        let loader = Loader::new(CityCatalog::new(&dir));
        let march = loader.load("chicago", "march", "all").unwrap();
        assert_eq!(march.len(), 2);
        assert!(march.iter().all(|t| t.month == 3));

        let march_mondays = loader.load("Chicago", "March", "MONDAY").unwrap();
        assert_eq!(march_mondays.len(), 1);
        assert_eq!(march_mondays.trips()[0].hour, 8);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_loader_rejects_invalid_filter() {
        let loader = Loader::new(CityCatalog::new("/nonexistent"));
        let err = loader.load("chicago", "july", "all").unwrap_err();
        assert!(matches!(err, BikeshareError::InvalidFilter(_)));

        let err = loader.load("chicago", "all", "someday").unwrap_err();
        assert!(matches!(err, BikeshareError::InvalidFilter(_)));
    }

    #[test]
    fn test_loader_missing_file_is_io_error() {
        let loader = Loader::new(CityCatalog::new("/nonexistent"));
        let err = loader.load("washington", "all", "all").unwrap_err();
        assert!(matches!(err, BikeshareError::Io(_)));
    }

    #[test]
    fn test_loader_reads_gzip_log() {
        let dir = temp_dir("bikeshare_stats_test_loader_gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(WASHINGTON.as_bytes()).unwrap();
        fs::write(dir.join("washington.csv.gz"), encoder.finish().unwrap()).unwrap();

        let loader = Loader::new(CityCatalog::new(&dir));
        let set = loader.load_all(City::Washington).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.trips()[0].start_station, "14th & Belmont St NW");

        fs::remove_dir_all(&dir).unwrap();
    }

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
