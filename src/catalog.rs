//! Fixed catalog of supported cities and where their trip logs live.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::BikeshareError;

/// Environment variable naming the directory that holds the city CSV files.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

/// One of the three cities with a trip log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase name as typed by users, e.g. `"new york city"`.
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File name of the city's trip log inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Whether the trip log carries `Gender` and `Birth Year` columns.
    pub fn has_demographics(self) -> bool {
        matches!(self, City::Chicago | City::NewYorkCity)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|city| city.name() == wanted)
            .ok_or_else(|| BikeshareError::UnknownCity(s.trim().to_string()))
    }
}

/// Resolves cities to files under a data directory.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    data_dir: PathBuf,
}

impl CityCatalog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Uses `BIKESHARE_DATA_DIR` when set, otherwise the current directory.
    pub fn from_env() -> Self {
        let dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| ".".to_string());
        Self::new(dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the city's trip log.
    ///
    /// Falls back to a gzip-compressed `<file>.gz` when only that exists. If
    /// neither exists the plain path is returned and opening it reports the
    /// missing file.
    pub fn path_for(&self, city: City) -> PathBuf {
        let plain = self.data_dir.join(city.file_name());
        if plain.exists() {
            return plain;
        }

        let gzipped = self.data_dir.join(format!("{}.gz", city.file_name()));
        if gzipped.exists() {
            debug!(city = %city, path = %gzipped.display(), "Using compressed trip log");
            return gzipped;
        }

        plain
    }
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self::from_env()
    }
}
