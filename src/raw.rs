//! Unfiltered rows of a trip log, shown a page at a time.

use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::loader::{csv_reader, open_source};

/// Rows shown per page unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Header and rows of a trip log, exactly as stored.
#[derive(Debug, Clone, Default)]
pub struct RawData {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A slice of [`RawData`] rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawPage<'a> {
    /// Index of the first row in the page
    pub offset: usize,
    pub headers: &'a [String],
    pub rows: &'a [Vec<String>],
    pub has_more: bool,
}

impl RawData {
    /// Reads the whole file at `path`, decompressing `.gz` files.
    pub fn read(path: &Path) -> Result<Self> {
        let data = Self::from_reader(open_source(path)?)?;
        debug!(path = %path.display(), rows = data.len(), "Raw rows read");
        Ok(data)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv_reader(reader);
        let headers = rdr.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Up to `size` rows starting at `offset`; `None` once `offset` is past the end.
    pub fn page(&self, offset: usize, size: usize) -> Option<RawPage<'_>> {
        if offset >= self.rows.len() || size == 0 {
            return None;
        }

        let end = offset.saturating_add(size).min(self.rows.len());
        Some(RawPage {
            offset,
            headers: &self.headers,
            rows: &self.rows[offset..end],
            has_more: end < self.rows.len(),
        })
    }

    /// Consecutive pages of `size` rows until the data runs out.
    pub fn pages(&self, size: usize) -> impl Iterator<Item = RawPage<'_>> + '_ {
        let mut offset = 0;
        std::iter::from_fn(move || {
            let page = self.page(offset, size)?;
            offset += page.rows.len();
            Some(page)
        })
    }
}
