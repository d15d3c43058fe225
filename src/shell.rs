//! Interactive prompt loop around the loader and statistics.
//!
//! Asks for a city, month and day, re-asking until each answer is valid,
//! prints the four statistic groups with the time each took, then offers raw
//! rows five at a time and a restart.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{info, warn};

use crate::catalog::City;
use crate::filter::{Day, SELECTABLE_MONTHS, MONTHS, TripFilter, parse_day, parse_month};
use crate::loader::Loader;
use crate::output::{
    RULE, render_duration_stats, render_raw_page, render_station_stats, render_time_stats,
    render_user_stats,
};
use crate::raw::{DEFAULT_PAGE_SIZE, RawData};
use crate::record::RecordSet;
use crate::stats::{station_stats, time_stats, trip_duration_stats, user_stats};

const INVALID_INPUT: &str = "Invalid input !";

pub struct Shell<R, W> {
    loader: Loader,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(loader: Loader, input: R, output: W) -> Self {
        Self {
            loader,
            input,
            output,
        }
    }

    /// Runs queries until the user declines to restart or input ends.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        loop {
            let Some((city, filter)) = self.get_filters()? else {
                break;
            };

            match self.loader.load_filtered(city, &filter) {
                Ok(records) => self.show_stats(&records, &filter)?,
                Err(e) => {
                    warn!(error = %e, "Query failed");
                    writeln!(self.output, "Could not load {city} data: {e}")?;
                }
            }

            if !self.show_raw(city)? {
                break;
            }

            if self.ask_yes_no("\nWould you like to restart? Enter yes or no.")? != Some(true) {
                break;
            }
        }

        info!("Interactive session finished");
        Ok(())
    }

    fn get_filters(&mut self) -> Result<Option<(City, TripFilter)>> {
        let city_list = City::ALL.map(City::name).join(", ");
        let Some(city) = self.ask_until_valid(
            &format!("What city do you want to know about ({city_list})?"),
            |answer| answer.parse::<City>().ok(),
        )?
        else {
            return Ok(None);
        };

        let month_list = MONTHS[..SELECTABLE_MONTHS].join(", ");
        let Some(month) = self.ask_until_valid(
            &format!("What month do you want to know about (all, {month_list})?"),
            |answer| parse_month(answer).ok(),
        )?
        else {
            return Ok(None);
        };

        let first = Day::Monday.name().to_lowercase();
        let last = Day::Sunday.name().to_lowercase();
        let Some(day) = self.ask_until_valid(
            &format!("What day do you want to know about (all, {first}, ... {last})?"),
            |answer| parse_day(answer).ok(),
        )?
        else {
            return Ok(None);
        };

        writeln!(self.output, "{RULE}")?;
        Ok(Some((city, TripFilter { month, day })))
    }

    fn show_stats(&mut self, records: &RecordSet, filter: &TripFilter) -> Result<()> {
        if records.is_empty() {
            writeln!(self.output, "\nNo trips match the selected filters.\n{RULE}")?;
            return Ok(());
        }

        let started = Instant::now();
        let text = render_time_stats(&time_stats(records, filter)?);
        self.section("Calculating The Most Frequent Times of Travel...", &text, started)?;

        let started = Instant::now();
        let text = render_station_stats(&station_stats(records)?);
        self.section("Calculating The Most Popular Stations and Trip...", &text, started)?;

        let started = Instant::now();
        let text = render_duration_stats(&trip_duration_stats(records)?);
        self.section("Calculating Trip Duration...", &text, started)?;

        let started = Instant::now();
        let text = render_user_stats(&user_stats(records, records.city()));
        self.section("Calculating User Stats...", &text, started)?;

        Ok(())
    }

    fn section(&mut self, title: &str, body: &str, started: Instant) -> Result<()> {
        write!(
            self.output,
            "\n{title}\n\n{body}\nThis took {:.6} seconds.\n{RULE}\n",
            started.elapsed().as_secs_f64()
        )?;
        Ok(())
    }

    /// Pages through the unfiltered city file while the user keeps saying yes.
    ///
    /// Returns `false` if input ended.
    fn show_raw(&mut self, city: City) -> Result<bool> {
        let mut data: Option<RawData> = None;
        let mut offset = 0;

        loop {
            match self.ask_yes_no("\nWould you like to see raw data? Enter yes or no.")? {
                None => return Ok(false),
                Some(false) => return Ok(true),
                Some(true) => {}
            }

            if data.is_none() {
                let path = self.loader.catalog().path_for(city);
                match RawData::read(&path) {
                    Ok(read) => data = Some(read),
                    Err(e) => {
                        writeln!(self.output, "Could not read raw data: {e}")?;
                        return Ok(true);
                    }
                }
            }
            let Some(raw) = data.as_ref() else {
                return Ok(true);
            };

            let Some(page) = raw.page(offset, DEFAULT_PAGE_SIZE) else {
                writeln!(self.output, "No more rows to show.")?;
                return Ok(true);
            };
            offset += page.rows.len();
            let has_more = page.has_more;
            let text = render_raw_page(&page);
            self.output.write_all(text.as_bytes())?;

            if !has_more {
                writeln!(self.output, "No more rows to show.")?;
                return Ok(true);
            }
        }
    }

    /// Reads one trimmed, lowercased answer. `None` at end of input.
    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        writeln!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }

    fn ask_until_valid<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.prompt(question)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Some(value) => return Ok(Some(value)),
                None => writeln!(self.output, "{INVALID_INPUT}")?,
            }
        }
    }

    fn ask_yes_no(&mut self, question: &str) -> Result<Option<bool>> {
        Ok(self.prompt(question)?.map(|answer| answer == "yes"))
    }
}
