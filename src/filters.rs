//! Interactive collection of the (city, month, day) selection.
//!
//! Every answer must match one of a fixed set of spellings exactly. Invalid
//! answers are rejected with a retry message and the same question is asked
//! again; nothing here is fatal except losing standard input.

use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use chrono::{Month, Weekday};
use serde::Serialize;
use tracing::{debug, info};

use crate::city::City;
use crate::output::RULE;

const CITY_PROMPT: &str = "Choose city: Chicago, New York or Washington?";
const MONTH_PROMPT: &str =
    "Choose month: January, February, March, April, May, June or \"all\" to apply no filter:";
const DAY_PROMPT: &str = "Choose day: Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday or \"all\" to apply no filter:";

/// Printed once per rejected answer.
pub const RETRY_MESSAGE: &str = "Wrong input! Please try again.";

/// Months with published data, in calendar order.
static MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

static WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Sun, "Sunday"),
    (Weekday::Mon, "Monday"),
    (Weekday::Tue, "Tuesday"),
    (Weekday::Wed, "Wednesday"),
    (Weekday::Thu, "Thursday"),
    (Weekday::Fri, "Friday"),
    (Weekday::Sat, "Saturday"),
];

/// Full English name of a weekday ("Monday", not chrono's "Mon").
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_sunday() as usize].1
}

/// Month restriction: a single month between January and June, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonthFilter {
    All,
    Only(Month),
}

impl MonthFilter {
    pub fn parse(input: &str) -> Option<Self> {
        if input == "all" {
            return Some(MonthFilter::All);
        }
        MONTHS
            .iter()
            .find(|m| m.name() == input)
            .map(|m| MonthFilter::Only(*m))
    }

    /// 1-based month number, `None` for "all".
    pub fn number(self) -> Option<u32> {
        match self {
            MonthFilter::All => None,
            MonthFilter::Only(m) => Some(m.number_from_month()),
        }
    }

    pub fn matches(self, month: u32) -> bool {
        self.number().is_none_or(|n| n == month)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(m) => f.write_str(m.name()),
        }
    }
}

/// Weekday restriction, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayFilter {
    All,
    Only(Weekday),
}

impl DayFilter {
    pub fn parse(input: &str) -> Option<Self> {
        if input == "all" {
            return Some(DayFilter::All);
        }
        WEEKDAYS
            .iter()
            .find(|(_, name)| *name == input)
            .map(|(day, _)| DayFilter::Only(*day))
    }

    pub fn matches(self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(d) => d == day,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(d) => f.write_str(weekday_name(*d)),
        }
    }
}

/// The filter triple chosen for one pass through the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

/// Asks for city, month and day, re-prompting until each answer is valid.
///
/// # Errors
///
/// Fails if reading or writing the console fails, or if `input` reaches EOF
/// before all three answers are valid.
pub fn collect_filters<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Selection> {
    writeln!(out, "Hello! Let's explore some US bikeshare data!")?;
    writeln!(
        out,
        "Plese let us know for which city, month and day you want to see data for."
    )?;

    let city = prompt_until_valid(input, out, CITY_PROMPT, City::from_exact)?;
    let month = prompt_until_valid(input, out, MONTH_PROMPT, MonthFilter::parse)?;
    let day = prompt_until_valid(input, out, DAY_PROMPT, DayFilter::parse)?;

    writeln!(out, "{RULE}")?;

    let selection = Selection { city, month, day };
    debug!(city = %city, month = %month, day = %day, "Filters collected");
    Ok(selection)
}

fn prompt_until_valid<R, W, T, F>(input: &mut R, out: &mut W, question: &str, parse: F) -> Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Option<T>,
{
    loop {
        writeln!(out, "{question}")?;
        out.flush()?;

        let Some(answer) = read_answer(input)? else {
            bail!("input closed before a valid answer was given");
        };

        if let Some(value) = parse(&answer) {
            return Ok(value);
        }

        info!(answer = %answer, "Rejected input");
        writeln!(out, "{RETRY_MESSAGE}")?;
    }
}

/// Reads one line, dropping its line terminator. `None` on EOF.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// badly encoded answer simply fails validation.
pub fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let read = input
        .read_until(b'\n', &mut buf)
        .context("reading from standard input")?;
    if read == 0 {
        return Ok(None);
    }

    let line = buf
        .strip_suffix(b"\n")
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .unwrap_or(&buf[..]);
    Ok(Some(String::from_utf8_lossy(line).into_owned()))
}
