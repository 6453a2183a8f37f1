//! Trip records and the in-memory trip table.

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use csv::StringRecord;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::filters::weekday_name;

pub const START_TIME: &str = "Start Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

/// Columns every city file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [START_TIME, TRIP_DURATION, START_STATION, END_STATION];

/// Timestamp layouts seen in the published trip files.
const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A single row as it appears in a city CSV file.
///
/// Unknown columns (the leading index column, `End Time`) are ignored.
#[derive(Debug, Deserialize)]
pub struct TripRecord {
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "Trip Duration")]
    pub trip_duration: f64,
    #[serde(rename = "Start Station")]
    pub start_station: String,
    #[serde(rename = "End Station")]
    pub end_station: String,
    #[serde(rename = "User Type", default)]
    pub user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Birth Year", default, deserialize_with = "birth_year")]
    pub birth_year: Option<i32>,
}

// Birth years are written as floats ("1992.0") in some files.
fn birth_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let year: Option<f64> = Option::deserialize(deserializer)?;
    match year {
        None => Ok(None),
        Some(y) if y.is_finite() && y >= i32::MIN as f64 && y <= i32::MAX as f64 => {
            Ok(Some(y as i32))
        }
        Some(y) => Err(D::Error::custom(format!("invalid birth year {y}"))),
    }
}

/// A trip with its calendar fields derived from the start timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub month: u32,
    pub day_of_week: Weekday,
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl Trip {
    /// Builds a trip from a raw record, parsing its start time.
    ///
    /// # Errors
    ///
    /// Returns an error if `Start Time` matches none of the known layouts.
    pub fn from_record(record: TripRecord, row: usize) -> Result<Self> {
        let Some(start_time) = parse_start_time(&record.start_time) else {
            bail!(
                "row {row}: unparsable {START_TIME} '{}'",
                record.start_time
            );
        };

        Ok(Trip {
            month: start_time.month(),
            day_of_week: start_time.weekday(),
            start_time,
            trip_duration: record.trip_duration,
            start_station: record.start_station,
            end_station: record.end_station,
            user_type: record.user_type.filter(|v| !v.is_empty()),
            gender: record.gender.filter(|v| !v.is_empty()),
            birth_year: record.birth_year,
        })
    }

    pub fn day_name(&self) -> &'static str {
        weekday_name(self.day_of_week)
    }

    /// Hour of day the trip started, 0–23.
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// The "start & end" label identifying the route taken.
    pub fn route(&self) -> String {
        format!("{} & {}", self.start_station, self.end_station)
    }
}

pub fn parse_start_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    START_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Which optional columns the source file provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSet {
    pub user_type: bool,
    pub gender: bool,
    pub birth_year: bool,
}

impl ColumnSet {
    pub fn from_headers(headers: &StringRecord) -> Self {
        let has = |name: &str| headers.iter().any(|h| h == name);
        ColumnSet {
            user_type: has(USER_TYPE),
            gender: has(GENDER),
            birth_year: has(BIRTH_YEAR),
        }
    }
}

/// Trips of one city in file order, plus the file's optional-column set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    pub columns: ColumnSet,
    pub trips: Vec<Trip>,
}

impl TripTable {
    pub fn new(columns: ColumnSet, trips: Vec<Trip>) -> Self {
        Self { columns, trips }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trip> {
        self.trips.iter()
    }

    /// Keeps only the trips accepted by `keep`, preserving order.
    pub fn retain<F: FnMut(&Trip) -> bool>(mut self, keep: F) -> Self {
        self.trips.retain(keep);
        self
    }
}
