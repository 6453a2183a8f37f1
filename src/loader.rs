//! Loading a city's trip file and narrowing it to the selected month/day.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::filters::{DayFilter, MonthFilter, Selection};
use crate::trip::{ColumnSet, REQUIRED_COLUMNS, Trip, TripRecord, TripTable};

/// Loads the selected city's trips from `data_dir` and applies the
/// month/day filters.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a required column is
/// missing, or any row fails to parse. Nothing is returned on partial
/// success.
#[tracing::instrument(skip(data_dir), fields(city = %selection.city, month = %selection.month, day = %selection.day))]
pub fn load_data(data_dir: &Path, selection: &Selection) -> Result<TripTable> {
    let path = selection.city.data_path(data_dir);
    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;

    let table = read_trips(file).with_context(|| format!("loading {}", path.display()))?;
    let loaded = table.len();

    let table = apply_filters(table, selection.month, selection.day);
    info!(loaded, retained = table.len(), "Trip data loaded");

    Ok(table)
}

/// Reads every row of a trip CSV into a [`TripTable`].
pub fn read_trips<R: Read>(reader: R) -> Result<TripTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers().context("reading CSV headers")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!("CSV missing '{column}' column");
        }
    }
    let columns = ColumnSet::from_headers(&headers);
    debug!(?columns, "Optional columns detected");

    let mut trips = Vec::new();
    for (row, result) in rdr.deserialize().enumerate() {
        let record: TripRecord = result.with_context(|| format!("CSV row {row}"))?;
        trips.push(Trip::from_record(record, row)?);
    }

    Ok(TripTable::new(columns, trips))
}

/// Keeps the trips whose derived month and weekday match the filters.
pub fn apply_filters(table: TripTable, month: MonthFilter, day: DayFilter) -> TripTable {
    table.retain(|trip| month.matches(trip.month) && day.matches(trip.day_of_week))
}
