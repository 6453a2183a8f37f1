//! The four statistics passes run over a filtered trip table.
//!
//! Each pass is a [`Report`]: it computes a summary from the table and knows
//! how to print itself. [`run_pass`] wraps a pass with its heading, the
//! elapsed-time line and the closing rule; [`run_reports`] runs all four in
//! their fixed order (time, station, duration, user).

use std::fmt;
use std::io::Write;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::output::{RULE, log_summary};
use crate::stats::{mean, mode, sum, value_counts};
use crate::trip::TripTable;

/// Shown in place of a mode when the filtered table has no rows.
pub const NO_DATA_SELECTION: &str = "No data available for this selection.";
/// Shown under a user statistic whose column the city file lacks.
pub const NO_DATA_MONTH: &str = "No data available for this month.";

/// A statistics pass over a trip table.
pub trait Report: fmt::Display + Serialize + Sized {
    /// Heading printed before the pass starts.
    const TITLE: &'static str;

    fn compute(table: &TripTable) -> Self;
}

/// Computes one pass, prints it, and prints how long the computation took.
pub fn run_pass<R: Report, W: Write>(table: &TripTable, out: &mut W) -> Result<R> {
    writeln!(out, "\n{}\n", R::TITLE)?;
    let started = Instant::now();

    let report = R::compute(table);
    write!(out, "{report}")?;

    let elapsed = started.elapsed();
    log_summary(R::TITLE, &report);

    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{RULE}")?;
    Ok(report)
}

/// Runs the time, station, duration and user passes in that order.
pub fn run_reports<W: Write>(table: &TripTable, out: &mut W) -> Result<()> {
    run_pass::<TimeStats, _>(table, out)?;
    run_pass::<StationStats, _>(table, out)?;
    run_pass::<DurationStats, _>(table, out)?;
    run_pass::<UserStats, _>(table, out)?;
    Ok(())
}

fn or_no_data<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NO_DATA_SELECTION.to_string(),
    }
}

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub popular_month: Option<u32>,
    pub popular_day: Option<&'static str>,
    pub popular_hour: Option<u32>,
}

impl Report for TimeStats {
    const TITLE: &'static str = "Calculating The Most Frequent Times of Travel...";

    fn compute(table: &TripTable) -> Self {
        TimeStats {
            popular_month: mode(table.iter().map(|t| t.month)),
            popular_day: mode(table.iter().map(|t| t.day_name())),
            popular_hour: mode(table.iter().map(|t| t.start_hour())),
        }
    }
}

impl fmt::Display for TimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Most popular month: {}", or_no_data(&self.popular_month))?;
        writeln!(f, "Most popular day of week: {}", or_no_data(&self.popular_day))?;
        writeln!(f, "Most popular hour: {}", or_no_data(&self.popular_hour))
    }
}

/// Most popular stations and route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub popular_start: Option<String>,
    pub popular_end: Option<String>,
    pub popular_route: Option<String>,
}

impl Report for StationStats {
    const TITLE: &'static str = "Calculating The Most Popular Stations and Trip...";

    fn compute(table: &TripTable) -> Self {
        StationStats {
            popular_start: mode(table.iter().map(|t| t.start_station.as_str())).map(str::to_owned),
            popular_end: mode(table.iter().map(|t| t.end_station.as_str())).map(str::to_owned),
            popular_route: mode(table.iter().map(|t| t.route())),
        }
    }
}

impl fmt::Display for StationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Most popular start station: {}", or_no_data(&self.popular_start))?;
        writeln!(f, "Most popular end station: {}", or_no_data(&self.popular_end))?;
        writeln!(
            f,
            "Most popular combination of start and end station: {}",
            or_no_data(&self.popular_route)
        )
    }
}

/// Total and mean trip duration, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total: f64,
    pub mean: Option<f64>,
}

impl Report for DurationStats {
    const TITLE: &'static str = "Calculating Trip Duration...";

    fn compute(table: &TripTable) -> Self {
        let durations: Vec<f64> = table.iter().map(|t| t.trip_duration).collect();
        DurationStats {
            total: sum(&durations),
            mean: mean(&durations),
        }
    }
}

impl fmt::Display for DurationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total travel time: {}", self.total)?;
        writeln!(f, "Mean travel time: {}", or_no_data(&self.mean))
    }
}

/// User demographics.
///
/// A `None` breakdown means the city file has no such column. Birth-year
/// figures are `None` when the column is absent or holds no values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Option<Vec<(String, usize)>>,
    pub genders: Option<Vec<(String, usize)>>,
    pub earliest_birth_year: Option<i32>,
    pub latest_birth_year: Option<i32>,
    pub common_birth_year: Option<i32>,
}

impl Report for UserStats {
    const TITLE: &'static str = "Calculating User Stats...";

    fn compute(table: &TripTable) -> Self {
        let columns = table.columns;

        let user_types = columns.user_type.then(|| {
            owned_counts(table.iter().filter_map(|t| t.user_type.as_deref()))
        });
        let genders = columns
            .gender
            .then(|| owned_counts(table.iter().filter_map(|t| t.gender.as_deref())));

        let years: Vec<i32> = if columns.birth_year {
            table.iter().filter_map(|t| t.birth_year).collect()
        } else {
            Vec::new()
        };

        UserStats {
            user_types,
            genders,
            earliest_birth_year: years.iter().min().copied(),
            latest_birth_year: years.iter().max().copied(),
            common_birth_year: mode(years.iter().copied()),
        }
    }
}

fn owned_counts<'a, I: Iterator<Item = &'a str>>(values: I) -> Vec<(String, usize)> {
    value_counts(values)
        .into_iter()
        .map(|(v, c)| (v.to_string(), c))
        .collect()
}

fn write_counts(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    missing_heading: &str,
    counts: &Option<Vec<(String, usize)>>,
) -> fmt::Result {
    match counts {
        Some(counts) => {
            writeln!(f, "{heading}")?;
            for (value, count) in counts {
                writeln!(f, "  {value}: {count}")?;
            }
            Ok(())
        }
        None => writeln!(f, "{missing_heading}\n{NO_DATA_MONTH}"),
    }
}

fn write_year(f: &mut fmt::Formatter<'_>, label: &str, year: Option<i32>) -> fmt::Result {
    match year {
        Some(y) => writeln!(f, "\n{label} {y}"),
        None => writeln!(f, "\n{label}\n{NO_DATA_MONTH}"),
    }
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_counts(f, "User type count:", "User Types:", &self.user_types)?;
        writeln!(f)?;
        write_counts(f, "Gender count:", "Gender Types:", &self.genders)?;
        write_year(f, "Earliest year of birth:", self.earliest_birth_year)?;
        write_year(f, "Most recent year of birth:", self.latest_birth_year)?;
        write_year(f, "Most common year of birth:", self.common_birth_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_trips;
    use crate::trip::ColumnSet;
    use std::io::Cursor;

    // Jan 1 2017 Sunday, Jan 2 Monday, Feb 6 Monday
    const FULL: &str = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-01-01 09:07:57,60,A St,B St,Subscriber,Male,1989.0
2017-01-02 09:30:00,120,B St,A St,Customer,,
2017-02-06 18:30:00,180,A St,B St,Subscriber,Female,1975.0
";

    const NO_DEMOGRAPHICS: &str = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-06-01 08:00:00,60,X,Y,Customer
2017-06-01 08:10:00,60,Y,X,Subscriber
2017-06-02 08:20:00,60,X,Y,Customer
";

    fn table(csv: &str) -> TripTable {
        read_trips(Cursor::new(csv.to_string())).unwrap()
    }

    #[test]
    fn test_time_stats() {
        let stats = TimeStats::compute(&table(FULL));
        assert_eq!(stats.popular_month, Some(1));
        assert_eq!(stats.popular_day, Some("Monday"));
        assert_eq!(stats.popular_hour, Some(9));
    }

    #[test]
    fn test_station_stats_route_label() {
        let t = table(FULL);
        let stats = StationStats::compute(&t);

        assert_eq!(stats.popular_start.as_deref(), Some("A St"));
        assert_eq!(stats.popular_end.as_deref(), Some("B St"));
        assert_eq!(stats.popular_route.as_deref(), Some("A St & B St"));

        let routes: Vec<String> = t.iter().map(|trip| trip.route()).collect();
        assert!(t
            .iter()
            .zip(&routes)
            .all(|(trip, r)| *r == format!("{} & {}", trip.start_station, trip.end_station)));
        assert_eq!(stats.popular_route, mode(routes));
    }

    #[test]
    fn test_station_tie_goes_to_first_in_file_order() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station
2017-06-01 08:00:00,60,Y,X
2017-06-01 08:10:00,60,X,Y
2017-06-02 08:20:00,60,X,Y
2017-06-02 08:30:00,60,Y,X
";
        let stats = StationStats::compute(&table(csv));
        assert_eq!(stats.popular_start.as_deref(), Some("Y"));
        assert_eq!(stats.popular_end.as_deref(), Some("X"));
        assert_eq!(stats.popular_route.as_deref(), Some("Y & X"));
    }

    #[test]
    fn test_duration_stats() {
        let stats = DurationStats::compute(&table(FULL));
        assert_eq!(stats.total, 360.0);
        assert_eq!(stats.mean, Some(120.0));
    }

    #[test]
    fn test_user_stats_full() {
        let stats = UserStats::compute(&table(FULL));

        assert_eq!(
            stats.user_types,
            Some(vec![("Subscriber".to_string(), 2), ("Customer".to_string(), 1)])
        );
        assert_eq!(
            stats.genders,
            Some(vec![("Male".to_string(), 1), ("Female".to_string(), 1)])
        );
        assert_eq!(stats.earliest_birth_year, Some(1975));
        assert_eq!(stats.latest_birth_year, Some(1989));
        assert_eq!(stats.common_birth_year, Some(1989));
    }

    #[test]
    fn test_user_stats_without_demographic_columns() {
        let stats = UserStats::compute(&table(NO_DEMOGRAPHICS));

        assert!(stats.user_types.is_some());
        assert_eq!(stats.genders, None);
        assert_eq!(stats.earliest_birth_year, None);
        assert_eq!(stats.latest_birth_year, None);
        assert_eq!(stats.common_birth_year, None);

        let text = stats.to_string();
        assert!(text.contains("User type count:"));
        assert!(text.contains("Gender Types:"));
        assert_eq!(text.matches(NO_DATA_MONTH).count(), 4);
    }

    #[test]
    fn test_empty_table_does_not_panic() {
        let empty = TripTable::new(
            ColumnSet {
                user_type: true,
                gender: true,
                birth_year: true,
            },
            Vec::new(),
        );

        let time = TimeStats::compute(&empty);
        assert_eq!(time.popular_month, None);
        assert!(time.to_string().contains(NO_DATA_SELECTION));

        let stations = StationStats::compute(&empty);
        assert_eq!(stations.popular_route, None);

        let duration = DurationStats::compute(&empty);
        assert_eq!(duration.total, 0.0);
        assert_eq!(duration.mean, None);

        let users = UserStats::compute(&empty);
        assert_eq!(users.user_types, Some(Vec::new()));
        assert_eq!(users.common_birth_year, None);
    }

    #[test]
    fn test_run_pass_prints_heading_and_elapsed() {
        let mut out = Vec::new();
        let stats: DurationStats = run_pass(&table(FULL), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(stats.total, 360.0);
        assert!(text.starts_with("\nCalculating Trip Duration...\n"));
        assert!(text.contains("Total travel time: 360\n"));
        assert!(text.contains("Mean travel time: 120\n"));
        assert!(text.contains("This took "));
        assert!(text.ends_with(&format!("{RULE}\n")));
    }

    #[test]
    fn test_run_reports_fixed_order() {
        let mut out = Vec::new();
        run_reports(&table(FULL), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let positions: Vec<usize> = [
            TimeStats::TITLE,
            StationStats::TITLE,
            DurationStats::TITLE,
            UserStats::TITLE,
        ]
        .iter()
        .map(|title| text.find(title).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(text.matches("This took ").count(), 4);
    }
}
