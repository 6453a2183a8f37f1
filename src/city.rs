//! Fixed registry of the cities the explorer knows about.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// One of the three cities with published trip data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum City {
    Chicago,
    NewYork,
    Washington,
}

/// City name → CSV file name, in prompt order.
static CITY_DATA: &[(City, &str, &str)] = &[
    (City::Chicago, "Chicago", "chicago.csv"),
    (City::NewYork, "New York", "new_york_city.csv"),
    (City::Washington, "Washington", "washington.csv"),
];

impl City {
    /// Display name, as typed at the prompt.
    pub fn name(self) -> &'static str {
        Self::entry(self).1
    }

    /// File name of the city's trip data.
    pub fn file_name(self) -> &'static str {
        Self::entry(self).2
    }

    /// Path of the city's trip data inside `data_dir`.
    pub fn data_path(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }

    /// Resolves a city by name, ignoring ASCII case.
    pub fn lookup(name: &str) -> Option<City> {
        CITY_DATA
            .iter()
            .find(|(_, n, _)| n.eq_ignore_ascii_case(name))
            .map(|(city, _, _)| *city)
    }

    /// Resolves a city only when `name` is spelled exactly as registered.
    pub fn from_exact(name: &str) -> Option<City> {
        City::lookup(name).filter(|city| city.name() == name)
    }

    fn entry(self) -> &'static (City, &'static str, &'static str) {
        // CITY_DATA rows follow declaration order of the variants
        &CITY_DATA[self as usize]
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
