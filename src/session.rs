//! The interactive explore/restart loop.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::filters::{collect_filters, read_answer};
use crate::loader::load_data;
use crate::report::run_reports;

const RESTART_PROMPT: &str = "\nWould you like to restart? Enter yes or no.";

/// Runs explore cycles until the user declines to restart.
///
/// Each cycle collects filters, reloads the city file and runs all report
/// passes. Load failures end the session with an error.
pub fn run_session<R: BufRead, W: Write>(input: &mut R, out: &mut W, data_dir: &Path) -> Result<()> {
    let mut round = 0;

    loop {
        round += 1;

        let selection = collect_filters(input, out)?;
        let table = load_data(data_dir, &selection)?;
        run_reports(&table, out)?;

        writeln!(out, "{RESTART_PROMPT}")?;
        out.flush()?;

        let answer = read_answer(input)?.unwrap_or_default();
        if !wants_restart(&answer) {
            info!(rounds = round, "Session finished");
            return Ok(());
        }
    }
}

/// Only "yes", in any letter case, restarts.
pub fn wants_restart(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_restart() {
        assert!(wants_restart("yes"));
        assert!(wants_restart("YES"));
        assert!(wants_restart("Yes"));
        assert!(!wants_restart("y"));
        assert!(!wants_restart("no"));
        assert!(!wants_restart(""));
        assert!(!wants_restart(" yes"));
    }
}
