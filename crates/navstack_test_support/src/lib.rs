//! Scripted navigation scenarios for the navigation stack.
//!
//! A scenario is a TOML file with a route table, session options and a list
//! of steps; [`run`] replays it against the in-process platform and reports
//! the stack after every step.

mod runner;
mod scenario;

pub use runner::{Report, StepReport, run};
pub use scenario::{Action, RecordSpec, RouteSpec, Scenario, ScenarioOptions, Step};

use navstack::{Clock, ConfigError};
use router_api::NavigationError;
use std::cell::Cell;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("route {0:?} has neither a view nor a chain")]
    EmptyRoute(String),
    #[error("step {step} names unknown route {name:?}")]
    UnknownRoute { step: usize, name: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("initial sync failed: {0}")]
    Start(#[from] NavigationError),
    #[error("step {step} ({label}): {detail}")]
    Mismatch {
        step: usize,
        label: String,
        detail: String,
    },
}

/// Clock that advances by one millisecond per reading, for reproducible
/// timestamp tokens.
#[derive(Debug, Default)]
pub struct CountingClock(Cell<u64>);

impl Clock for CountingClock {
    fn now_millis(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }
}

/// Line diff for expectation failures: first mismatch with two lines of
/// context on each side.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;

    fn line(lines: &[String], i: usize) -> &str {
        lines.get(i).map(String::as_str).unwrap_or("<missing>")
    }

    let max = expected.len().max(actual.len());
    let mut out = String::new();

    match (0..max).find(|&i| line(expected, i) != line(actual, i)) {
        Some(i) => {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(max);
            let _ = writeln!(&mut out, "first mismatch at entry {}:", i + 1);
            for idx in start..end {
                let marker = if idx == i { ">" } else { " " };
                let _ = writeln!(&mut out, "{marker} {:>3}  expected: {}", idx + 1, line(expected, idx));
                let _ = writeln!(&mut out, "{marker} {:>3}    actual: {}", idx + 1, line(actual, idx));
            }
        }
        None => {
            let _ = writeln!(&mut out, "identical ({} entries)", max);
        }
    }
    out
}
