//! Replay navigation scenarios and print the reconciled stack after every
//! step.
//!
//! ```text
//! ROUTESTACK_LOG=debug routestack scenarios/tabs_scope.toml
//! ```

use navstack_test_support::{Scenario, run};
use std::path::Path;
use std::process::ExitCode;

const LOG_ENV: &str = "ROUTESTACK_LOG";

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "warn"))
        .format_timestamp(None)
        .init();
}

fn replay(path: &Path) -> Result<bool, navstack_test_support::ScenarioError> {
    let scenario = Scenario::load(path)?;
    let report = run(&scenario)?;
    print!("{report}");
    if let Err(err) = report.check() {
        eprintln!("{}: {err}", path.display());
        return Ok(false);
    }
    Ok(true)
}

fn main() -> ExitCode {
    init_logging();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: routestack <scenario.toml>...");
        return ExitCode::from(2);
    }

    let mut ok = true;
    for path in &paths {
        match replay(Path::new(path)) {
            Ok(passed) => ok &= passed,
            Err(err) => {
                eprintln!("{path}: {err}");
                ok = false;
            }
        }
    }
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
