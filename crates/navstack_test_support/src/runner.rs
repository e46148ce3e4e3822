use crate::scenario::{Action, Scenario};
use crate::{CountingClock, ScenarioError, diff_lines};
use core_types::NavKind;
use navstack::{NavStack, Options, StackEvent};
use platform::{MemoryHistory, TableRouter, ViewArena};
use router_api::{DEFAULT_OUTLET, Location, MatchedRecord, NavigationError, Router, ViewTree};
use std::fmt;
use std::sync::mpsc::Receiver;

type Session = NavStack<TableRouter, MemoryHistory>;

/// Stack state after one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// 1-based; 0 is the initial sync.
    pub index: usize,
    pub label: String,
    /// Route path per entry, oldest first.
    pub paths: Vec<String>,
    /// Full path (with tokens, in query mode) per entry.
    pub full_paths: Vec<String>,
    /// Reconciliations published during the step.
    pub kinds: Vec<NavKind>,
    pub scoped: Option<Vec<String>>,
    pub can_go_back: bool,
    pub error: Option<String>,
    pub mismatch: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Report {
    pub name: String,
    pub steps: Vec<StepReport>,
}

impl Report {
    pub fn mismatches(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.mismatch.is_some())
    }

    /// First failed expectation as an error.
    pub fn check(&self) -> Result<(), ScenarioError> {
        match self.mismatches().next() {
            Some(step) => Err(ScenarioError::Mismatch {
                step: step.index,
                label: step.label.clone(),
                detail: step.mismatch.clone().unwrap_or_default(),
            }),
            None => Ok(()),
        }
    }

    pub fn last(&self) -> Option<&StepReport> {
        self.steps.last()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            writeln!(f, "# {}", self.name)?;
        }
        for step in &self.steps {
            write!(
                f,
                "{:>3} {:<24} [{}]",
                step.index,
                step.label,
                step.paths.join(", ")
            )?;
            if let Some(scoped) = &step.scoped {
                write!(f, " scoped=[{}]", scoped.join(", "))?;
            }
            if step.can_go_back {
                write!(f, " <-")?;
            }
            if let Some(err) = &step.error {
                write!(f, " error: {err}")?;
            }
            if step.mismatch.is_some() {
                write!(f, " MISMATCH")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Replay `scenario` against the in-process platform.
///
/// Navigation failures are recorded on the step; only setup problems abort
/// the run.
pub fn run(scenario: &Scenario) -> Result<Report, ScenarioError> {
    let opts = &scenario.options;
    let router = TableRouter::new(scenario.route_defs()?);
    let mut options = Options::new(router).seq_key(opts.seq_key.as_str()).mode(opts.mode);
    if opts.deterministic_clock {
        options = options.clock(CountingClock::default());
    }
    let mut nav = NavStack::install(options, MemoryHistory::new(&opts.url))?;
    let events = nav.subscribe();
    let mut arena = ViewArena::new();
    let root = arena.spawn(None);

    let mut report = Report {
        name: scenario.name.clone(),
        steps: Vec::with_capacity(scenario.steps.len() + 1),
    };

    if opts.start {
        nav.start()?;
        pump(&mut nav).map_err(ScenarioError::Start)?;
        let mut out = snapshot(&nav, 0, "start".into(), None);
        out.kinds = drain_kinds(&events);
        report.steps.push(out);
    }

    for (i, step) in scenario.steps.iter().enumerate() {
        let index = i + 1;
        let label = step.action.label();
        log::debug!(target: "navstack.scenario", "step {index}: {label}");

        let error = apply(&mut nav, &step.action)
            .and_then(|()| pump(&mut nav))
            .err()
            .map(|e| e.to_string());
        let mut out = snapshot(&nav, index, label, error);
        out.kinds = drain_kinds(&events);

        if let Some(scope) = &step.scope {
            let current = nav.router().current_route().clone();
            arena.mount_route(&current, root);
            let record = MatchedRecord::new(scope.as_str());
            let scoped = match arena.mounted(&record, DEFAULT_OUTLET) {
                Some(instance) => nav
                    .view()
                    .scoped(instance, &arena)
                    .iter()
                    .map(|s| s.component.unwrap_or_default().to_string())
                    .collect(),
                None => Vec::new(),
            };
            out.scoped = Some(scoped);
        }

        out.mismatch = expectation_failure(step, &out);
        if let Some(detail) = &out.mismatch {
            log::warn!(target: "navstack.scenario", "step {index} ({}): {detail}", out.label);
        }
        report.steps.push(out);
    }

    Ok(report)
}

fn apply(nav: &mut Session, action: &Action) -> Result<(), NavigationError> {
    match action {
        Action::Push { to } => nav.push(Location::parse(to)?).map(drop),
        Action::PushNamed { name } => nav.push(Location::named(name.as_str())).map(drop),
        Action::Replace { to } => nav.replace(Location::parse(to)?).map(drop),
        Action::Back => {
            nav.back();
            Ok(())
        }
        Action::Forward => {
            nav.forward();
            Ok(())
        }
        Action::Go { delta } => {
            nav.go(*delta);
            Ok(())
        }
        Action::UserBack => {
            nav.host_mut().user_back();
            Ok(())
        }
        Action::UserForward => {
            nav.host_mut().user_forward();
            Ok(())
        }
        Action::UserEnter { url } => {
            nav.host_mut().user_enter_url(url);
            Ok(())
        }
        Action::ClearState => {
            nav.host_mut().clear_state();
            Ok(())
        }
    }
}

/// One event loop turn: deliver popstates, then deferred work.
fn pump(nav: &mut Session) -> Result<(), NavigationError> {
    while nav.host_mut().take_popstate() {
        nav.on_popstate()?;
    }
    nav.tick();
    Ok(())
}

fn drain_kinds(events: &Receiver<StackEvent>) -> Vec<NavKind> {
    events
        .try_iter()
        .filter_map(|e| match e {
            StackEvent::Reconciled { kind, .. } => Some(kind),
            StackEvent::StateSynthesized { .. } => None,
        })
        .collect()
}

fn snapshot(nav: &Session, index: usize, label: String, error: Option<String>) -> StepReport {
    let view = nav.view();
    let full = view.full();
    StepReport {
        index,
        label,
        paths: full.iter().map(|e| e.route.path.clone()).collect(),
        full_paths: full.iter().map(|e| e.route.full_path.clone()).collect(),
        kinds: Vec::new(),
        scoped: None,
        can_go_back: view.can_go_back(),
        error,
        mismatch: None,
    }
}

fn expectation_failure(step: &crate::Step, out: &StepReport) -> Option<String> {
    if step.expect_error != out.error.is_some() {
        return Some(match &out.error {
            Some(err) => format!("unexpected error: {err}"),
            None => "expected an error".to_string(),
        });
    }
    if let Some(expected) = &step.expect {
        if *expected != out.paths {
            return Some(diff_lines(expected, &out.paths));
        }
    }
    if let (Some(expected), Some(actual)) = (&step.expect_scoped, &out.scoped) {
        if expected != actual {
            return Some(format!("scoped: {}", diff_lines(expected, actual)));
        }
    }
    None
}
