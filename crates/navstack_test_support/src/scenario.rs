use crate::ScenarioError;
use navstack::{DEFAULT_SEQ_KEY, Mode};
use platform::RouteDef;
use router_api::{DEFAULT_OUTLET, MatchedRecord};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub options: ScenarioOptions,
    pub routes: Vec<RouteSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioOptions {
    pub seq_key: String,
    pub mode: Mode,
    /// Host URL the session is loaded at.
    pub url: String,
    /// Run the initial sync before the first step.
    pub start: bool,
    /// Timestamp tokens from a counting clock instead of the wall clock.
    pub deterministic_clock: bool,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            seq_key: DEFAULT_SEQ_KEY.to_string(),
            mode: Mode::default(),
            url: "/".to_string(),
            start: true,
            deterministic_clock: true,
        }
    }
}

/// A route table row. Either `view` (a single record at `path`) or an
/// explicit `chain` of records, outermost first.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    pub path: String,
    pub name: Option<String>,
    pub view: Option<String>,
    #[serde(default)]
    pub chain: Vec<RecordSpec>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSpec {
    pub path: String,
    pub view: String,
}

impl RouteSpec {
    pub(crate) fn to_def(&self) -> Result<RouteDef, ScenarioError> {
        let chain: Vec<MatchedRecord> = match (&self.view, self.chain.is_empty()) {
            (_, false) => self
                .chain
                .iter()
                .map(|r| MatchedRecord::new(&r.path).with_component(DEFAULT_OUTLET, &r.view))
                .collect(),
            (Some(view), true) => {
                vec![MatchedRecord::new(&self.path).with_component(DEFAULT_OUTLET, view)]
            }
            (None, true) => return Err(ScenarioError::EmptyRoute(self.path.clone())),
        };
        let mut def = RouteDef::new(&self.path, chain);
        if let Some(name) = &self.name {
            def = def.with_name(name);
        }
        Ok(def)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Action {
    Push { to: String },
    PushNamed { name: String },
    Replace { to: String },
    Back,
    Forward,
    Go { delta: i32 },
    UserBack,
    UserForward,
    UserEnter { url: String },
    /// Drop the current entry's persisted state behind the session's back.
    ClearState,
}

impl Action {
    pub fn label(&self) -> String {
        match self {
            Action::Push { to } => format!("push {to}"),
            Action::PushNamed { name } => format!("push @{name}"),
            Action::Replace { to } => format!("replace {to}"),
            Action::Back => "back".into(),
            Action::Forward => "forward".into(),
            Action::Go { delta } => format!("go {delta}"),
            Action::UserBack => "user back".into(),
            Action::UserForward => "user forward".into(),
            Action::UserEnter { url } => format!("user enters {url}"),
            Action::ClearState => "clear state".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,
    /// Expected route paths on the stack after the step, oldest first.
    #[serde(default)]
    pub expect: Option<Vec<String>>,
    /// Record path whose mounted instance the scoped view is read for.
    #[serde(default)]
    pub scope: Option<String>,
    /// Expected default-outlet views of the scoped sub-stack.
    #[serde(default)]
    pub expect_scoped: Option<Vec<String>>,
    #[serde(default)]
    pub expect_error: bool,
}

impl Scenario {
    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scenario = Self::parse(&text)?;
        if scenario.name.is_empty() {
            scenario.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(scenario)
    }

    pub(crate) fn route_defs(&self) -> Result<Vec<RouteDef>, ScenarioError> {
        self.routes.iter().map(RouteSpec::to_def).collect()
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        for route in &self.routes {
            route.to_def()?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            if let Action::PushNamed { name } = &step.action {
                if !self.routes.iter().any(|r| r.name.as_ref() == Some(name)) {
                    return Err(ScenarioError::UnknownRoute {
                        step: i + 1,
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
