use router_api::{
    Guard, HistoryState, Location, MatchedRecord, NavigationError, NavigationHooks, Params, Route,
    Router,
};

const DEFAULT_MAX_REDIRECTS: usize = 10;
const CATCH_ALL: &str = "*";
const STATE_KEY_FIELD: &str = "key";

/// One row of the route table.
///
/// `path` segments starting with `:` capture params; `*` matches any path.
/// `chain` is the matched record list the route resolves to, outermost first.
#[derive(Clone, Debug)]
pub struct RouteDef {
    pub path: String,
    pub name: Option<String>,
    pub chain: Vec<MatchedRecord>,
}

impl RouteDef {
    pub fn new(path: impl Into<String>, chain: Vec<MatchedRecord>) -> Self {
        Self {
            path: path.into(),
            name: None,
            chain,
        }
    }

    /// Single record rendering `view` in the default outlet.
    pub fn leaf(path: impl Into<String>, view: impl Into<String>) -> Self {
        let path = path.into();
        let record = MatchedRecord::new(path.clone()).with_component(router_api::DEFAULT_OUTLET, view);
        Self::new(path, vec![record])
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn capture(&self, path: &str) -> Option<Params> {
        if self.path == CATCH_ALL {
            return Some(Params::new());
        }
        let mut pattern = segments(&self.path);
        let mut actual = segments(path);
        let mut params = Params::new();
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(p), Some(a)) => {
                    if let Some(key) = p.strip_prefix(':') {
                        params.insert(key.to_string(), a.to_string());
                    } else if p != a {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }

    fn fill(&self, params: &Params) -> Option<String> {
        let mut out = String::new();
        for segment in segments(&self.path) {
            out.push('/');
            match segment.strip_prefix(':') {
                Some(key) => out.push_str(params.get(key)?),
                None => out.push_str(segment),
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Some(out)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HistoryOp {
    Push,
    Replace,
    /// Follow the host: it already moved.
    Keep,
}

/// Synchronous router over a fixed route table.
///
/// Navigations complete before `push`/`replace` return, so hooks observe the
/// same call order a browser router produces for an uncontended navigation.
#[derive(Debug)]
pub struct TableRouter {
    routes: Vec<RouteDef>,
    current: Route,
    next_key: u64,
    max_redirects: usize,
}

impl TableRouter {
    pub fn new(routes: Vec<RouteDef>) -> Self {
        Self {
            routes,
            current: Route::start(),
            next_key: 0,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    fn navigate(
        &mut self,
        location: Location,
        hooks: &mut dyn NavigationHooks,
        op: HistoryOp,
        hops: usize,
    ) -> Result<Route, NavigationError> {
        if hops > self.max_redirects {
            return Err(NavigationError::RedirectLoop(location.full_path()));
        }
        let to = self.resolve(&location)?;
        let from = self.current.clone();
        if op != HistoryOp::Keep && to.full_path == from.full_path {
            return Err(NavigationError::Duplicated { to: to.full_path });
        }

        match hooks.before_each(&to, &from) {
            Guard::Proceed => {}
            Guard::Redirect(next) => {
                let next_op = if next.replace {
                    HistoryOp::Replace
                } else {
                    HistoryOp::Push
                };
                log::debug!(
                    target: "platform.router",
                    "redirect {} -> {} ({next_op:?})",
                    to.full_path,
                    next.full_path()
                );
                let landed = self.navigate(next, hooks, next_op, hops + 1)?;
                return Err(NavigationError::Redirected {
                    from: from.full_path,
                    to: landed.full_path,
                });
            }
            Guard::Abort => {
                return Err(NavigationError::Aborted {
                    from: from.full_path,
                    to: to.full_path,
                });
            }
        }

        self.current = to.clone();
        hooks.after_each(&to, &from);

        match op {
            HistoryOp::Push => {
                let state = HistoryState::new().with(STATE_KEY_FIELD, self.take_key());
                hooks.history().push_state(state, "", Some(&to.full_path));
            }
            HistoryOp::Replace => {
                let key = self.take_key();
                let history = hooks.history();
                let state = history
                    .state()
                    .cloned()
                    .unwrap_or_default()
                    .with(STATE_KEY_FIELD, key);
                history.replace_state(state, "", Some(&to.full_path));
            }
            HistoryOp::Keep => {}
        }
        Ok(to)
    }

    fn take_key(&mut self) -> String {
        self.next_key += 1;
        self.next_key.to_string()
    }
}

impl Router for TableRouter {
    fn current_route(&self) -> &Route {
        &self.current
    }

    fn resolve(&self, location: &Location) -> Result<Route, NavigationError> {
        let by_name = location.name.as_deref().filter(|_| location.path.is_empty());
        let (def, path, params) = match by_name {
            Some(name) => {
                let def = self
                    .routes
                    .iter()
                    .find(|d| d.name.as_deref() == Some(name))
                    .ok_or_else(|| NavigationError::NoMatch(name.to_string()))?;
                let path = def
                    .fill(&location.params)
                    .ok_or_else(|| NavigationError::NoMatch(name.to_string()))?;
                (def, path, location.params.clone())
            }
            None => {
                let (def, params) = self
                    .routes
                    .iter()
                    .find_map(|d| d.capture(&location.path).map(|p| (d, p)))
                    .ok_or_else(|| NavigationError::NoMatch(location.full_path()))?;
                (def, location.path.clone(), params)
            }
        };

        Ok(
            Route::new(path, location.query.clone(), location.hash.clone(), def.chain.clone())
                .with_name(def.name.clone())
                .with_params(params),
        )
    }

    fn push(
        &mut self,
        location: Location,
        hooks: &mut dyn NavigationHooks,
    ) -> Result<Route, NavigationError> {
        self.navigate(location, hooks, HistoryOp::Push, 0)
    }

    fn replace(
        &mut self,
        location: Location,
        hooks: &mut dyn NavigationHooks,
    ) -> Result<Route, NavigationError> {
        self.navigate(location, hooks, HistoryOp::Replace, 0)
    }

    fn sync_with_host(
        &mut self,
        hooks: &mut dyn NavigationHooks,
    ) -> Result<Route, NavigationError> {
        let location = Location::parse(hooks.history().location())?;
        self.navigate(location, hooks, HistoryOp::Keep, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryHistory;
    use router_api::HostHistory;

    #[derive(Default)]
    struct Recorder {
        history: Option<MemoryHistory>,
        calls: Vec<String>,
        redirect: Option<Location>,
        /// Redirect every navigation to a fresh path.
        bounce: bool,
        abort: bool,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                history: Some(MemoryHistory::new("/")),
                ..Self::default()
            }
        }

        fn host(&self) -> &MemoryHistory {
            self.history.as_ref().unwrap()
        }
    }

    impl NavigationHooks for Recorder {
        fn before_each(&mut self, to: &Route, _from: &Route) -> Guard {
            self.calls.push(format!("before {}", to.full_path));
            if self.abort {
                return Guard::Abort;
            }
            if self.bounce {
                return Guard::Redirect(Location::path(format!("/users/{}", self.calls.len())));
            }
            match self.redirect.take() {
                Some(next) => Guard::Redirect(next),
                None => Guard::Proceed,
            }
        }

        fn after_each(&mut self, to: &Route, _from: &Route) {
            let len = self.host().entries().len();
            self.calls.push(format!("after {} ({len})", to.full_path));
        }

        fn history(&mut self) -> &mut dyn HostHistory {
            self.history.as_mut().unwrap()
        }
    }

    fn table() -> TableRouter {
        TableRouter::new(vec![
            RouteDef::leaf("/", "Home").with_name("home"),
            RouteDef::leaf("/users/:id", "User").with_name("user"),
            RouteDef::leaf("*", "NotFound"),
        ])
    }

    #[test]
    fn resolves_params_and_catch_all() {
        let router = table();
        let user = router.resolve(&Location::path("/users/7")).unwrap();
        assert_eq!(user.name.as_deref(), Some("user"));
        assert_eq!(user.params.get("id").map(String::as_str), Some("7"));

        let named = router
            .resolve(&Location::named("user").with_param("id", "9"))
            .unwrap();
        assert_eq!(named.full_path, "/users/9");

        let missing = router.resolve(&Location::path("/nope/deeper")).unwrap();
        assert_eq!(missing.matched[0].path, "*");
    }

    #[test]
    fn after_each_runs_before_history_write() {
        let mut router = table();
        let mut hooks = Recorder::new();
        router.push(Location::path("/users/1"), &mut hooks).unwrap();

        assert_eq!(hooks.calls, ["before /users/1", "after /users/1 (1)"]);
        assert_eq!(hooks.host().entries().len(), 2);
        assert_eq!(hooks.host().location(), "/users/1");
    }

    #[test]
    fn redirect_reports_redirected_and_lands_on_target() {
        let mut router = table();
        let mut hooks = Recorder::new();
        let mut next = Location::path("/users/2");
        next.replace = true;
        hooks.redirect = Some(next);

        let err = router.push(Location::path("/users/1"), &mut hooks).unwrap_err();
        assert_eq!(err.superseded_by(), Some("/users/2"));
        assert_eq!(router.current_route().full_path, "/users/2");
        assert_eq!(hooks.host().entries().len(), 1);
    }

    #[test]
    fn endless_redirects_stop_at_the_limit() {
        let mut router = table().with_max_redirects(2);
        let mut hooks = Recorder::new();
        hooks.bounce = true;

        let err = router.push(Location::path("/users/0"), &mut hooks).unwrap_err();
        assert!(matches!(err, NavigationError::RedirectLoop(_)));
        assert_eq!(hooks.calls.len(), 3);
        assert_eq!(router.current_route().full_path, "/");
        assert_eq!(hooks.host().entries().len(), 1);
    }

    #[test]
    fn duplicate_and_abort_leave_history_alone() {
        let mut router = table();
        let mut hooks = Recorder::new();
        router.push(Location::path("/users/1"), &mut hooks).unwrap();
        let dup = router.push(Location::path("/users/1"), &mut hooks);
        assert!(matches!(dup, Err(NavigationError::Duplicated { .. })));

        hooks.abort = true;
        let aborted = router.push(Location::path("/users/3"), &mut hooks);
        assert!(matches!(aborted, Err(NavigationError::Aborted { .. })));
        assert_eq!(hooks.host().entries().len(), 2);
    }

    #[test]
    fn replace_keeps_foreign_state_fields() {
        let mut router = table();
        let mut hooks = Recorder::new();
        hooks
            .history()
            .replace_state(HistoryState::new().with("mine", true), "", None);
        router.replace(Location::path("/users/4"), &mut hooks).unwrap();

        let state = hooks.host().state().unwrap();
        assert!(state.contains_key("mine"));
        assert!(state.contains_key(STATE_KEY_FIELD));
    }

    #[test]
    fn sync_follows_host_location() {
        let mut router = table();
        let mut hooks = Recorder::new();
        router.push(Location::path("/users/1"), &mut hooks).unwrap();
        hooks.history.as_mut().unwrap().user_back();
        let route = router.sync_with_host(&mut hooks).unwrap();
        assert_eq!(route.full_path, "/");
        assert_eq!(hooks.host().entries().len(), 2);
    }
}
