//! Push/replace intent tracking and token injection for router navigations.

use crate::options::Mode;
use crate::token::{TokenSource, decode_seq, encode_seq};
use core_types::{NavIntent, Seq};
use router_api::{Guard, NavigationError, Route};

#[derive(Debug)]
pub struct NavigationInterceptor {
    seq_key: String,
    mode: Mode,
    intent: NavIntent,
    /// Encoded token carried by the last redirect this interceptor issued.
    injected: Option<String>,
}

impl NavigationInterceptor {
    /// The first navigation of a session replaces the landing entry, so the
    /// intent starts out as `Replace`.
    pub fn new(seq_key: impl Into<String>, mode: Mode) -> Self {
        Self {
            seq_key: seq_key.into(),
            mode,
            intent: NavIntent::Replace,
            injected: None,
        }
    }

    pub fn seq_key(&self) -> &str {
        &self.seq_key
    }

    pub fn intent(&self) -> NavIntent {
        self.intent
    }

    /// Record the intent of a navigation the app is about to start.
    ///
    /// Last writer wins: a second call before the first navigation's
    /// `after_each` overwrites the first intent.
    pub fn begin(&mut self, intent: NavIntent) {
        self.intent = intent;
        self.injected = None;
    }

    /// `before_each` decision.
    ///
    /// `from_host` is set while the router follows the host (initial load or
    /// popstate): the host entry already exists, so a token redirect must
    /// replace it rather than push a second one.
    pub fn before_each(&mut self, to: &Route, from_host: bool, tokens: &mut TokenSource) -> Guard {
        if self.mode != Mode::Query {
            return Guard::Proceed;
        }
        // An empty value counts as absent; it would decode to the oldest token.
        if to.query.get(&self.seq_key).is_some_and(|v| !v.is_empty()) {
            log::trace!(target: "navstack.intercept", "{} already carries a token", to.full_path);
            return Guard::Proceed;
        }

        let token = encode_seq(tokens.stamp());
        let mut next = to.to_location();
        next.query.insert(self.seq_key.clone(), token.clone());
        next.replace = from_host || self.intent == NavIntent::Replace;
        log::debug!(
            target: "navstack.intercept",
            "redirecting {} with {}={token} (replace={})",
            to.full_path,
            self.seq_key,
            next.replace
        );
        self.injected = Some(token);
        Guard::Redirect(next)
    }

    /// Token carried in `route`'s query, oldest if absent or malformed.
    pub fn token_of(&self, route: &Route) -> Seq {
        decode_seq(route.query.get(&self.seq_key).map(String::as_str))
    }

    /// Called from `after_each`: hand out the intent and reset it to push.
    pub fn finish(&mut self) -> NavIntent {
        std::mem::take(&mut self.intent)
    }

    /// Map the router's result for the caller.
    ///
    /// A cancellation caused by this interceptor's own redirect is not a
    /// failure: the router ended on the annotated location, which is
    /// returned instead. Genuine failures reset the intent.
    pub fn settle(
        &mut self,
        result: Result<Route, NavigationError>,
        current: &Route,
    ) -> Result<Route, NavigationError> {
        let injected = self.injected.take();
        match result {
            Ok(route) => Ok(route),
            Err(err) if err.is_cancellation() && self.landed_on(injected.as_deref(), current) => {
                log::trace!(target: "navstack.intercept", "swallowed {err}");
                Ok(current.clone())
            }
            Err(err) => {
                log::debug!(target: "navstack.intercept", "navigation failed: {err}");
                self.intent = NavIntent::Push;
                Err(err)
            }
        }
    }

    fn landed_on(&self, injected: Option<&str>, current: &Route) -> bool {
        injected.is_some() && current.query.get(&self.seq_key).map(String::as_str) == injected
    }
}
