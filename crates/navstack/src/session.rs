//! The navigation session: one router, one intercepted host history, one
//! reconciled stack.

use crate::history::{HistoryInterceptor, Mark};
use crate::intercept::NavigationInterceptor;
use crate::options::{ConfigError, Mode, Options};
use crate::scope::{self, ScopedEntry};
use crate::stack::{Entry, Stack};
use crate::token::{TokenSource, TokenStrategy};
use bus::{StackBus, StackEvent};
use core_types::{Depth, InstanceId, NavIntent, NavKind, Seq};
use router_api::{
    Guard, HostHistory, Location, NavigationError, NavigationHooks, Route, Router, ViewTree,
};
use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

/// Work postponed to the next [`NavStack::tick`]: in history-state mode the
/// router writes the host entry only after `after_each` returns.
#[derive(Clone, Debug)]
enum Deferred {
    Reconcile { route: Route, intent: NavIntent },
}

/// Host entry the router is currently following (start or popstate).
#[derive(Clone, Copy, Debug)]
struct Landed {
    mark: Mark,
    kind: NavKind,
}

/// Hook side of the session, handed to the router for each navigation.
struct Core<H> {
    history: HistoryInterceptor<H>,
    nav: NavigationInterceptor,
    mode: Mode,
    stack: Stack,
    deferred: VecDeque<Deferred>,
    bus: StackBus,
    landed: Option<Landed>,
}

impl<H: HostHistory> Core<H> {
    fn reconcile(
        &mut self,
        route: Route,
        seq: Seq,
        depth: Option<Depth>,
        intent: NavIntent,
        kind: NavKind,
    ) {
        let full_path = route.full_path.clone();
        let out = self.stack.reconcile(Entry { route, seq, depth }, intent);
        log::debug!(
            target: "navstack.reconcile",
            "{kind:?} {full_path} seq={seq} depth={depth:?} dropped={} len={}",
            out.dropped(),
            self.stack.len()
        );
        self.bus.publish(StackEvent::Reconciled {
            kind,
            seq,
            depth,
            full_path,
            len: self.stack.len(),
            dropped: out.dropped(),
        });
    }

    fn run_deferred(&mut self) {
        while let Some(task) = self.deferred.pop_front() {
            match task {
                Deferred::Reconcile { route, intent } => {
                    // The host may have moved since the router's write.
                    let mark = self
                        .history
                        .take_written()
                        .or_else(|| self.history.current_mark())
                        .unwrap_or_else(|| {
                            log::warn!(
                                target: "navstack.session",
                                "current entry has no token after {}; treating it as oldest",
                                route.full_path
                            );
                            Mark {
                                seq: Seq::ZERO,
                                depth: self.history.depth(),
                            }
                        });
                    self.reconcile(route, mark.seq, Some(mark.depth), intent, intent.into());
                }
            }
        }
    }
}

impl<H: HostHistory> NavigationHooks for Core<H> {
    fn before_each(&mut self, to: &Route, _from: &Route) -> Guard {
        let from_host = self.landed.is_some();
        log::trace!(
            target: "navstack.session",
            "before_each {} from_host={from_host}",
            to.full_path
        );
        self.nav.before_each(to, from_host, self.history.tokens_mut())
    }

    fn after_each(&mut self, to: &Route, _from: &Route) {
        let intent = self.nav.finish();
        let landed = self.landed.take();
        log::trace!(
            target: "navstack.session",
            "after_each {} intent={intent:?}",
            to.full_path
        );

        match (self.mode, landed) {
            (Mode::Query, landed) => {
                let seq = self.nav.token_of(to);
                let kind = landed.map_or(intent.into(), |l| l.kind);
                let intent = if landed.is_some_and(|l| l.kind != NavKind::Initial) {
                    NavIntent::Push
                } else {
                    intent
                };
                self.reconcile(to.clone(), seq, None, intent, kind);
            }
            (Mode::HistoryState(_), Some(landed)) => {
                let intent = if landed.kind == NavKind::Initial {
                    intent
                } else {
                    NavIntent::Push
                };
                self.reconcile(
                    to.clone(),
                    landed.mark.seq,
                    Some(landed.mark.depth),
                    intent,
                    landed.kind,
                );
            }
            (Mode::HistoryState(_), None) => {
                // Drop any stale write; the router writes this entry next.
                self.history.take_written();
                self.deferred.push_back(Deferred::Reconcile {
                    route: to.clone(),
                    intent,
                });
            }
        }
    }

    fn history(&mut self) -> &mut dyn HostHistory {
        &mut self.history
    }
}

/// Read-only view of the stack for consumers.
#[derive(Clone, Copy, Debug)]
pub struct StackView<'a> {
    stack: &'a Stack,
}

impl<'a> StackView<'a> {
    /// Every entry, oldest first.
    pub fn full(&self) -> &'a [Entry] {
        self.stack.entries()
    }

    /// Sub-stack of the routed region `instance` lives in.
    pub fn scoped<T: ViewTree + ?Sized>(
        &self,
        instance: InstanceId,
        tree: &T,
    ) -> Vec<ScopedEntry<'a>> {
        scope::scoped(self.stack.entries(), instance, tree)
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.can_go_back()
    }

    pub fn current(&self) -> Option<&'a Entry> {
        self.stack.last()
    }
}

/// An installed navigation stack.
///
/// All router navigations must go through the session so the hooks and the
/// intercepted history see them. The host calls [`NavStack::on_popstate`]
/// for every back/forward notification and [`NavStack::tick`] once its event
/// loop turn is over.
pub struct NavStack<R, H> {
    router: R,
    core: Core<H>,
}

impl<R: Router, H: HostHistory> NavStack<R, H> {
    pub fn install(options: Options<R>, host: H) -> Result<Self, ConfigError> {
        let opts = options.validate()?;
        // Query mode keeps tokens in the URL; depth in state is bookkeeping.
        let strategy = match opts.mode {
            Mode::Query => TokenStrategy::Depth,
            Mode::HistoryState(strategy) => strategy,
        };
        let history = HistoryInterceptor::new(host, TokenSource::new(strategy, opts.clock));
        log::debug!(
            target: "navstack.session",
            "installed mode={:?} seq_key={:?}",
            opts.mode,
            opts.seq_key
        );

        Ok(Self {
            router: opts.router,
            core: Core {
                history,
                nav: NavigationInterceptor::new(opts.seq_key, opts.mode),
                mode: opts.mode,
                stack: Stack::new(),
                deferred: VecDeque::new(),
                bus: StackBus::new(),
                landed: None,
            },
        })
    }

    /// Initial sync with the location the host was loaded at.
    pub fn start(&mut self) -> Result<Route, NavigationError> {
        let mark = self.core.history.current_mark().unwrap_or_default();
        self.follow_host(Landed {
            mark,
            kind: NavKind::Initial,
        })
    }

    pub fn push(&mut self, location: Location) -> Result<Route, NavigationError> {
        self.navigate(location, NavIntent::Push)
    }

    pub fn replace(&mut self, location: Location) -> Result<Route, NavigationError> {
        self.navigate(location, NavIntent::Replace)
    }

    /// Move through the host history. The stack follows once the host
    /// reports the move through `on_popstate`.
    pub fn go(&mut self, delta: i32) {
        self.core.run_deferred();
        self.core.history.go(delta);
    }

    pub fn back(&mut self) {
        self.go(-1);
    }

    pub fn forward(&mut self) {
        self.go(1);
    }

    /// Host back/forward notification.
    pub fn on_popstate(&mut self) -> Result<Route, NavigationError> {
        self.core.run_deferred();
        let traversal = self.core.history.on_popstate();
        if traversal.synthesized {
            let url = self.core.history.location().to_string();
            self.core.bus.publish(StackEvent::StateSynthesized {
                seq: traversal.mark.seq,
                depth: traversal.mark.depth,
                url,
            });
        }
        self.follow_host(Landed {
            mark: traversal.mark,
            kind: NavKind::Traverse {
                app_triggered: traversal.app_triggered,
            },
        })
    }

    /// Run deferred work, as the host's zero-delay timer would.
    pub fn tick(&mut self) {
        self.core.run_deferred();
    }

    pub fn pending_tasks(&self) -> usize {
        self.core.deferred.len()
    }

    pub fn view(&self) -> StackView<'_> {
        StackView {
            stack: &self.core.stack,
        }
    }

    pub fn subscribe(&mut self) -> Receiver<StackEvent> {
        self.core.bus.subscribe()
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn mode(&self) -> Mode {
        self.core.mode
    }

    pub fn seq_key(&self) -> &str {
        self.core.nav.seq_key()
    }

    pub fn host(&self) -> &H {
        self.core.history.host()
    }

    /// Direct access to the host, bypassing interception. Writes made here
    /// are invisible to the session, as with any foreign script.
    pub fn host_mut(&mut self) -> &mut H {
        self.core.history.host_mut()
    }

    // -- internals ---

    fn navigate(
        &mut self,
        location: Location,
        intent: NavIntent,
    ) -> Result<Route, NavigationError> {
        self.core.run_deferred();
        self.core.nav.begin(intent);
        log::debug!(target: "navstack.session", "{intent:?} {}", location.full_path());
        let result = match intent {
            NavIntent::Push => self.router.push(location, &mut self.core),
            NavIntent::Replace => self.router.replace(location, &mut self.core),
        };
        self.core.nav.settle(result, self.router.current_route())
    }

    fn follow_host(&mut self, landed: Landed) -> Result<Route, NavigationError> {
        self.core.landed = Some(landed);
        let result = self.router.sync_with_host(&mut self.core);
        self.core.landed = None;
        self.core.nav.settle(result, self.router.current_route())
    }
}
