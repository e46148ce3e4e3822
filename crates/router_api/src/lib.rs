//! # router_api
//!
//! Narrow contracts for the three external collaborators the navigation
//! stack works against:
//! - [`Router`]: resolves locations and runs a navigation, calling back into
//!   [`NavigationHooks`] on the way;
//! - [`HostHistory`]: the browser-style session history with per-entry
//!   persisted [`HistoryState`];
//! - [`ViewTree`]: parent links of mounted view instances and which
//!   instance is mounted for a [`MatchedRecord`].
//!
//! Nothing here knows about ordering tokens. Implementations live in the
//! embedding application (or in the `platform` crate for in-process hosts).

mod error;
mod history;
mod location;
mod route;

pub use error::{LocationError, NavigationError};
pub use history::{HistoryState, HostHistory};
pub use location::{Location, Params, Query};
pub use route::{MatchedRecord, Route};

use core_types::InstanceId;

/// Name of the outlet a record renders into when none is given.
pub const DEFAULT_OUTLET: &str = "default";

/// Decision returned from a `before_each` hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Guard {
    Proceed,
    /// Abandon the current navigation and start one towards this location.
    /// `Location::replace` selects push vs replace for the new navigation.
    Redirect(Location),
    Abort,
}

/// Hooks a router calls while resolving a navigation.
///
/// Ordering contract: `before_each` runs before the route is confirmed;
/// `after_each` runs once it is confirmed, and *before* the router mutates
/// the host history for it. All history mutations go through `history()`.
pub trait NavigationHooks {
    fn before_each(&mut self, to: &Route, from: &Route) -> Guard;
    fn after_each(&mut self, to: &Route, from: &Route);
    fn history(&mut self) -> &mut dyn HostHistory;
}

/// Client-side router, consumed as a black box.
///
/// `Ok`/`Err` of the returned result play the role of the completion and
/// abort callbacks.
pub trait Router {
    fn current_route(&self) -> &Route;

    fn resolve(&self, location: &Location) -> Result<Route, NavigationError>;

    fn push(
        &mut self,
        location: Location,
        hooks: &mut dyn NavigationHooks,
    ) -> Result<Route, NavigationError>;

    fn replace(
        &mut self,
        location: Location,
        hooks: &mut dyn NavigationHooks,
    ) -> Result<Route, NavigationError>;

    /// Transition to whatever the host history currently points at, without
    /// mutating the history (initial load and `popstate`).
    fn sync_with_host(&mut self, hooks: &mut dyn NavigationHooks)
    -> Result<Route, NavigationError>;
}

/// Hierarchy of mounted view instances.
pub trait ViewTree {
    fn parent(&self, instance: InstanceId) -> Option<InstanceId>;

    /// Instance currently mounted for `record` in the named outlet.
    fn mounted(&self, record: &MatchedRecord, outlet: &str) -> Option<InstanceId>;
}

/// `instance` followed by its ancestors, closest first.
pub fn ancestors<T: ViewTree + ?Sized>(
    tree: &T,
    instance: InstanceId,
) -> impl Iterator<Item = InstanceId> + '_ {
    std::iter::successors(Some(instance), move |id| tree.parent(*id))
}
