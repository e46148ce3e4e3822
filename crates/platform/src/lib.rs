//! In-process implementations of the `router_api` contracts.
//!
//! These behave like a browser tab driven by a client-side router closely
//! enough to exercise the navigation stack without one: history moves
//! report back through queued `popstate` notifications, and the router runs
//! guards and hooks in the same order a real router does (`after_each`
//! before the history write).

mod memory_history;
mod table_router;
mod view_arena;

pub use memory_history::{HostEntry, MemoryHistory};
pub use table_router::{RouteDef, TableRouter};
pub use view_arena::ViewArena;
