//! # navstack
//!
//! Keeps an ordered stack of visited routes consistent with the host's
//! session history, using only what a client-side router and the history
//! API expose.
//!
//! Every host entry gets an ordering token ([`core_types::Seq`]), either in
//! the URL query or in its persisted state. When a navigation completes, the
//! token of the entry it landed on says where in the stack it belongs:
//! entries whose token is not older are gone from the host (back, or push
//! after back), and a replace overwrites the top.
//!
//! ```text
//! app ── push/replace/go ──▶ NavStack ──▶ Router ──hooks──▶ Core
//!                              ▲                             │
//! host ── popstate/tick ───────┘        HistoryInterceptor ◀─┘
//!                                              │
//!                                         HostHistory
//! ```
//!
//! Nested views read their own slice of the stack through
//! [`StackView::scoped`].

pub mod history;
pub mod intercept;
pub mod options;
pub mod scope;
pub mod session;
pub mod stack;
pub mod token;

pub use bus::StackEvent;
pub use history::{HistoryInterceptor, Mark, Traversal};
pub use options::{ConfigError, DEFAULT_SEQ_KEY, Mode, Options, Settings};
pub use scope::ScopedEntry;
pub use session::{NavStack, StackView};
pub use stack::{Entry, Stack};
pub use token::{Clock, SystemClock, TokenStrategy};
