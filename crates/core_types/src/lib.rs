use std::fmt;

/// Count of host history pushes since the session started.
pub type Depth = u32;

/// Ordering token attached to every history entry.
///
/// Larger means "further from the start of the session". `Seq::ZERO` is the
/// oldest possible token and is what malformed or missing tokens decode to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Seq(u64);

impl Seq {
    pub const ZERO: Seq = Seq(0);

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<Depth> for Seq {
    fn from(depth: Depth) -> Self {
        Self(u64::from(depth))
    }
}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Opaque handle for a mounted view instance in the host's view tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// What the app asked the router to do with the history list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavIntent {
    #[default]
    Push,
    Replace,
}

/// How a completed navigation moved through the host history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKind {
    /// First sync with the host when the session starts.
    Initial,
    Push,
    Replace,
    /// Back/forward. `app_triggered` is false when the end user pressed the
    /// browser's own buttons (or edited the URL).
    Traverse { app_triggered: bool },
}

impl From<NavIntent> for NavKind {
    fn from(intent: NavIntent) -> Self {
        match intent {
            NavIntent::Push => NavKind::Push,
            NavIntent::Replace => NavKind::Replace,
        }
    }
}
