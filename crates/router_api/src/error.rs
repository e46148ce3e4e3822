use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("invalid location {input:?}: {source}")]
    Invalid {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failures a router reports for a navigation.
///
/// The first two are "cancellation" failures: the navigation did not fail on
/// its own, another navigation took its place.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("redirected when going from {from:?} to {to:?} via a navigation guard")]
    Redirected { from: String, to: String },
    #[error("navigation cancelled from {from:?} to {to:?} with a new navigation")]
    Cancelled { from: String, to: String },
    #[error("navigation aborted from {from:?} to {to:?} via a navigation guard")]
    Aborted { from: String, to: String },
    #[error("avoided redundant navigation to current location: {to:?}")]
    Duplicated { to: String },
    #[error("no route matches {0:?}")]
    NoMatch(String),
    #[error("too many redirects while navigating to {0:?}")]
    RedirectLoop(String),
    #[error(transparent)]
    Location(#[from] LocationError),
}

impl NavigationError {
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            NavigationError::Redirected { .. } | NavigationError::Cancelled { .. }
        )
    }

    /// Full path the superseding navigation was heading to, if any.
    pub fn superseded_by(&self) -> Option<&str> {
        match self {
            NavigationError::Redirected { to, .. } | NavigationError::Cancelled { to, .. } => {
                Some(to)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_redirect_and_cancel_are_cancellations() {
        let redirected = NavigationError::Redirected {
            from: "/".into(),
            to: "/a".into(),
        };
        let aborted = NavigationError::Aborted {
            from: "/".into(),
            to: "/a".into(),
        };
        assert!(redirected.is_cancellation());
        assert_eq!(redirected.superseded_by(), Some("/a"));
        assert!(!aborted.is_cancellation());
        assert!(!NavigationError::NoMatch("/x".into()).is_cancellation());
    }

    #[test]
    fn messages_name_both_ends() {
        let err = NavigationError::Cancelled {
            from: "/a".into(),
            to: "/b".into(),
        };
        assert_eq!(
            err.to_string(),
            "navigation cancelled from \"/a\" to \"/b\" with a new navigation"
        );
    }
}
