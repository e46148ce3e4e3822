//! Installation options.

use crate::token::{Clock, SystemClock, TokenStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SEQ_KEY: &str = "s~";

/// Where ordering tokens live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// In the URL query, under the configured key. Every navigation is
    /// redirected once to carry its token.
    #[default]
    Query,
    /// In the persisted history state, invisible in the URL.
    HistoryState(TokenStrategy),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a router is required")]
    MissingRouter,
    #[error("seq_key must not be empty")]
    EmptySeqKey,
}

/// Serializable part of [`Options`], as read from a config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub seq_key: String,
    pub mode: Mode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seq_key: DEFAULT_SEQ_KEY.to_string(),
            mode: Mode::default(),
        }
    }
}

pub struct Options<R> {
    pub(crate) router: Option<R>,
    pub(crate) seq_key: String,
    pub(crate) mode: Mode,
    pub(crate) clock: Option<Box<dyn Clock>>,
}

impl<R> Default for Options<R> {
    fn default() -> Self {
        Self {
            router: None,
            seq_key: DEFAULT_SEQ_KEY.to_string(),
            mode: Mode::default(),
            clock: None,
        }
    }
}

impl<R> Options<R> {
    pub fn new(router: R) -> Self {
        Self::default().router(router)
    }

    pub fn router(mut self, router: R) -> Self {
        self.router = Some(router);
        self
    }

    pub fn seq_key(mut self, key: impl Into<String>) -> Self {
        self.seq_key = key.into();
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn with_settings(self, settings: Settings) -> Self {
        self.seq_key(settings.seq_key).mode(settings.mode)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            seq_key: self.seq_key.clone(),
            mode: self.mode,
        }
    }

    /// Check everything `install` needs, handing back the router and clock.
    pub(crate) fn validate(self) -> Result<Validated<R>, ConfigError> {
        let router = self.router.ok_or(ConfigError::MissingRouter)?;
        if self.seq_key.is_empty() {
            return Err(ConfigError::EmptySeqKey);
        }
        Ok(Validated {
            router,
            seq_key: self.seq_key,
            mode: self.mode,
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
        })
    }
}

pub(crate) struct Validated<R> {
    pub(crate) router: R,
    pub(crate) seq_key: String,
    pub(crate) mode: Mode,
    pub(crate) clock: Box<dyn Clock>,
}
