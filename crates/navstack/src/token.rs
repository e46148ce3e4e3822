//! Ordering tokens: allocation and the fail-soft codec.

use core_types::{Depth, Seq};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock milliseconds for timestamp tokens.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenStrategy {
    #[default]
    Timestamp,
    Depth,
}

/// Allocates ordering tokens for one session.
pub struct TokenSource {
    strategy: TokenStrategy,
    clock: Box<dyn Clock>,
    last: Seq,
}

impl TokenSource {
    pub fn new(strategy: TokenStrategy, clock: Box<dyn Clock>) -> Self {
        Self {
            strategy,
            clock,
            last: Seq::ZERO,
        }
    }

    pub fn strategy(&self) -> TokenStrategy {
        self.strategy
    }

    /// Token for an entry written at `depth`.
    ///
    /// Depth tokens are the depth itself, so a replace reuses the token of
    /// the entry it overwrites. Timestamp tokens never repeat within a
    /// session: a clock reading that does not move past the previous token
    /// is bumped to `last + 1`.
    pub fn allocate(&mut self, depth: Depth) -> Seq {
        match self.strategy {
            TokenStrategy::Depth => Seq::from(depth),
            TokenStrategy::Timestamp => self.stamp(),
        }
    }

    /// Always a timestamp token, whatever the strategy (URL tokens).
    pub fn stamp(&mut self) -> Seq {
        let now = Seq::from_raw(self.clock.now_millis());
        let seq = if now > self.last { now } else { self.last.next() };
        self.last = seq;
        seq
    }

    /// Make sure later timestamps sort after a token restored from the host.
    pub fn observe(&mut self, seq: Seq) {
        if seq > self.last {
            self.last = seq;
        }
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("strategy", &self.strategy)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

pub fn encode_seq(seq: Seq) -> String {
    format!("{:x}", seq.as_raw())
}

/// Decode a hex token. Absent or malformed input is the oldest token.
pub fn decode_seq(raw: Option<&str>) -> Seq {
    let Some(raw) = raw else {
        return Seq::ZERO;
    };
    match u64::from_str_radix(raw.trim(), 16) {
        Ok(v) => Seq::from_raw(v),
        Err(err) => {
            log::debug!(target: "navstack.token", "undecodable token {raw:?}: {err}");
            Seq::ZERO
        }
    }
}

/// Decode a token persisted in history state: a hex string or an integer.
pub fn decode_state_seq(value: Option<&Value>) -> Seq {
    match value {
        Some(Value::String(s)) => decode_seq(Some(s)),
        Some(Value::Number(n)) => n.as_u64().map(Seq::from_raw).unwrap_or(Seq::ZERO),
        Some(other) => {
            log::debug!(target: "navstack.token", "unexpected token value {other}");
            Seq::ZERO
        }
        None => Seq::ZERO,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock the test advances by hand.
    #[derive(Clone, Default)]
    pub(crate) struct ManualClock(pub(crate) Rc<Cell<u64>>);

    impl Clock for ManualClock {
        fn now_millis(&self) -> u64 {
            self.0.get()
        }
    }

    #[test]
    fn round_trip_recovers_token() {
        for raw in [0u64, 1, 0x18c3f2a9b10, u64::MAX] {
            let seq = Seq::from_raw(raw);
            assert_eq!(decode_seq(Some(&encode_seq(seq))), seq);
        }
    }

    #[test]
    fn garbage_and_absent_decode_to_zero() {
        assert_eq!(decode_seq(None), Seq::ZERO);
        assert_eq!(decode_seq(Some("")), Seq::ZERO);
        assert_eq!(decode_seq(Some("not-hex")), Seq::ZERO);
        assert_eq!(decode_seq(Some("1ffffffffffffffff")), Seq::ZERO);
    }

    #[test]
    fn state_tokens_accept_strings_and_numbers() {
        assert_eq!(decode_state_seq(Some(&json!("ff"))), Seq::from_raw(255));
        assert_eq!(decode_state_seq(Some(&json!(7))), Seq::from_raw(7));
        assert_eq!(decode_state_seq(Some(&json!(-1))), Seq::ZERO);
        assert_eq!(decode_state_seq(Some(&json!({"x": 1}))), Seq::ZERO);
        assert_eq!(decode_state_seq(None), Seq::ZERO);
    }

    #[test]
    fn depth_strategy_uses_depth() {
        let mut tokens = TokenSource::new(TokenStrategy::Depth, Box::new(SystemClock));
        assert_eq!(tokens.allocate(3), Seq::from_raw(3));
        assert_eq!(tokens.allocate(3), Seq::from_raw(3));
    }

    #[test]
    fn timestamps_never_repeat_on_a_stalled_clock() {
        let clock = ManualClock::default();
        clock.0.set(100);
        let mut tokens = TokenSource::new(TokenStrategy::Timestamp, Box::new(clock.clone()));

        let a = tokens.allocate(1);
        let b = tokens.allocate(2);
        clock.0.set(50);
        let c = tokens.allocate(3);
        clock.0.set(500);
        let d = tokens.allocate(4);

        assert_eq!(a, Seq::from_raw(100));
        assert_eq!(b, Seq::from_raw(101));
        assert_eq!(c, Seq::from_raw(102));
        assert_eq!(d, Seq::from_raw(500));
    }

    #[test]
    fn observed_tokens_push_the_floor_up() {
        let clock = ManualClock::default();
        clock.0.set(10);
        let mut tokens = TokenSource::new(TokenStrategy::Timestamp, Box::new(clock));
        tokens.observe(Seq::from_raw(40));
        assert_eq!(tokens.stamp(), Seq::from_raw(41));
    }
}
