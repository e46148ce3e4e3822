use core_types::{Depth, NavKind, Seq};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackEvent {
    // Reconciler -> observers
    Reconciled {
        kind: NavKind,
        seq: Seq,
        depth: Option<Depth>,
        full_path: String,
        len: usize,
        /// Entries dropped by this reconciliation (truncation or replace pop).
        dropped: usize,
    },
    // History interceptor -> observers
    StateSynthesized {
        seq: Seq,
        depth: Depth,
        url: String,
    },
}

/// Fan-out publisher. Each subscriber owns a receiver; dead receivers are
/// pruned on the next publish.
#[derive(Debug, Default)]
pub struct StackBus {
    subscribers: Vec<Sender<StackEvent>>,
}

impl StackBus {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<StackEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, evt: StackEvent) {
        self.subscribers.retain(|tx| tx.send(evt.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(len: usize) -> StackEvent {
        StackEvent::Reconciled {
            kind: NavKind::Push,
            seq: Seq::from_raw(len as u64),
            depth: None,
            full_path: "/".into(),
            len,
            dropped: 0,
        }
    }

    #[test]
    fn every_subscriber_sees_every_event() {
        let mut bus = StackBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(event(1));
        bus.publish(event(2));

        assert_eq!(a.try_iter().count(), 2);
        assert_eq!(b.try_iter().collect::<Vec<_>>(), vec![event(1), event(2)]);
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut bus = StackBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(event(1));
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.try_recv(), Ok(event(1)));
    }
}
