//! Time-ordered event queue.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use mechanics_core::Tick;

use crate::operation::OperationId;

/// A queue entry: the operation is looked up by id when the entry fires.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScheduledEvent {
    pub due: Tick,
    pub seq: u64,
    pub id: OperationId,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-heap over `(due, seq)`. Equal due times pop in insertion order.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    events: BinaryHeap<Reverse<ScheduledEvent>>,
    next_seq: u64,
}

impl EventQueue {
    pub fn push(&mut self, due: Tick, id: OperationId) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.events.push(Reverse(ScheduledEvent { due, seq, id }));
        seq
    }

    /// Sequence number the next push will receive.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn peek(&self) -> Option<ScheduledEvent> {
        self.events.peek().map(|Reverse(event)| *event)
    }

    /// Pops the earliest event if it is due at `now` and was pushed before
    /// `cutoff`.
    pub fn pop_due(&mut self, now: Tick, cutoff: u64) -> Option<ScheduledEvent> {
        let head = self.peek()?;
        if head.due > now || head.seq >= cutoff {
            return None;
        }
        self.events.pop().map(|Reverse(event)| event)
    }

    /// Discards the head entry.
    pub fn discard_head(&mut self) {
        self.events.pop();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
