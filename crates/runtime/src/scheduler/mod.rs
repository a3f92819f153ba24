//! Time-ordered execution of operations.
//!
//! The [`Scheduler`] is the only place world-mutating logic runs. Producers
//! hand it boxed operations with a delay; [`Scheduler::run_tick`] executes
//! every operation due at the current simulated time in `(due, submission)`
//! order, isolating failures and panics per operation.
//!
//! Two rules keep a tick bounded and deterministic:
//! - operations scheduled while a tick runs (including zero-delay follow-ups)
//!   wait for the next tick;
//! - cancellation is resolved by state: pending operations can be cancelled,
//!   the executing one cannot.
//!
//! # Exhaustion
//!
//! Before executing, the requestor's cooldown for the operation's
//! [`ExhaustionType`] is checked. `Action` operations are dropped while the
//! cooldown lasts; `Combat` and `Movement` operations are deferred to its
//! expiry. A successful execution sets the cooldown to `now + cost`.

mod queue;

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use mechanics_core::{
    CreatureId, ErrorSeverity, ExhaustionPolicy, ExhaustionTracker, GameError, Tick,
};
use tracing::{debug, error, trace, warn};

use self::queue::EventQueue;
use crate::operation::{
    Collaborators, Operation, OperationContext, OperationError, OperationHandle, OperationId,
    OperationIdIssuer, OperationState,
};
use crate::world::GameWorld;

/// Number of terminal states remembered for [`Scheduler::state_of`].
const FINISHED_HISTORY: usize = 4096;

/// Pending operations and the queue that orders them.
///
/// Operations reach this through [`OperationContext`] to schedule follow-ups
/// or cancel pending work while a tick runs.
pub struct Timeline {
    now: Tick,
    queue: EventQueue,
    pending: HashMap<OperationId, Box<dyn Operation>>,
    executing: Option<OperationId>,
    finished: HashMap<OperationId, OperationState>,
    finished_order: VecDeque<OperationId>,
    ids: OperationIdIssuer,
}

impl Timeline {
    fn new(ids: OperationIdIssuer) -> Self {
        Self {
            now: Tick::ZERO,
            queue: EventQueue::default(),
            pending: HashMap::new(),
            executing: None,
            finished: HashMap::new(),
            finished_order: VecDeque::new(),
            ids,
        }
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub(crate) fn schedule(
        &mut self,
        operation: Box<dyn Operation>,
        delay: Duration,
    ) -> OperationHandle {
        let id = self.ids.issue();
        self.schedule_with_id(id, operation, delay)
    }

    pub(crate) fn schedule_with_id(
        &mut self,
        id: OperationId,
        operation: Box<dyn Operation>,
        delay: Duration,
    ) -> OperationHandle {
        let handle = OperationHandle {
            id,
            operation: operation.name(),
        };
        let due = self.now + delay;

        trace!(
            target: "mechanics::scheduler",
            operation = %id,
            kind = handle.operation,
            due = %due,
            "scheduled"
        );

        self.enqueue(id, operation, due);
        handle
    }

    fn enqueue(&mut self, id: OperationId, operation: Box<dyn Operation>, due: Tick) {
        self.queue.push(due, id);
        self.pending.insert(id, operation);
    }

    pub(crate) fn cancel(&mut self, id: OperationId) -> bool {
        if self.executing == Some(id) {
            return false;
        }

        match self.pending.get(&id) {
            Some(operation) if operation.can_be_cancelled() => {}
            _ => return false,
        }

        self.pending.remove(&id);
        self.finish(id, OperationState::Cancelled);
        trace!(target: "mechanics::scheduler", operation = %id, "cancelled");
        true
    }

    fn state_of(&self, id: OperationId) -> Option<OperationState> {
        if self.executing == Some(id) {
            Some(OperationState::Executing)
        } else if self.pending.contains_key(&id) {
            Some(OperationState::Scheduled)
        } else {
            self.finished.get(&id).copied()
        }
    }

    fn finish(&mut self, id: OperationId, state: OperationState) {
        self.finished.insert(id, state);
        self.finished_order.push_back(id);

        while self.finished_order.len() > FINISHED_HISTORY {
            if let Some(oldest) = self.finished_order.pop_front() {
                self.finished.remove(&oldest);
            }
        }
    }

    /// Earliest due time of a live entry, discarding cancelled heads.
    fn next_due(&mut self) -> Option<Tick> {
        while let Some(head) = self.queue.peek() {
            if self.pending.contains_key(&head.id) {
                return Some(head.due);
            }
            self.queue.discard_head();
        }
        None
    }
}

/// What happened to one operation during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Completed,
    Failed(OperationError),
    /// Requestor was exhausted; the operation was re-queued.
    Deferred { until: Tick },
    /// Requestor was exhausted; the operation was discarded.
    Dropped { exhausted_until: Tick },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    pub id: OperationId,
    pub operation: &'static str,
    pub requestor: CreatureId,
    pub result: TickOutcome,
}

/// Outcomes of one [`Scheduler::run_tick`], in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    pub outcomes: Vec<OperationOutcome>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result == TickOutcome::Completed)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.result, TickOutcome::Failed(_)))
    }
}

/// Single-consumer scheduler over simulated time.
pub struct Scheduler {
    timeline: Timeline,
    exhaustion: ExhaustionTracker,
}

impl Scheduler {
    pub fn new(ids: OperationIdIssuer) -> Self {
        Self {
            timeline: Timeline::new(ids),
            exhaustion: ExhaustionTracker::new(),
        }
    }

    pub fn now(&self) -> Tick {
        self.timeline.now
    }

    /// Moves the clock forward. Time never goes backwards.
    pub fn advance_to(&mut self, now: Tick) {
        self.timeline.now = self.timeline.now.max(now);
    }

    pub fn schedule(&mut self, operation: impl Operation, delay: Duration) -> OperationHandle {
        self.timeline.schedule(Box::new(operation), delay)
    }

    pub fn schedule_boxed(
        &mut self,
        operation: Box<dyn Operation>,
        delay: Duration,
    ) -> OperationHandle {
        self.timeline.schedule(operation, delay)
    }

    /// Schedules with an id issued earlier from the shared issuer.
    pub fn schedule_with_id(
        &mut self,
        id: OperationId,
        operation: Box<dyn Operation>,
        delay: Duration,
    ) -> OperationHandle {
        self.timeline.schedule_with_id(id, operation, delay)
    }

    /// Cancels a pending operation.
    ///
    /// Returns true iff the operation was pending and cancellable; its body
    /// will never run.
    pub fn cancel(&mut self, id: OperationId) -> bool {
        self.timeline.cancel(id)
    }

    pub fn state_of(&self, id: OperationId) -> Option<OperationState> {
        self.timeline.state_of(id)
    }

    /// Number of operations waiting to run.
    pub fn pending(&self) -> usize {
        self.timeline.pending.len()
    }

    pub fn next_due(&mut self) -> Option<Tick> {
        self.timeline.next_due()
    }

    pub fn exhaustion(&self) -> &ExhaustionTracker {
        &self.exhaustion
    }

    /// Executes every operation due at the current time.
    pub fn run_tick(
        &mut self,
        world: &mut dyn GameWorld,
        collaborators: &Collaborators,
    ) -> TickReport {
        let now = self.timeline.now;
        let cutoff = self.timeline.queue.next_seq();
        let mut outcomes = Vec::new();

        while let Some(event) = self.timeline.queue.pop_due(now, cutoff) {
            // Cancelled operations leave their queue entry behind.
            let Some(operation) = self.timeline.pending.remove(&event.id) else {
                continue;
            };

            outcomes.push(self.dispatch(event.id, operation, world, collaborators));
        }

        self.exhaustion.prune(now);

        TickReport {
            tick: now,
            outcomes,
        }
    }

    fn dispatch(
        &mut self,
        id: OperationId,
        operation: Box<dyn Operation>,
        world: &mut dyn GameWorld,
        collaborators: &Collaborators,
    ) -> OperationOutcome {
        let now = self.timeline.now;
        let name = operation.name();
        let requestor = operation.requestor();
        let kind = operation.exhaustion_type();
        let cost = operation.exhaustion_cost();

        let outcome = |result| OperationOutcome {
            id,
            operation: name,
            requestor,
            result,
        };

        if let Some(until) = self.exhaustion.exhausted_until(requestor, kind, now) {
            return match kind.policy() {
                Some(ExhaustionPolicy::Defer) => {
                    debug!(
                        target: "mechanics::scheduler",
                        operation = %id,
                        kind = name,
                        requestor = %requestor,
                        until = %until,
                        "requestor exhausted, deferring"
                    );
                    self.timeline.enqueue(id, operation, until);
                    outcome(TickOutcome::Deferred { until })
                }
                Some(ExhaustionPolicy::Drop) | None => {
                    debug!(
                        target: "mechanics::scheduler",
                        operation = %id,
                        kind = name,
                        requestor = %requestor,
                        until = %until,
                        "requestor exhausted, dropping"
                    );
                    self.timeline.finish(id, OperationState::Cancelled);
                    outcome(TickOutcome::Dropped {
                        exhausted_until: until,
                    })
                }
            };
        }

        self.timeline.executing = Some(id);
        let result = {
            let mut ctx = OperationContext::new(now, id, &mut self.timeline, world, collaborators);
            panic::catch_unwind(AssertUnwindSafe(|| operation.execute(&mut ctx)))
        };
        self.timeline.executing = None;

        let result = result.unwrap_or_else(|payload| {
            Err(OperationError::Panicked {
                operation: name,
                message: panic_message(payload.as_ref()),
            })
        });

        match result {
            Ok(()) => {
                self.exhaustion.apply(requestor, kind, now, cost);
                self.timeline.finish(id, OperationState::Completed);
                trace!(target: "mechanics::scheduler", operation = %id, kind = name, "completed");
                outcome(TickOutcome::Completed)
            }
            Err(err) => {
                log_failure(id, name, requestor, &err);
                self.timeline.finish(id, OperationState::Failed);
                outcome(TickOutcome::Failed(err))
            }
        }
    }
}

fn log_failure(id: OperationId, name: &'static str, requestor: CreatureId, err: &OperationError) {
    let code = err.error_code();
    match err.severity() {
        ErrorSeverity::Internal | ErrorSeverity::Fatal => error!(
            target: "mechanics::scheduler",
            operation = %id,
            kind = name,
            requestor = %requestor,
            code,
            error = %err,
            "operation failed"
        ),
        ErrorSeverity::Validation => warn!(
            target: "mechanics::scheduler",
            operation = %id,
            kind = name,
            requestor = %requestor,
            code,
            error = %err,
            "operation rejected"
        ),
        ErrorSeverity::Recoverable => debug!(
            target: "mechanics::scheduler",
            operation = %id,
            kind = name,
            requestor = %requestor,
            code,
            error = %err,
            "operation failed"
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}
