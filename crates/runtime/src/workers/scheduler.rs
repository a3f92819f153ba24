//! Scheduler worker: the single consumer of the operation queue.
//!
//! Owns the [`Scheduler`], the world and the collaborators. Producers talk to
//! it through [`Command`]s sent by [`crate::RuntimeHandle`]. Between commands
//! the worker sleeps until the earliest due operation, maps wall-clock time
//! since its start onto [`Tick`]s, and runs every due operation.

use std::future;
use std::ops::ControlFlow;
use std::time::Duration;

use mechanics_core::{CreatureId, CreatureSnapshot, GameError, Tick};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::api::Result;
use crate::events::{Event, EventBus, SchedulerEvent};
use crate::factory::OperationRequest;
use crate::operation::{Collaborators, Operation, OperationHandle, OperationId};
use crate::scheduler::{Scheduler, TickOutcome, TickReport};
use crate::world::{CreatureRegistry, GameWorld};

/// Commands that can be sent to the scheduler worker.
pub enum Command {
    /// Enqueue an operation under an id issued by the caller.
    Schedule {
        id: OperationId,
        operation: Box<dyn Operation>,
        delay: Duration,
    },
    /// Build an operation through the factory, then enqueue it.
    Submit {
        request: OperationRequest,
        delay: Duration,
        reply: oneshot::Sender<Result<OperationHandle>>,
    },
    Cancel {
        id: OperationId,
        reply: oneshot::Sender<bool>,
    },
    QueryCreature {
        id: CreatureId,
        reply: oneshot::Sender<Option<CreatureSnapshot>>,
    },
    /// Stop after acknowledging; pending operations are discarded.
    Shutdown { reply: oneshot::Sender<()> },
}

pub struct SchedulerWorker {
    scheduler: Scheduler,
    world: Box<dyn GameWorld>,
    collaborators: Collaborators,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    epoch: Instant,
}

impl SchedulerWorker {
    pub fn new(
        scheduler: Scheduler,
        world: Box<dyn GameWorld>,
        collaborators: Collaborators,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            target: "mechanics::worker",
            creatures = world.ids().len(),
            "scheduler worker initialized"
        );

        Self {
            scheduler,
            world,
            collaborators,
            command_rx,
            event_bus,
            epoch: Instant::now(),
        }
    }

    /// Main worker loop. Ends on `Shutdown` or when every handle is dropped.
    pub async fn run(mut self) {
        loop {
            let wake = self.next_wake();

            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => {
                        if self.handle_command(command).is_break() {
                            break;
                        }
                    }
                    None => break,
                },
                () = sleep_until_due(wake) => self.run_due(),
            }
        }
    }

    fn next_wake(&mut self) -> Option<Instant> {
        self.scheduler
            .next_due()
            .and_then(|due| self.epoch.checked_add(due.as_duration()))
    }

    fn sync_clock(&mut self) -> Tick {
        let now = Tick::from_duration(self.epoch.elapsed());
        self.scheduler.advance_to(now);
        self.scheduler.now()
    }

    /// Applies one command. Breaks once the worker should stop.
    fn handle_command(&mut self, command: Command) -> ControlFlow<()> {
        // Delays count from the moment the command is handled.
        self.sync_clock();

        match command {
            Command::Schedule {
                id,
                operation,
                delay,
            } => {
                self.scheduler.schedule_with_id(id, operation, delay);
            }
            Command::Submit {
                request,
                delay,
                reply,
            } => {
                let result = self
                    .collaborators
                    .operation_factory
                    .create(request)
                    .map(|operation| self.scheduler.schedule_boxed(operation, delay))
                    .map_err(Into::into);
                if reply.send(result).is_err() {
                    debug!(target: "mechanics::worker", "Submit reply channel closed (caller dropped)");
                }
            }
            Command::Cancel { id, reply } => {
                let cancelled = self.scheduler.cancel(id);
                if reply.send(cancelled).is_err() {
                    debug!(target: "mechanics::worker", "Cancel reply channel closed (caller dropped)");
                }
            }
            Command::QueryCreature { id, reply } => {
                let snapshot = self.world.creature(id).map(|creature| creature.snapshot());
                if reply.send(snapshot).is_err() {
                    debug!(target: "mechanics::worker", "QueryCreature reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown { reply } => {
                info!(
                    target: "mechanics::worker",
                    pending = self.scheduler.pending(),
                    "scheduler worker shutting down"
                );
                if reply.send(()).is_err() {
                    debug!(target: "mechanics::worker", "Shutdown reply channel closed (caller dropped)");
                }
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    fn run_due(&mut self) {
        self.sync_clock();
        let report = self
            .scheduler
            .run_tick(self.world.as_mut(), &self.collaborators);
        self.publish_report(&report);
    }

    fn publish_report(&self, report: &TickReport) {
        for outcome in &report.outcomes {
            let event = match &outcome.result {
                TickOutcome::Completed => continue,
                TickOutcome::Failed(err) => SchedulerEvent::OperationFailed {
                    id: outcome.id,
                    operation: outcome.operation.to_owned(),
                    requestor: outcome.requestor,
                    severity: err.severity(),
                    code: err.error_code().to_owned(),
                    error: err.to_string(),
                    at: report.tick,
                },
                TickOutcome::Deferred { until } => SchedulerEvent::OperationDeferred {
                    id: outcome.id,
                    operation: outcome.operation.to_owned(),
                    until: *until,
                },
                TickOutcome::Dropped { exhausted_until } => SchedulerEvent::OperationDropped {
                    id: outcome.id,
                    operation: outcome.operation.to_owned(),
                    exhausted_until: *exhausted_until,
                },
            };
            self.event_bus.publish(Event::Scheduler(event));
        }
    }
}

async fn sleep_until_due(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationIdIssuer;
    use crate::testing::{Probe, collaborators, probe_log};
    use crate::world::InMemoryWorld;

    #[tokio::test(start_paused = true)]
    async fn shutdown_replies_and_ignores_later_commands() {
        let ids = OperationIdIssuer::new();
        let (collaborators, _) = collaborators();
        let (command_tx, command_rx) = mpsc::channel(8);
        let worker = SchedulerWorker::new(
            Scheduler::new(ids.clone()),
            Box::new(InMemoryWorld::new()),
            collaborators,
            command_rx,
            EventBus::new(),
        );
        let log = probe_log();
        let (reply_tx, reply_rx) = oneshot::channel();

        command_tx
            .send(Command::Shutdown { reply: reply_tx })
            .await
            .unwrap();
        command_tx
            .send(Command::Schedule {
                id: ids.issue(),
                operation: Box::new(Probe::new("late", &log)),
                delay: Duration::ZERO,
            })
            .await
            .unwrap();

        worker.run().await;

        assert_eq!(reply_rx.await, Ok(()));
        assert!(log.lock().unwrap().is_empty());
    }
}
