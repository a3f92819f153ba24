//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing. Every producer (a session, an AI
//! loop, a timer) holds its own clone; all of them feed the one scheduler
//! worker.
use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};

use mechanics_core::{CreatureId, CreatureSnapshot};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::factory::OperationRequest;
use crate::operation::{Operation, OperationHandle, OperationIdIssuer};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    ids: OperationIdIssuer,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        ids: OperationIdIssuer,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            ids,
        }
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Schedules an operation `delay` after the worker receives it.
    ///
    /// The id is issued here, so the handle comes back without waiting for
    /// the worker.
    pub async fn schedule(
        &self,
        operation: impl Operation,
        delay: Duration,
    ) -> Result<OperationHandle> {
        let handle = OperationHandle {
            id: self.ids.issue(),
            operation: operation.name(),
        };

        self.send(Command::Schedule {
            id: handle.id,
            operation: Box::new(operation),
            delay,
        })
        .await?;

        Ok(handle)
    }

    /// Builds an operation from a request inside the worker and schedules it.
    ///
    /// Construction errors come back as [`RuntimeError::Rejected`].
    pub async fn submit(&self, request: OperationRequest, delay: Duration) -> Result<OperationHandle> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::Submit {
            request,
            delay,
            reply: reply_tx,
        })
        .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Cancels a pending operation. Returns false if it already started, has
    /// finished, or cannot be cancelled.
    pub async fn cancel(&self, handle: OperationHandle) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::Cancel {
            id: handle.id,
            reply: reply_tx,
        })
        .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Read-only snapshot of one creature.
    pub async fn creature(&self, id: CreatureId) -> Result<Option<CreatureSnapshot>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::QueryCreature {
            id,
            reply: reply_tx,
        })
        .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use mechanics_runtime::Topic;
    ///
    /// let mut combat_rx = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat_rx.recv().await {
    ///     // deaths, credits, attack results
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Stops the worker. Pending operations are discarded.
    pub async fn shutdown(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::Shutdown { reply: reply_tx }).await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
