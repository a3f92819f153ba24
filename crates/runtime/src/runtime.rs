//! High-level runtime orchestrator.
//!
//! The runtime owns the scheduler worker, wires up the command channel and the
//! event bus, and exposes a builder-based API for plugging in the world and
//! the collaborators.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use mechanics_core::MechanicsConfig;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{CombatApi, EventBus, EventBusNotifier, GameApi};
use crate::factory::{
    CreatureFactory, DefaultCreatureFactory, DefaultOperationFactory, OperationFactory,
};
use crate::operation::{Collaborators, OperationIdIssuer};
use crate::scheduler::Scheduler;
use crate::workers::{Command, SchedulerWorker};
use crate::world::{CreatureRegistry, GameWorld, InMemoryWorld};

/// Runtime configuration shared across the orchestrator and the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub mechanics: MechanicsConfig,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 64;
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mechanics: MechanicsConfig::default(),
            command_buffer_size: Self::DEFAULT_COMMAND_BUFFER_SIZE,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

/// Owns the scheduler worker task.
///
/// [`RuntimeHandle`] provides a cloneable façade for producers.
pub struct Runtime {
    handle: RuntimeHandle,
    worker: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Stops the worker and waits for it to exit.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await?;
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`].
///
/// Every collaborator is optional: the world defaults to an empty
/// [`InMemoryWorld`], the factories to their default implementations, and
/// both notification APIs to an [`EventBusNotifier`] over the runtime's bus.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<Box<dyn GameWorld>>,
    creature_factory: Option<Arc<dyn CreatureFactory>>,
    operation_factory: Option<Arc<dyn OperationFactory>>,
    game_api: Option<Arc<dyn GameApi>>,
    combat_api: Option<Arc<dyn CombatApi>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
            creature_factory: None,
            operation_factory: None,
            game_api: None,
            combat_api: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn world(mut self, world: impl GameWorld + 'static) -> Self {
        self.world = Some(Box::new(world));
        self
    }

    pub fn creature_factory(mut self, factory: Arc<dyn CreatureFactory>) -> Self {
        self.creature_factory = Some(factory);
        self
    }

    pub fn operation_factory(mut self, factory: Arc<dyn OperationFactory>) -> Self {
        self.operation_factory = Some(factory);
        self
    }

    pub fn game_api(mut self, api: Arc<dyn GameApi>) -> Self {
        self.game_api = Some(api);
        self
    }

    pub fn combat_api(mut self, api: Arc<dyn CombatApi>) -> Self {
        self.combat_api = Some(api);
        self
    }

    /// Spawns the scheduler worker. Must be called inside a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let RuntimeConfig {
            mechanics,
            command_buffer_size,
            event_buffer_size,
        } = self.config;
        let command_buffer_size = command_buffer_size.max(1);
        let event_buffer_size = event_buffer_size.max(1);

        let event_bus = EventBus::with_capacity(event_buffer_size);
        let notifier = Arc::new(EventBusNotifier::new(event_bus.clone()));
        let world = self
            .world
            .unwrap_or_else(|| Box::new(InMemoryWorld::new()));

        // Fresh ids continue after the highest creature already in the world.
        let creature_factory = self.creature_factory.unwrap_or_else(|| {
            let first = world
                .ids()
                .last()
                .map_or(1, |id| id.0.saturating_add(1));
            Arc::new(DefaultCreatureFactory::starting_at(first))
        });

        let collaborators = Collaborators {
            creature_factory,
            operation_factory: self
                .operation_factory
                .unwrap_or_else(|| Arc::new(DefaultOperationFactory::new(mechanics.clone()))),
            game_api: self
                .game_api
                .unwrap_or_else(|| notifier.clone() as Arc<dyn GameApi>),
            combat_api: self
                .combat_api
                .unwrap_or_else(|| notifier as Arc<dyn CombatApi>),
            config: mechanics,
        };

        let ids = OperationIdIssuer::new();
        let (command_tx, command_rx) = mpsc::channel::<Command>(command_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone(), ids.clone());

        let worker = SchedulerWorker::new(
            Scheduler::new(ids),
            world,
            collaborators,
            command_rx,
            event_bus,
        );
        let worker = tokio::spawn(async move {
            worker.run().await;
        });

        info!(
            target: "mechanics::worker",
            command_buffer_size,
            event_buffer_size,
            "runtime started"
        );

        Ok(Runtime { handle, worker })
    }
}
