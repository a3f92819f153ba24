//! Time-ordered operation scheduling over the creature mechanics.
//!
//! This crate turns the rules of `mechanics-core` into scheduled work. Every
//! world mutation is an [`Operation`] run by a single-consumer [`Scheduler`];
//! many producers feed it concurrently through cloneable [`RuntimeHandle`]s,
//! and effects flow back out through the [`CombatApi`]/[`GameApi`]
//! notification surfaces onto a topic-based [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the handle and error types downstream clients use
//! - [`operation`] and [`scheduler`] define the unit of work and its executor
//! - [`operations`] and [`regeneration`] hold the concrete game operations
//! - [`factory`] and [`world`] are the collaborator seams operations rely on
//! - [`events`] provides the notification APIs and the event bus
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod factory;
pub mod operation;
pub mod operations;
pub mod regeneration;
pub mod runtime;
pub mod scheduler;
pub mod world;

mod workers;

#[cfg(test)]
mod testing;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{
    AwarenessEvent, CombatApi, CombatEvent, CreatureEvent, Event, EventBus, EventBusNotifier,
    GameApi, Notification, RecordingNotifier, SchedulerEvent, Topic,
};
pub use factory::{
    CreatureFactory, DefaultCreatureFactory, DefaultOperationFactory, OperationFactory,
    OperationRequest,
};
pub use operation::{
    Collaborators, Operation, OperationContext, OperationError, OperationHandle, OperationId,
    OperationIdIssuer, OperationState,
};
pub use operations::{
    AttackOperation, ChangeModesOperation, RestoreCombatCreditOperation,
    SetAttackTargetOperation, SetFollowTargetOperation, SpawnCreatureOperation,
    UpdateAwarenessOperation,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scheduler::{OperationOutcome, Scheduler, TickOutcome, TickReport};
pub use world::{CreatureRegistry, GameWorld, InMemoryWorld, MapDescriptor};
