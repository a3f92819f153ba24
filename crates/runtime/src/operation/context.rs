//! Collaborators injected into an operation at execution time.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use mechanics_core::{Creature, CreatureId, MechanicsConfig, Tick};

use super::{Operation, OperationError, OperationHandle, OperationId};
use crate::events::{CombatApi, GameApi};
use crate::factory::{
    CreatureFactory, DefaultCreatureFactory, DefaultOperationFactory, OperationFactory,
    OperationRequest,
};
use crate::scheduler::Timeline;
use crate::world::GameWorld;

/// Long-lived capabilities shared by every operation.
///
/// The world is not part of this bundle: it is owned by the scheduler worker
/// and lent to each operation for the duration of one execution.
#[derive(Clone)]
pub struct Collaborators {
    pub config: MechanicsConfig,
    pub creature_factory: Arc<dyn CreatureFactory>,
    pub operation_factory: Arc<dyn OperationFactory>,
    pub game_api: Arc<dyn GameApi>,
    pub combat_api: Arc<dyn CombatApi>,
}

impl Collaborators {
    /// Default factories with one notifier serving both API surfaces.
    pub fn with_notifier<N>(config: MechanicsConfig, notifier: Arc<N>) -> Self
    where
        N: GameApi + CombatApi + 'static,
    {
        Self {
            creature_factory: Arc::new(DefaultCreatureFactory::new()),
            operation_factory: Arc::new(DefaultOperationFactory::new(config.clone())),
            game_api: notifier.clone(),
            combat_api: notifier,
            config,
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Everything an executing operation may touch.
pub struct OperationContext<'a> {
    now: Tick,
    operation_id: OperationId,
    timeline: &'a mut Timeline,
    world: &'a mut dyn GameWorld,
    collaborators: &'a Collaborators,
}

impl<'a> OperationContext<'a> {
    pub(crate) fn new(
        now: Tick,
        operation_id: OperationId,
        timeline: &'a mut Timeline,
        world: &'a mut dyn GameWorld,
        collaborators: &'a Collaborators,
    ) -> Self {
        Self {
            now,
            operation_id,
            timeline,
            world,
            collaborators,
        }
    }

    /// Simulated time of the tick this operation runs in.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Id of the executing operation.
    pub fn operation_id(&self) -> OperationId {
        self.operation_id
    }

    /// Schedules a follow-up operation `delay` after the current tick.
    ///
    /// The follow-up never runs within the current tick, even with a zero delay.
    pub fn schedule(&mut self, operation: impl Operation, delay: Duration) -> OperationHandle {
        self.timeline.schedule(Box::new(operation), delay)
    }

    /// Builds a follow-up through the operation factory and schedules it.
    pub fn submit(
        &mut self,
        request: OperationRequest,
        delay: Duration,
    ) -> Result<OperationHandle, OperationError> {
        let operation = self.collaborators.operation_factory.create(request)?;
        Ok(self.timeline.schedule(operation, delay))
    }

    /// Cancels a pending operation. Returns false for the executing operation
    /// itself, for non-cancellable operations, and for unknown ids.
    pub fn cancel(&mut self, id: OperationId) -> bool {
        self.timeline.cancel(id)
    }

    pub fn world(&self) -> &dyn GameWorld {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut dyn GameWorld {
        &mut *self.world
    }

    /// Looks up a creature, failing with `CreatureNotFound`.
    pub fn creature(&self, id: CreatureId) -> Result<&Creature, OperationError> {
        self.world
            .creature(id)
            .ok_or(OperationError::CreatureNotFound(id))
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Result<&mut Creature, OperationError> {
        self.world
            .creature_mut(id)
            .ok_or(OperationError::CreatureNotFound(id))
    }

    /// Looks up a creature that must still be alive.
    pub fn living_creature(&self, id: CreatureId) -> Result<&Creature, OperationError> {
        let creature = self.creature(id)?;
        if creature.is_dead() {
            return Err(OperationError::CreatureDead(id));
        }
        Ok(creature)
    }

    pub fn config(&self) -> &MechanicsConfig {
        &self.collaborators.config
    }

    pub fn creature_factory(&self) -> &dyn CreatureFactory {
        self.collaborators.creature_factory.as_ref()
    }

    pub fn game_api(&self) -> &dyn GameApi {
        self.collaborators.game_api.as_ref()
    }

    pub fn combat_api(&self) -> &dyn CombatApi {
        self.collaborators.combat_api.as_ref()
    }
}
