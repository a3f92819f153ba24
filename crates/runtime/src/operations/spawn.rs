use std::time::Duration;

use mechanics_core::{CreatureDescriptor, CreatureId};
use tracing::warn;

use super::UpdateAwarenessOperation;
use crate::operation::{Operation, OperationContext, OperationError};

/// Builds a creature through the creature factory and places it in the world.
///
/// The newcomer and every spectator around it refresh their awareness on the
/// next tick.
#[derive(Debug, Clone)]
pub struct SpawnCreatureOperation {
    descriptor: CreatureDescriptor,
}

impl SpawnCreatureOperation {
    pub const NAME: &'static str = "spawn_creature";

    pub fn new(descriptor: CreatureDescriptor) -> Self {
        Self { descriptor }
    }
}

impl Operation for SpawnCreatureOperation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requestor(&self) -> CreatureId {
        CreatureId::NONE
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError> {
        let creature = ctx
            .creature_factory()
            .create(self.descriptor, ctx.config())?;
        let id = creature.id();
        let location = creature.location();
        let snapshot = creature.snapshot();

        if let Some(replaced) = ctx.world_mut().insert(creature) {
            warn!(
                target: "mechanics::worker",
                creature = %id,
                replaced = %replaced.describe(),
                "spawn replaced an existing creature"
            );
        }

        ctx.game_api().creature_spawned(&snapshot);

        let range = ctx.config().sense_range;
        let spectators = ctx.world().spectators(location, &range);
        for (spectator, _) in spectators {
            ctx.schedule(UpdateAwarenessOperation::new(spectator)?, Duration::ZERO);
        }

        Ok(())
    }
}
