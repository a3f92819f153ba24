//! One step of a combat credit restore chain.

use std::time::Duration;

use mechanics_core::{CombatCreditType, CreatureId};
use tracing::debug;

use crate::operation::{Operation, OperationContext, OperationError};
use crate::regeneration::{Recurrence, restore_step};

/// Restores one combat credit and reschedules itself while the meter has room.
///
/// Restore steps are never throttled and never cancelled; the chain stops on
/// its own when the meter is full or the combatant is gone.
#[derive(Debug, Clone)]
pub struct RestoreCombatCreditOperation {
    combatant: CreatureId,
    credit: CombatCreditType,
    interval: Duration,
}

impl RestoreCombatCreditOperation {
    pub const NAME: &'static str = "restore_combat_credit";

    pub fn new(
        combatant: CreatureId,
        credit: CombatCreditType,
        interval: Duration,
    ) -> Result<Self, OperationError> {
        Ok(Self {
            combatant: OperationError::require_combatant(Self::NAME, combatant)?,
            credit,
            interval,
        })
    }

    pub fn combatant(&self) -> CreatureId {
        self.combatant
    }

    pub fn credit(&self) -> CombatCreditType {
        self.credit
    }
}

impl Operation for RestoreCombatCreditOperation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requestor(&self) -> CreatureId {
        self.combatant
    }

    fn can_be_cancelled(&self) -> bool {
        false
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError> {
        let Some(creature) = ctx.world_mut().creature_mut(self.combatant) else {
            debug!(
                target: "mechanics::combat",
                combatant = %self.combatant,
                "restore chain ended, combatant gone"
            );
            return Ok(());
        };

        if creature.is_dead() {
            creature.combat_mut().credits.set_restoring(self.credit, false);
            return Ok(());
        }

        let (current, recurrence) =
            restore_step(&mut creature.combat_mut().credits, self.credit, self.interval);

        debug!(
            target: "mechanics::combat",
            combatant = %self.combatant,
            credit = <&'static str>::from(self.credit),
            current,
            "credit restored"
        );
        ctx.combat_api()
            .combat_credits_changed(self.combatant, self.credit, current);

        if let Recurrence::Continue { after } = recurrence {
            ctx.schedule(*self, after);
        }

        Ok(())
    }
}
