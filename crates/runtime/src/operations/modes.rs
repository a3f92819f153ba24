use mechanics_core::{CombatModes, CreatureId};
use tracing::trace;

use crate::operation::{Operation, OperationContext, OperationError};

/// Replaces a combatant's fight, chase and safe modes.
#[derive(Debug, Clone)]
pub struct ChangeModesOperation {
    combatant: CreatureId,
    modes: CombatModes,
}

impl ChangeModesOperation {
    pub const NAME: &'static str = "change_modes";

    pub fn new(combatant: CreatureId, modes: CombatModes) -> Result<Self, OperationError> {
        Ok(Self {
            combatant: OperationError::require_combatant(Self::NAME, combatant)?,
            modes,
        })
    }
}

impl Operation for ChangeModesOperation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requestor(&self) -> CreatureId {
        self.combatant
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError> {
        let combat = ctx.creature_mut(self.combatant)?.combat_mut();
        if combat.modes == self.modes {
            return Ok(());
        }
        combat.modes = self.modes;

        trace!(
            target: "mechanics::combat",
            combatant = %self.combatant,
            fight = <&'static str>::from(self.modes.fight),
            chase = <&'static str>::from(self.modes.chase),
            safe = self.modes.safe_mode_on,
            "modes changed"
        );
        ctx.combat_api()
            .combat_modes_changed(self.combatant, self.modes);

        Ok(())
    }
}
