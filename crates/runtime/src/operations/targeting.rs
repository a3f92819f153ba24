//! Attack and follow target selection.

use mechanics_core::{CombatState, CreatureId};
use tracing::trace;

use crate::operation::{Operation, OperationContext, OperationError};

#[derive(Debug, Clone, Copy)]
enum Slot {
    Attack,
    Follow,
}

impl Slot {
    fn replace(self, combat: &mut CombatState, target: Option<CreatureId>) -> Option<CreatureId> {
        match self {
            Self::Attack => combat.set_attack_target(target),
            Self::Follow => combat.set_follow_target(target),
        }
    }
}

fn retarget(
    ctx: &mut OperationContext<'_>,
    slot: Slot,
    combatant: CreatureId,
    target: Option<CreatureId>,
) -> Result<(), OperationError> {
    let creature = ctx.living_creature(combatant)?;

    if let Some(target) = target.filter(|&target| !creature.awareness().has_seen(target)) {
        return Err(OperationError::TargetNotVisible {
            observer: combatant,
            target,
        });
    }

    let previous = slot.replace(ctx.creature_mut(combatant)?.combat_mut(), target);
    if previous == target {
        return Ok(());
    }

    trace!(
        target: "mechanics::combat",
        combatant = %combatant,
        ?slot,
        ?previous,
        ?target,
        "target changed"
    );

    let api = ctx.combat_api();
    match slot {
        Slot::Attack => api.attack_target_changed(combatant, previous, target),
        Slot::Follow => api.follow_target_changed(combatant, previous, target),
    }

    Ok(())
}

fn validate(
    operation: &'static str,
    combatant: CreatureId,
    target: Option<CreatureId>,
) -> Result<(CreatureId, Option<CreatureId>), OperationError> {
    let combatant = OperationError::require_combatant(operation, combatant)?;
    // The null id clears the target.
    let target = target.filter(|target| !target.is_none());
    if target == Some(combatant) {
        return Err(OperationError::SelfTarget(combatant));
    }
    Ok((combatant, target))
}

/// Chooses (or clears) whom a combatant attacks.
///
/// A new target must already be `Seen` by the combatant.
#[derive(Debug, Clone)]
pub struct SetAttackTargetOperation {
    combatant: CreatureId,
    target: Option<CreatureId>,
}

impl SetAttackTargetOperation {
    pub const NAME: &'static str = "set_attack_target";

    pub fn new(combatant: CreatureId, target: Option<CreatureId>) -> Result<Self, OperationError> {
        let (combatant, target) = validate(Self::NAME, combatant, target)?;
        Ok(Self { combatant, target })
    }
}

impl Operation for SetAttackTargetOperation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requestor(&self) -> CreatureId {
        self.combatant
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError> {
        retarget(ctx, Slot::Attack, self.combatant, self.target)
    }
}

/// Chooses (or clears) whom a combatant follows.
#[derive(Debug, Clone)]
pub struct SetFollowTargetOperation {
    combatant: CreatureId,
    target: Option<CreatureId>,
}

impl SetFollowTargetOperation {
    pub const NAME: &'static str = "set_follow_target";

    pub fn new(combatant: CreatureId, target: Option<CreatureId>) -> Result<Self, OperationError> {
        let (combatant, target) = validate(Self::NAME, combatant, target)?;
        Ok(Self { combatant, target })
    }
}

impl Operation for SetFollowTargetOperation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requestor(&self) -> CreatureId {
        self.combatant
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError> {
        retarget(ctx, Slot::Follow, self.combatant, self.target)
    }
}
