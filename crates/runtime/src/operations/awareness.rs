//! Refreshes what a creature senses from the spectators around it.

use std::collections::BTreeSet;

use mechanics_core::{AwarenessChange, CreatureId};
use tracing::trace;

use crate::operation::{Operation, OperationContext, OperationError};

/// Starts sensing every creature the map reports within sensing range of the
/// observer, and stops sensing tracked creatures it no longer reports.
///
/// `Seen` and `Lost` transitions are forwarded to the combat API. Losing a
/// creature also clears it as the observer's attack or follow target.
#[derive(Debug, Clone)]
pub struct UpdateAwarenessOperation {
    observer: CreatureId,
}

impl UpdateAwarenessOperation {
    pub const NAME: &'static str = "update_awareness";

    pub fn new(observer: CreatureId) -> Result<Self, OperationError> {
        Ok(Self {
            observer: OperationError::require_combatant(Self::NAME, observer)?,
        })
    }
}

impl Operation for UpdateAwarenessOperation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requestor(&self) -> CreatureId {
        self.observer
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError> {
        let observer = self.observer;
        let center = ctx.creature(observer)?.location();
        let range = ctx.config().sense_range;
        let spectators = ctx.world().spectators(center, &range);
        let reported: BTreeSet<CreatureId> = spectators.iter().map(|(id, _)| *id).collect();

        let creature = ctx.creature_mut(observer)?;

        let mut seen = Vec::new();
        for (target, target_at) in spectators {
            for change in creature
                .awareness_mut()
                .start_sensing(center, target, target_at)
            {
                if let AwarenessChange::Seen { target, .. } = change {
                    seen.push(target);
                }
            }
        }

        let stale: Vec<CreatureId> = creature
            .awareness()
            .tracked()
            .map(|(id, _)| id)
            .filter(|id| !reported.contains(id))
            .collect();

        let mut lost = Vec::new();
        let mut cleared = Vec::new();
        for target in stale {
            if creature.awareness_mut().stop_sensing(target).is_some() {
                lost.push(target);
                cleared.push((target, creature.combat_mut().forget(target)));
            }
        }

        trace!(
            target: "mechanics::awareness",
            observer = %observer,
            seen = seen.len(),
            lost = lost.len(),
            tracked = creature.awareness().len(),
            "awareness updated"
        );

        let api = ctx.combat_api();
        for target in seen {
            api.creature_seen(observer, target);
        }
        for target in lost {
            api.creature_lost(observer, target);
        }
        for (target, (attack, follow)) in cleared {
            if attack {
                api.attack_target_changed(observer, Some(target), None);
            }
            if follow {
                api.follow_target_changed(observer, Some(target), None);
            }
        }

        Ok(())
    }
}
