//! API implementations that forward notifications onto the event bus.

use mechanics_core::{
    AttackOutcome, CombatCreditType, CombatModes, CreatureId, CreatureSnapshot, SkillChanged,
    StatChanged,
};
use tracing::{debug, trace};

use super::api::{CombatApi, GameApi};
use super::bus::{Event, EventBus};
use super::types::{AwarenessEvent, CombatEvent, CreatureEvent};

/// Publishes every notification as an [`Event`] on its topic.
#[derive(Clone, Default)]
pub struct EventBusNotifier {
    bus: EventBus,
}

impl EventBusNotifier {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

impl CombatApi for EventBusNotifier {
    fn combatant_death(&self, combatant: CreatureId) {
        debug!(target: "mechanics::combat", combatant = %combatant, "combatant died");
        self.bus
            .publish(Event::Combat(CombatEvent::Death { combatant }));
    }

    fn attack_target_changed(
        &self,
        combatant: CreatureId,
        previous: Option<CreatureId>,
        current: Option<CreatureId>,
    ) {
        self.bus
            .publish(Event::Combat(CombatEvent::AttackTargetChanged {
                combatant,
                previous,
                current,
            }));
    }

    fn follow_target_changed(
        &self,
        combatant: CreatureId,
        previous: Option<CreatureId>,
        current: Option<CreatureId>,
    ) {
        self.bus
            .publish(Event::Combat(CombatEvent::FollowTargetChanged {
                combatant,
                previous,
                current,
            }));
    }

    fn creature_seen(&self, observer: CreatureId, target: CreatureId) {
        trace!(target: "mechanics::awareness", observer = %observer, creature = %target, "seen");
        self.bus
            .publish(Event::Awareness(AwarenessEvent::Seen { observer, target }));
    }

    fn creature_lost(&self, observer: CreatureId, target: CreatureId) {
        trace!(target: "mechanics::awareness", observer = %observer, creature = %target, "lost");
        self.bus
            .publish(Event::Awareness(AwarenessEvent::Lost { observer, target }));
    }

    fn combat_modes_changed(&self, combatant: CreatureId, modes: CombatModes) {
        self.bus
            .publish(Event::Combat(CombatEvent::ModesChanged { combatant, modes }));
    }

    fn combat_credits_changed(&self, combatant: CreatureId, credit: CombatCreditType, current: u32) {
        self.bus.publish(Event::Combat(CombatEvent::CreditsChanged {
            combatant,
            credit,
            current,
        }));
    }

    fn attack_resolved(&self, attacker: CreatureId, target: CreatureId, outcome: AttackOutcome) {
        self.bus.publish(Event::Combat(CombatEvent::AttackResolved {
            attacker,
            target,
            outcome,
        }));
    }
}

impl GameApi for EventBusNotifier {
    fn creature_spawned(&self, creature: &CreatureSnapshot) {
        debug!(
            target: "mechanics::worker",
            creature = %creature.id,
            name = %creature.name,
            location = %creature.location,
            "creature spawned"
        );
        self.bus
            .publish(Event::Creature(CreatureEvent::Spawned(creature.clone())));
    }

    fn stat_changed(&self, change: &StatChanged) {
        self.bus
            .publish(Event::Creature(CreatureEvent::StatChanged(*change)));
    }

    fn skill_changed(&self, change: &SkillChanged) {
        self.bus
            .publish(Event::Creature(CreatureEvent::SkillChanged(*change)));
    }
}
