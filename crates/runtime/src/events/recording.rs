//! In-memory API implementation that records every call.
//!
//! Useful for tests and tools that want to assert on what operations
//! reported without subscribing to the event bus.

use std::sync::Mutex;

use mechanics_core::{
    AttackOutcome, CombatCreditType, CombatModes, CreatureId, CreatureSnapshot, SkillChanged,
    StatChanged,
};

use super::api::{CombatApi, GameApi};

/// One recorded API call.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Death(CreatureId),
    AttackTargetChanged {
        combatant: CreatureId,
        previous: Option<CreatureId>,
        current: Option<CreatureId>,
    },
    FollowTargetChanged {
        combatant: CreatureId,
        previous: Option<CreatureId>,
        current: Option<CreatureId>,
    },
    Seen {
        observer: CreatureId,
        target: CreatureId,
    },
    Lost {
        observer: CreatureId,
        target: CreatureId,
    },
    ModesChanged {
        combatant: CreatureId,
        modes: CombatModes,
    },
    CreditsChanged {
        combatant: CreatureId,
        credit: CombatCreditType,
        current: u32,
    },
    AttackResolved {
        attacker: CreatureId,
        target: CreatureId,
        outcome: AttackOutcome,
    },
    Spawned(CreatureId),
    StatChanged(StatChanged),
    SkillChanged(SkillChanged),
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded call, in order.
    pub fn calls(&self) -> Vec<Notification> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Removes and returns every recorded call.
    pub fn take(&self) -> Vec<Notification> {
        self.calls
            .lock()
            .map(|mut calls| std::mem::take(&mut *calls))
            .unwrap_or_default()
    }

    fn record(&self, notification: Notification) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(notification);
        }
    }
}

impl CombatApi for RecordingNotifier {
    fn combatant_death(&self, combatant: CreatureId) {
        self.record(Notification::Death(combatant));
    }

    fn attack_target_changed(
        &self,
        combatant: CreatureId,
        previous: Option<CreatureId>,
        current: Option<CreatureId>,
    ) {
        self.record(Notification::AttackTargetChanged {
            combatant,
            previous,
            current,
        });
    }

    fn follow_target_changed(
        &self,
        combatant: CreatureId,
        previous: Option<CreatureId>,
        current: Option<CreatureId>,
    ) {
        self.record(Notification::FollowTargetChanged {
            combatant,
            previous,
            current,
        });
    }

    fn creature_seen(&self, observer: CreatureId, target: CreatureId) {
        self.record(Notification::Seen { observer, target });
    }

    fn creature_lost(&self, observer: CreatureId, target: CreatureId) {
        self.record(Notification::Lost { observer, target });
    }

    fn combat_modes_changed(&self, combatant: CreatureId, modes: CombatModes) {
        self.record(Notification::ModesChanged { combatant, modes });
    }

    fn combat_credits_changed(&self, combatant: CreatureId, credit: CombatCreditType, current: u32) {
        self.record(Notification::CreditsChanged {
            combatant,
            credit,
            current,
        });
    }

    fn attack_resolved(&self, attacker: CreatureId, target: CreatureId, outcome: AttackOutcome) {
        self.record(Notification::AttackResolved {
            attacker,
            target,
            outcome,
        });
    }
}

impl GameApi for RecordingNotifier {
    fn creature_spawned(&self, creature: &CreatureSnapshot) {
        self.record(Notification::Spawned(creature.id));
    }

    fn stat_changed(&self, change: &StatChanged) {
        self.record(Notification::StatChanged(*change));
    }

    fn skill_changed(&self, change: &SkillChanged) {
        self.record(Notification::SkillChanged(*change));
    }
}
