//! Upward notification surfaces called by operations.
//!
//! Calls are fire-and-forget: implementations must not block and must not
//! fail back into the caller. Persistence, packet emission, and similar
//! concerns live behind these traits.

use mechanics_core::{
    AttackOutcome, CombatCreditType, CombatModes, CreatureId, CreatureSnapshot, SkillChanged,
    StatChanged,
};

/// Combat-side effects of executed operations.
pub trait CombatApi: Send + Sync {
    fn combatant_death(&self, combatant: CreatureId);

    fn attack_target_changed(
        &self,
        combatant: CreatureId,
        previous: Option<CreatureId>,
        current: Option<CreatureId>,
    );

    fn follow_target_changed(
        &self,
        combatant: CreatureId,
        previous: Option<CreatureId>,
        current: Option<CreatureId>,
    );

    fn creature_seen(&self, observer: CreatureId, target: CreatureId);

    fn creature_lost(&self, observer: CreatureId, target: CreatureId);

    fn combat_modes_changed(&self, combatant: CreatureId, modes: CombatModes);

    fn combat_credits_changed(&self, combatant: CreatureId, credit: CombatCreditType, current: u32);

    fn attack_resolved(&self, attacker: CreatureId, target: CreatureId, outcome: AttackOutcome);
}

/// World-side effects of executed operations.
pub trait GameApi: Send + Sync {
    fn creature_spawned(&self, creature: &CreatureSnapshot);

    fn stat_changed(&self, change: &StatChanged);

    fn skill_changed(&self, change: &SkillChanged);
}
