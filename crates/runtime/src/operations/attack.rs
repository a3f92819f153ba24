//! Melee attack resolved against combat credits.

use std::time::Duration;

use mechanics_core::{
    AttackOutcome, CombatCreditType, CreatureId, ExhaustionType, SkillType, calculate_damage,
    can_see,
};
use tracing::debug;

use crate::operation::{Operation, OperationContext, OperationError};
use crate::regeneration::restart_chain;

/// Skill count gained by the attacker per resolved attack.
const SKILL_GAIN_PER_ATTACK: f64 = 1.0;

/// One attack from `attacker` on `target`.
///
/// Admission: both creatures alive, the target visible to the attacker, and
/// one attack credit available. The defender blocks with a defense credit if
/// it has one; otherwise it takes damage scaled by both fight modes.
#[derive(Debug, Clone)]
pub struct AttackOperation {
    attacker: CreatureId,
    target: CreatureId,
    skill: SkillType,
    exhaustion: Duration,
}

impl AttackOperation {
    pub const NAME: &'static str = "attack";

    pub fn new(
        attacker: CreatureId,
        target: CreatureId,
        skill: SkillType,
        exhaustion: Duration,
    ) -> Result<Self, OperationError> {
        let attacker = OperationError::require_combatant(Self::NAME, attacker)?;
        let target = OperationError::require_combatant(Self::NAME, target)?;
        if attacker == target {
            return Err(OperationError::SelfTarget(attacker));
        }

        Ok(Self {
            attacker,
            target,
            skill,
            exhaustion,
        })
    }
}

impl Operation for AttackOperation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requestor(&self) -> CreatureId {
        self.attacker
    }

    fn exhaustion_type(&self) -> ExhaustionType {
        ExhaustionType::Combat
    }

    fn exhaustion_cost(&self) -> Duration {
        self.exhaustion
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError> {
        let attacker_at = ctx.living_creature(self.attacker)?.location();
        let target_at = ctx.living_creature(self.target)?.location();
        if !can_see(attacker_at, target_at) {
            return Err(OperationError::TargetNotVisible {
                observer: self.attacker,
                target: self.target,
            });
        }

        let attacker = ctx.creature_mut(self.attacker)?;
        let attack_credits = attacker
            .combat_mut()
            .credits
            .spend(CombatCreditType::Attack)?;
        let skill_level = attacker.skill_level(self.skill);
        let attacker_mode = attacker.combat().modes.fight;

        ctx.combat_api()
            .combat_credits_changed(self.attacker, CombatCreditType::Attack, attack_credits);
        restart_chain(ctx, self.attacker, CombatCreditType::Attack)?;

        let defender = ctx.creature_mut(self.target)?;
        let outcome = match defender.combat_mut().credits.spend(CombatCreditType::Defense) {
            Ok(defense_credits) => {
                ctx.combat_api().combat_credits_changed(
                    self.target,
                    CombatCreditType::Defense,
                    defense_credits,
                );
                restart_chain(ctx, self.target, CombatCreditType::Defense)?;
                AttackOutcome::Blocked
            }
            Err(_) => {
                let damage =
                    calculate_damage(skill_level, attacker_mode, defender.combat().modes.fight);
                let change = defender.damage(damage);
                let remaining = defender.hitpoints();

                if let Some(change) = change {
                    ctx.game_api().stat_changed(&change);
                }

                if remaining == 0 {
                    ctx.combat_api().combatant_death(self.target);
                    AttackOutcome::Killed { damage }
                } else {
                    AttackOutcome::Hit { damage, remaining }
                }
            }
        };

        if let Some(change) = ctx
            .creature_mut(self.attacker)?
            .train(self.skill, SKILL_GAIN_PER_ATTACK)
        {
            ctx.game_api().skill_changed(&change);
        }

        debug!(
            target: "mechanics::combat",
            attacker = %self.attacker,
            defender = %self.target,
            ?outcome,
            "attack resolved"
        );
        ctx.combat_api()
            .attack_resolved(self.attacker, self.target, outcome);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Notification;
    use crate::operation::OperationIdIssuer;
    use crate::scheduler::{Scheduler, TickOutcome};
    use crate::testing::{collaborators, creature_at};
    use crate::world::{CreatureRegistry, InMemoryWorld};
    use mechanics_core::{CreditError, Location, Tick};

    const ATTACKER: CreatureId = CreatureId(1);
    const TARGET: CreatureId = CreatureId(2);

    fn attack() -> AttackOperation {
        AttackOperation::new(ATTACKER, TARGET, SkillType::Fist, Duration::from_millis(2_000))
            .unwrap()
    }

    fn duel(target_at: Location) -> InMemoryWorld {
        InMemoryWorld::with_creatures([
            creature_at(1, Location::new(100, 100, 7)),
            creature_at(2, target_at),
        ])
    }

    #[test]
    fn construction_rejects_null_and_self_targets() {
        let exhaustion = Duration::from_millis(2_000);

        assert!(matches!(
            AttackOperation::new(CreatureId::NONE, TARGET, SkillType::Fist, exhaustion),
            Err(OperationError::NullCombatant { operation: "attack" })
        ));
        assert!(matches!(
            AttackOperation::new(ATTACKER, ATTACKER, SkillType::Fist, exhaustion),
            Err(OperationError::SelfTarget(ATTACKER))
        ));
    }

    #[test]
    fn defender_blocks_while_it_has_defense_credits() {
        let mut world = duel(Location::new(101, 100, 7));
        let (collaborators, notifier) = collaborators();
        let mut scheduler = Scheduler::new(OperationIdIssuer::new());

        scheduler.schedule(attack(), Duration::ZERO);
        scheduler.run_tick(&mut world, &collaborators);

        let calls = notifier.calls();
        assert_eq!(
            calls.last(),
            Some(&Notification::AttackResolved {
                attacker: ATTACKER,
                target: TARGET,
                outcome: AttackOutcome::Blocked
            })
        );

        let target = world.creature(TARGET).unwrap();
        assert_eq!(target.hitpoints(), 100);
        assert_eq!(target.combat().credits.current(CombatCreditType::Defense), 1);
        assert!(target.combat().credits.is_restoring(CombatCreditType::Defense));

        // One restore chain per spent credit type.
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.next_due(), Some(Tick(1_000)));
    }

    #[test]
    fn undefended_target_takes_damage() {
        let mut world = duel(Location::new(101, 100, 7));
        world
            .creature_mut(TARGET)
            .unwrap()
            .combat_mut()
            .credits
            .spend(CombatCreditType::Defense)
            .unwrap();
        world
            .creature_mut(TARGET)
            .unwrap()
            .combat_mut()
            .credits
            .spend(CombatCreditType::Defense)
            .unwrap();
        let (collaborators, notifier) = collaborators();
        let mut scheduler = Scheduler::new(OperationIdIssuer::new());

        scheduler.schedule(attack(), Duration::ZERO);
        scheduler.run_tick(&mut world, &collaborators);

        // (level 1 + 5) * 100% * 80%
        assert_eq!(world.creature(TARGET).unwrap().hitpoints(), 96);
        assert!(notifier.calls().contains(&Notification::AttackResolved {
            attacker: ATTACKER,
            target: TARGET,
            outcome: AttackOutcome::Hit {
                damage: 4,
                remaining: 96
            }
        }));
    }

    #[test]
    fn attack_without_credits_fails_and_imposes_no_cooldown() {
        let mut world = duel(Location::new(101, 100, 7));
        world
            .creature_mut(ATTACKER)
            .unwrap()
            .combat_mut()
            .credits
            .spend(CombatCreditType::Attack)
            .unwrap();
        let (collaborators, notifier) = collaborators();
        let mut scheduler = Scheduler::new(OperationIdIssuer::new());

        scheduler.schedule(attack(), Duration::ZERO);
        let report = scheduler.run_tick(&mut world, &collaborators);

        assert_eq!(
            report.outcomes[0].result,
            TickOutcome::Failed(OperationError::Credits(CreditError::NoCreditsAvailable(
                CombatCreditType::Attack
            )))
        );
        assert!(notifier.calls().is_empty());
        assert_eq!(
            scheduler
                .exhaustion()
                .exhausted_until(ATTACKER, ExhaustionType::Combat, Tick::ZERO),
            None
        );
    }

    #[test]
    fn invisible_target_cannot_be_attacked() {
        let mut world = duel(Location::new(120, 100, 7));
        let (collaborators, _) = collaborators();
        let mut scheduler = Scheduler::new(OperationIdIssuer::new());

        scheduler.schedule(attack(), Duration::ZERO);
        let report = scheduler.run_tick(&mut world, &collaborators);

        assert_eq!(
            report.outcomes[0].result,
            TickOutcome::Failed(OperationError::TargetNotVisible {
                observer: ATTACKER,
                target: TARGET
            })
        );
    }

    #[test]
    fn lethal_hit_reports_death() {
        let mut world = duel(Location::new(101, 100, 7));
        let target = world.creature_mut(TARGET).unwrap();
        target.damage(98);
        target.combat_mut().credits.spend(CombatCreditType::Defense).unwrap();
        target.combat_mut().credits.spend(CombatCreditType::Defense).unwrap();
        let (collaborators, notifier) = collaborators();
        let mut scheduler = Scheduler::new(OperationIdIssuer::new());

        scheduler.schedule(attack(), Duration::ZERO);
        scheduler.run_tick(&mut world, &collaborators);

        let calls = notifier.calls();
        assert!(calls.contains(&Notification::Death(TARGET)));
        assert_eq!(
            calls.last(),
            Some(&Notification::AttackResolved {
                attacker: ATTACKER,
                target: TARGET,
                outcome: AttackOutcome::Killed { damage: 4 }
            })
        );
        assert!(world.creature(TARGET).unwrap().is_dead());
    }
}
