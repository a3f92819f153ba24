//! A tiny arena and a naive AI so the binary has something to schedule.
use std::time::Duration;

use anyhow::Result;
use mechanics_core::{
    Creature, CreatureDescriptor, CreatureId, Location, MechanicsConfig, SkillSpec, SkillType,
};
use mechanics_runtime::{InMemoryWorld, OperationRequest, RuntimeError, RuntimeHandle};
use tracing::{debug, warn};

pub const KNIGHT: CreatureId = CreatureId(1);
pub const ORC: CreatureId = CreatureId(2);
pub const WOLF: CreatureId = CreatureId(3);

/// Pause between the first awareness pass and picking targets.
const TARGETING_DELAY: Duration = Duration::from_millis(100);

/// (attacker, target) pairs the AI keeps swinging with.
const RIVALRIES: [(CreatureId, CreatureId, SkillType); 3] = [
    (KNIGHT, ORC, SkillType::Sword),
    (ORC, KNIGHT, SkillType::Axe),
    (WOLF, KNIGHT, SkillType::Fist),
];

pub fn demo_world(config: &MechanicsConfig) -> Result<InMemoryWorld> {
    let knight = Creature::new(
        KNIGHT,
        CreatureDescriptor::new("knight", 150, Location::new(100, 100, 7))
            .with_article("a")
            .with_credits(1, 2)
            .with_skill(SkillSpec::starting(SkillType::Sword))
            .with_skill(SkillSpec::starting(SkillType::Shield)),
        config,
    )?;
    let orc = Creature::new(
        ORC,
        CreatureDescriptor::new("orc", 120, Location::new(101, 100, 7))
            .with_article("an")
            .with_skill(SkillSpec::starting(SkillType::Axe)),
        config,
    )?;
    let wolf = Creature::new(
        WOLF,
        CreatureDescriptor::new("wolf", 60, Location::new(103, 102, 7))
            .with_article("a")
            .with_credits(2, 1),
        config,
    )?;

    Ok(InMemoryWorld::with_creatures([knight, orc, wolf]))
}

/// Lets every demo creature notice the others, then locks in targets.
pub async fn introduce(handle: &RuntimeHandle) -> Result<(), RuntimeError> {
    for observer in [KNIGHT, ORC, WOLF] {
        handle
            .submit(OperationRequest::UpdateAwareness { observer }, Duration::ZERO)
            .await?;
    }

    for (combatant, target, _) in RIVALRIES {
        handle
            .submit(
                OperationRequest::SetAttackTarget {
                    combatant,
                    target: Some(target),
                },
                TARGETING_DELAY,
            )
            .await?;
    }

    Ok(())
}

/// Submits one attack per rivalry every `tick` until the runtime goes away.
///
/// Attacks that arrive while the attacker is exhausted get deferred by the
/// scheduler; the AI doesn't track cooldowns itself.
pub async fn run_ai(handle: RuntimeHandle, tick: Duration) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await;

    loop {
        interval.tick().await;

        for (attacker, target, skill) in RIVALRIES {
            let request = OperationRequest::Attack {
                attacker,
                target,
                skill,
            };
            match handle.submit(request, Duration::ZERO).await {
                Ok(submitted) => {
                    debug!(target: "server::ai", id = %submitted.id, %attacker, defender = %target, "attack submitted");
                }
                Err(RuntimeError::CommandChannelClosed | RuntimeError::ReplyChannelClosed(_)) => {
                    debug!(target: "server::ai", "runtime stopped, AI exiting");
                    return;
                }
                Err(error) => {
                    warn!(target: "server::ai", %attacker, defender = %target, %error, "attack rejected");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mechanics_runtime::CreatureRegistry;

    #[test]
    fn demo_world_places_three_neighbours() {
        let world = demo_world(&MechanicsConfig::default()).unwrap();

        assert_eq!(world.len(), 3);
        assert_eq!(world.ids(), vec![KNIGHT, ORC, WOLF]);
        assert_eq!(world.creature(KNIGHT).unwrap().skill_level(SkillType::Sword), 1);
    }
}
