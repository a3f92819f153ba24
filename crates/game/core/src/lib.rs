//! Deterministic creature mechanics shared by the scheduler runtime.
//!
//! `mechanics-core` defines the rules that operations apply to the world:
//! visibility and awareness, skill progression, combat credits and modes,
//! exhaustion cooldowns, and the creature model that carries all of them.
//! Everything here is synchronous and side-effect free apart from the
//! registered listener callbacks; scheduling and collaborator wiring live in
//! `mechanics-runtime`.
pub mod awareness;
pub mod combat;
pub mod config;
pub mod error;
pub mod exhaustion;
pub mod listeners;
pub mod skills;
pub mod state;

pub use awareness::{Awareness, AwarenessChange, AwarenessLevel, SensingTransitions, can_see};
pub use combat::{
    AttackOutcome, ChaseMode, CombatCreditType, CombatCredits, CombatModes, CombatState,
    CreditError, CreditMeter, FightMode, calculate_damage,
};
pub use config::{MechanicsConfig, SenseRange};
pub use error::{ErrorSeverity, GameError};
pub use exhaustion::{ExhaustionPolicy, ExhaustionTracker, ExhaustionType};
pub use listeners::Listeners;
pub use skills::{Skill, SkillChanged, SkillError, SkillSpec, SkillType};
pub use state::{
    Creature, CreatureDescriptor, CreatureError, CreatureId, CreatureIdIssuer, CreatureSnapshot,
    CreatureStat, Location, Stat, StatChanged, Tick,
};
