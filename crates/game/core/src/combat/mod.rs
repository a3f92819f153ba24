//! Combatant state and pure combat rules.
//!
//! Every creature carries a [`CombatState`]: its credit ledger, its chosen
//! stances, and whom it attacks or follows. Operations in the runtime mutate
//! this state; the rules for how much damage a hit deals live in [`damage`].
//!
//! # Credit admission
//!
//! An attack spends one attack credit; a defender blocks by spending one
//! defense credit. Spent credits come back one at a time through a chain of
//! restore operations that stops once the counter is full.

pub mod credits;
pub mod damage;
pub mod modes;

pub use credits::{CombatCreditType, CombatCredits, CreditError, CreditMeter};
pub use damage::calculate_damage;
pub use modes::{ChaseMode, CombatModes, FightMode};

use crate::state::CreatureId;

/// Result of a resolved attack, from the defender's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// The defender spent a defense credit.
    Blocked,
    /// The defender took damage and survived.
    Hit { damage: u32, remaining: u32 },
    /// The hit brought the defender to zero hitpoints.
    Killed { damage: u32 },
}

impl AttackOutcome {
    pub fn damage(&self) -> u32 {
        match *self {
            Self::Blocked => 0,
            Self::Hit { damage, .. } | Self::Killed { damage } => damage,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatState {
    pub credits: CombatCredits,
    pub modes: CombatModes,
    attack_target: Option<CreatureId>,
    follow_target: Option<CreatureId>,
}

impl CombatState {
    pub fn new(credits: CombatCredits) -> Self {
        Self {
            credits,
            modes: CombatModes::default(),
            attack_target: None,
            follow_target: None,
        }
    }

    pub fn attack_target(&self) -> Option<CreatureId> {
        self.attack_target
    }

    pub fn follow_target(&self) -> Option<CreatureId> {
        self.follow_target
    }

    /// Replaces the attack target, returning the previous one.
    pub fn set_attack_target(&mut self, target: Option<CreatureId>) -> Option<CreatureId> {
        std::mem::replace(&mut self.attack_target, target)
    }

    /// Replaces the follow target, returning the previous one.
    pub fn set_follow_target(&mut self, target: Option<CreatureId>) -> Option<CreatureId> {
        std::mem::replace(&mut self.follow_target, target)
    }

    /// Clears any target pointing at `creature`.
    ///
    /// Returns `(attack_cleared, follow_cleared)`.
    pub fn forget(&mut self, creature: CreatureId) -> (bool, bool) {
        let attack = self.attack_target == Some(creature);
        let follow = self.follow_target == Some(creature);

        if attack {
            self.attack_target = None;
        }
        if follow {
            self.follow_target = None;
        }

        (attack, follow)
    }
}
