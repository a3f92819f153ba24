//! Player-selected combat stances.

/// Trade-off between damage dealt and damage taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FightMode {
    FullAttack,
    #[default]
    Balanced,
    FullDefense,
}

impl FightMode {
    /// Outgoing damage as a percentage of the base value.
    pub fn attack_percent(self) -> u32 {
        match self {
            Self::FullAttack => 120,
            Self::Balanced => 100,
            Self::FullDefense => 60,
        }
    }

    /// Incoming damage as a percentage of the base value.
    pub fn defense_percent(self) -> u32 {
        match self {
            Self::FullAttack => 100,
            Self::Balanced => 80,
            Self::FullDefense => 50,
        }
    }
}

/// How a combatant moves relative to its attack target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChaseMode {
    #[default]
    Stand,
    Chase,
    KeepDistance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatModes {
    pub fight: FightMode,
    pub chase: ChaseMode,
    /// Prevents attacking other players.
    pub safe_mode_on: bool,
}

impl CombatModes {
    pub fn new(fight: FightMode, chase: ChaseMode, safe_mode_on: bool) -> Self {
        Self {
            fight,
            chase,
            safe_mode_on,
        }
    }
}
