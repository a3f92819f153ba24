//! Attack/defense credit ledger.

use crate::error::{ErrorSeverity, GameError};

/// Which of a combatant's two credit counters an operation touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatCreditType {
    Attack,
    Defense,
}

/// A bounded counter: `0 <= current <= maximum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreditMeter {
    current: u32,
    maximum: u32,
}

impl CreditMeter {
    /// A full meter.
    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CreditError {
    #[error("{0:?} credit maximum must be positive")]
    ZeroMaximum(CombatCreditType),

    #[error("no {0:?} credits available")]
    NoCreditsAvailable(CombatCreditType),
}

impl GameError for CreditError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ZeroMaximum(_) => ErrorSeverity::Validation,
            Self::NoCreditsAvailable(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroMaximum(_) => "CREDIT_ZERO_MAXIMUM",
            Self::NoCreditsAvailable(_) => "CREDIT_NONE_AVAILABLE",
        }
    }
}

/// Both credit counters of one combatant, plus the "restore chain running"
/// flag for each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatCredits {
    attack: CreditMeter,
    defense: CreditMeter,
    restoring_attack: bool,
    restoring_defense: bool,
}

impl CombatCredits {
    /// Creates full counters. Both maxima must be positive.
    pub fn new(attack_maximum: u32, defense_maximum: u32) -> Result<Self, CreditError> {
        if attack_maximum == 0 {
            return Err(CreditError::ZeroMaximum(CombatCreditType::Attack));
        }
        if defense_maximum == 0 {
            return Err(CreditError::ZeroMaximum(CombatCreditType::Defense));
        }

        Ok(Self {
            attack: CreditMeter::full(attack_maximum),
            defense: CreditMeter::full(defense_maximum),
            restoring_attack: false,
            restoring_defense: false,
        })
    }

    pub fn meter(&self, kind: CombatCreditType) -> CreditMeter {
        match kind {
            CombatCreditType::Attack => self.attack,
            CombatCreditType::Defense => self.defense,
        }
    }

    pub fn current(&self, kind: CombatCreditType) -> u32 {
        self.meter(kind).current
    }

    pub fn maximum(&self, kind: CombatCreditType) -> u32 {
        self.meter(kind).maximum
    }

    pub fn is_full(&self, kind: CombatCreditType) -> bool {
        self.meter(kind).is_full()
    }

    /// Spends one credit, returning the remaining amount.
    pub fn spend(&mut self, kind: CombatCreditType) -> Result<u32, CreditError> {
        let meter = self.meter_mut(kind);
        if meter.current == 0 {
            return Err(CreditError::NoCreditsAvailable(kind));
        }

        meter.current -= 1;
        Ok(meter.current)
    }

    /// Adds `amount` credits, clamped at the maximum. Returns the new amount.
    pub fn restore(&mut self, kind: CombatCreditType, amount: u32) -> u32 {
        let meter = self.meter_mut(kind);
        meter.current = meter.current.saturating_add(amount).min(meter.maximum);
        meter.current
    }

    /// Returns true while a restore chain is scheduled for `kind`.
    pub fn is_restoring(&self, kind: CombatCreditType) -> bool {
        match kind {
            CombatCreditType::Attack => self.restoring_attack,
            CombatCreditType::Defense => self.restoring_defense,
        }
    }

    pub fn set_restoring(&mut self, kind: CombatCreditType, restoring: bool) {
        match kind {
            CombatCreditType::Attack => self.restoring_attack = restoring,
            CombatCreditType::Defense => self.restoring_defense = restoring,
        }
    }

    fn meter_mut(&mut self, kind: CombatCreditType) -> &mut CreditMeter {
        match kind {
            CombatCreditType::Attack => &mut self.attack,
            CombatCreditType::Defense => &mut self.defense,
        }
    }
}
