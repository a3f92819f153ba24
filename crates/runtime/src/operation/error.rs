use mechanics_core::{CreatureError, CreatureId, CreditError, ErrorSeverity, GameError};

/// Errors raised while building or executing an operation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum OperationError {
    #[error("{operation} requires a combatant")]
    NullCombatant { operation: &'static str },

    #[error("creature {0} targets itself")]
    SelfTarget(CreatureId),

    #[error("creature {0} not found")]
    CreatureNotFound(CreatureId),

    #[error("creature {0} is dead")]
    CreatureDead(CreatureId),

    #[error("creature {observer} cannot see {target}")]
    TargetNotVisible {
        observer: CreatureId,
        target: CreatureId,
    },

    #[error(transparent)]
    Credits(#[from] CreditError),

    #[error(transparent)]
    Creature(#[from] CreatureError),

    #[error("{operation} panicked: {message}")]
    Panicked {
        operation: &'static str,
        message: String,
    },
}

impl GameError for OperationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NullCombatant { .. } | Self::SelfTarget(_) => ErrorSeverity::Validation,
            Self::CreatureNotFound(_) | Self::CreatureDead(_) | Self::TargetNotVisible { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::Credits(err) => err.severity(),
            Self::Creature(err) => err.severity(),
            Self::Panicked { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NullCombatant { .. } => "OPERATION_NULL_COMBATANT",
            Self::SelfTarget(_) => "OPERATION_SELF_TARGET",
            Self::CreatureNotFound(_) => "OPERATION_CREATURE_NOT_FOUND",
            Self::CreatureDead(_) => "OPERATION_CREATURE_DEAD",
            Self::TargetNotVisible { .. } => "OPERATION_TARGET_NOT_VISIBLE",
            Self::Credits(err) => err.error_code(),
            Self::Creature(err) => err.error_code(),
            Self::Panicked { .. } => "OPERATION_PANICKED",
        }
    }
}

impl OperationError {
    /// Rejects the null creature id for a required combatant.
    pub fn require_combatant(
        operation: &'static str,
        combatant: CreatureId,
    ) -> Result<CreatureId, Self> {
        if combatant.is_none() {
            Err(Self::NullCombatant { operation })
        } else {
            Ok(combatant)
        }
    }
}
