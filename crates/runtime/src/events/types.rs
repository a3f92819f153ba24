//! Event types for different topics.

use mechanics_core::{
    AttackOutcome, CombatCreditType, CombatModes, CreatureId, CreatureSnapshot, ErrorSeverity,
    SkillChanged, StatChanged, Tick,
};
use serde::{Deserialize, Serialize};

use crate::operation::OperationId;

/// Combat state changes and attack results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    Death {
        combatant: CreatureId,
    },
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
}

/// Awareness transitions that matter outside the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AwarenessEvent {
    Seen {
        observer: CreatureId,
        target: CreatureId,
    },
    Lost {
        observer: CreatureId,
        target: CreatureId,
    },
}

/// Creature lifecycle and progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CreatureEvent {
    Spawned(CreatureSnapshot),
    StatChanged(StatChanged),
    SkillChanged(SkillChanged),
}

/// Scheduler outcomes other than plain completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchedulerEvent {
    OperationFailed {
        id: OperationId,
        operation: String,
        requestor: CreatureId,
        severity: ErrorSeverity,
        code: String,
        error: String,
        at: Tick,
    },
    OperationDeferred {
        id: OperationId,
        operation: String,
        until: Tick,
    },
    OperationDropped {
        id: OperationId,
        operation: String,
        exhausted_until: Tick,
    },
}
