//! Factories for creatures and operations.
//!
//! Producers outside the worker describe work as plain [`OperationRequest`]
//! data; the [`OperationFactory`] validates it and builds the boxed operation.
//! Construction errors surface here, before anything reaches the scheduler.

use mechanics_core::{
    CombatCreditType, CombatModes, Creature, CreatureDescriptor, CreatureError, CreatureId,
    CreatureIdIssuer, MechanicsConfig, SkillType,
};
use serde::{Deserialize, Serialize};

use crate::operation::{Operation, OperationError};
use crate::operations::{
    AttackOperation, ChangeModesOperation, RestoreCombatCreditOperation,
    SetAttackTargetOperation, SetFollowTargetOperation, SpawnCreatureOperation,
    UpdateAwarenessOperation,
};

/// Builds creatures and assigns their ids.
pub trait CreatureFactory: Send + Sync {
    fn create(
        &self,
        descriptor: CreatureDescriptor,
        config: &MechanicsConfig,
    ) -> Result<Creature, CreatureError>;
}

/// Issues ids from a [`CreatureIdIssuer`].
#[derive(Debug, Default)]
pub struct DefaultCreatureFactory {
    ids: CreatureIdIssuer,
}

impl DefaultCreatureFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts issuing ids at `first`, for worlds that already hold creatures.
    pub fn starting_at(first: u32) -> Self {
        Self {
            ids: CreatureIdIssuer::starting_at(first),
        }
    }
}

impl CreatureFactory for DefaultCreatureFactory {
    fn create(
        &self,
        descriptor: CreatureDescriptor,
        config: &MechanicsConfig,
    ) -> Result<Creature, CreatureError> {
        Creature::new(self.ids.issue(), descriptor, config)
    }
}

/// Plain-data description of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationRequest {
    RestoreCombatCredit {
        combatant: CreatureId,
        credit: CombatCreditType,
    },
    Attack {
        attacker: CreatureId,
        target: CreatureId,
        #[serde(default)]
        skill: SkillType,
    },
    SetAttackTarget {
        combatant: CreatureId,
        #[serde(default)]
        target: Option<CreatureId>,
    },
    SetFollowTarget {
        combatant: CreatureId,
        #[serde(default)]
        target: Option<CreatureId>,
    },
    ChangeModes {
        combatant: CreatureId,
        modes: CombatModes,
    },
    UpdateAwareness {
        observer: CreatureId,
    },
    SpawnCreature {
        descriptor: CreatureDescriptor,
    },
}

/// Validates requests and builds operations.
pub trait OperationFactory: Send + Sync {
    fn create(&self, request: OperationRequest) -> Result<Box<dyn Operation>, OperationError>;
}

/// Builds the operations of [`crate::operations`], timed by a
/// [`MechanicsConfig`].
#[derive(Debug, Clone, Default)]
pub struct DefaultOperationFactory {
    config: MechanicsConfig,
}

impl DefaultOperationFactory {
    pub fn new(config: MechanicsConfig) -> Self {
        Self { config }
    }
}

impl OperationFactory for DefaultOperationFactory {
    fn create(&self, request: OperationRequest) -> Result<Box<dyn Operation>, OperationError> {
        let operation: Box<dyn Operation> = match request {
            OperationRequest::RestoreCombatCredit { combatant, credit } => {
                Box::new(RestoreCombatCreditOperation::new(
                    combatant,
                    credit,
                    self.config.credit_restore_interval,
                )?)
            }
            OperationRequest::Attack {
                attacker,
                target,
                skill,
            } => Box::new(AttackOperation::new(
                attacker,
                target,
                skill,
                self.config.attack_exhaustion,
            )?),
            OperationRequest::SetAttackTarget { combatant, target } => {
                Box::new(SetAttackTargetOperation::new(combatant, target)?)
            }
            OperationRequest::SetFollowTarget { combatant, target } => {
                Box::new(SetFollowTargetOperation::new(combatant, target)?)
            }
            OperationRequest::ChangeModes { combatant, modes } => {
                Box::new(ChangeModesOperation::new(combatant, modes)?)
            }
            OperationRequest::UpdateAwareness { observer } => {
                Box::new(UpdateAwarenessOperation::new(observer)?)
            }
            OperationRequest::SpawnCreature { descriptor } => {
                Box::new(SpawnCreatureOperation::new(descriptor))
            }
        };

        Ok(operation)
    }
}
