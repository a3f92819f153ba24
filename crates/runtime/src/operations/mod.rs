//! Concrete operations run by the scheduler.
//!
//! Each operation validates its arguments in its constructor, so an invalid
//! operation never reaches the queue. Execution reads and mutates the world
//! through the [`OperationContext`](crate::operation::OperationContext) and
//! reports effects through the combat and game APIs.

mod attack;
mod awareness;
mod modes;
mod restore_credit;
mod spawn;
mod targeting;

pub use attack::AttackOperation;
pub use awareness::UpdateAwarenessOperation;
pub use modes::ChangeModesOperation;
pub use restore_credit::RestoreCombatCreditOperation;
pub use spawn::SpawnCreatureOperation;
pub use targeting::{SetAttackTargetOperation, SetFollowTargetOperation};
