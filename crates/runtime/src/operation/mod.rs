//! The unit of deferred work.
//!
//! An [`Operation`] is anything the scheduler can run at a due time: it names
//! its requestor, the cooldown category it belongs to, and whether producers
//! may cancel it. Executing consumes the boxed operation, so a body can run at
//! most once; everything it needs at that point arrives through the
//! [`OperationContext`].

mod context;
mod error;

pub use context::{Collaborators, OperationContext};
pub use error::OperationError;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use mechanics_core::{CreatureId, ExhaustionType};
use serde::{Deserialize, Serialize};

/// Identifier assigned to an operation when it is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationId(pub u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// Shared source of operation ids.
///
/// Cloning shares the counter, so every runtime handle and the scheduler
/// itself draw from one sequence. The first id issued is 1.
#[derive(Clone, Debug, Default)]
pub struct OperationIdIssuer {
    last: Arc<AtomicU64>,
}

impl OperationIdIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> OperationId {
        OperationId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// What a producer keeps after scheduling: enough to cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperationHandle {
    pub id: OperationId,
    pub operation: &'static str,
}

/// Lifecycle of a scheduled operation.
///
/// `Scheduled -> Executing -> {Completed, Failed}`, or `Scheduled -> Cancelled`.
/// Terminal states are final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationState {
    Scheduled,
    Executing,
    Completed,
    Failed,
    Cancelled,
}

impl OperationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Executable work with exhaustion metadata.
///
/// The scheduler depends only on this capability; concrete operations live in
/// [`crate::operations`]. Metadata methods must return the same values for the
/// lifetime of the operation.
pub trait Operation: Send + 'static {
    /// Short stable name used in logs and events.
    fn name(&self) -> &'static str;

    /// Creature on whose behalf the operation runs; `CreatureId::NONE` for the
    /// world itself.
    fn requestor(&self) -> CreatureId;

    fn exhaustion_type(&self) -> ExhaustionType {
        ExhaustionType::None
    }

    /// Cooldown imposed on the requestor after a successful execution.
    fn exhaustion_cost(&self) -> Duration {
        Duration::ZERO
    }

    fn can_be_cancelled(&self) -> bool {
        true
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError>;
}

impl fmt::Debug for dyn Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name())
            .field("requestor", &self.requestor())
            .field("exhaustion_type", &self.exhaustion_type())
            .finish()
    }
}
