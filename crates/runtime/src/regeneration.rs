//! Combat credit regeneration as a chain of one-shot operations.
//!
//! There is no timer object. A restore step restores one credit and, while
//! the meter is below maximum, schedules the next step after the restore
//! interval. The chain ends on its own once the meter is full, and the
//! `restoring` flag on the combatant's credits records whether a chain is
//! currently live so that spending a credit restarts at most one.

use std::time::Duration;

use mechanics_core::{CombatCreditType, CombatCredits, CreatureId, MechanicsConfig};
use tracing::trace;

use crate::operation::{OperationContext, OperationError, OperationHandle};
use crate::operations::RestoreCombatCreditOperation;

/// Whether a restore chain continues after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Continue { after: Duration },
    Finished,
}

/// Applies one restore step, returning the new current value.
///
/// Clears the restoring flag when the meter reaches its maximum.
pub fn restore_step(
    credits: &mut CombatCredits,
    kind: CombatCreditType,
    interval: Duration,
) -> (u32, Recurrence) {
    let current = credits.restore(kind, MechanicsConfig::CREDITS_PER_RESTORE);

    if credits.is_full(kind) {
        credits.set_restoring(kind, false);
        (current, Recurrence::Finished)
    } else {
        (current, Recurrence::Continue { after: interval })
    }
}

/// Marks a chain as live if none is and the meter has room.
///
/// Returns true if the caller must schedule the first step.
pub fn claim_chain(credits: &mut CombatCredits, kind: CombatCreditType) -> bool {
    if credits.is_restoring(kind) || credits.is_full(kind) {
        return false;
    }

    credits.set_restoring(kind, true);
    true
}

/// Starts the restore chain for `combatant` unless one is already running.
pub fn restart_chain(
    ctx: &mut OperationContext<'_>,
    combatant: CreatureId,
    kind: CombatCreditType,
) -> Result<Option<OperationHandle>, OperationError> {
    let interval = ctx.config().credit_restore_interval;
    let credits = &mut ctx.creature_mut(combatant)?.combat_mut().credits;

    if !claim_chain(credits, kind) {
        return Ok(None);
    }

    let step = RestoreCombatCreditOperation::new(combatant, kind, interval)?;
    let handle = ctx.schedule(step, interval);

    trace!(
        target: "mechanics::combat",
        combatant = %combatant,
        credit = <&'static str>::from(kind),
        operation = %handle.id,
        "restore chain started"
    );

    Ok(Some(handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(1_000);

    #[test]
    fn step_continues_until_full() {
        let mut credits = CombatCredits::new(1, 2).unwrap();
        credits.spend(CombatCreditType::Defense).unwrap();
        credits.spend(CombatCreditType::Defense).unwrap();
        assert!(claim_chain(&mut credits, CombatCreditType::Defense));

        assert_eq!(
            restore_step(&mut credits, CombatCreditType::Defense, INTERVAL),
            (1, Recurrence::Continue { after: INTERVAL })
        );
        assert!(credits.is_restoring(CombatCreditType::Defense));

        assert_eq!(
            restore_step(&mut credits, CombatCreditType::Defense, INTERVAL),
            (2, Recurrence::Finished)
        );
        assert!(!credits.is_restoring(CombatCreditType::Defense));
    }

    #[test]
    fn full_or_running_chain_is_not_claimed_twice() {
        let mut credits = CombatCredits::new(1, 1).unwrap();
        assert!(!claim_chain(&mut credits, CombatCreditType::Attack));

        credits.spend(CombatCreditType::Attack).unwrap();
        assert!(claim_chain(&mut credits, CombatCreditType::Attack));
        assert!(!claim_chain(&mut credits, CombatCreditType::Attack));
    }

    #[test]
    fn stray_step_on_full_meter_finishes() {
        let mut credits = CombatCredits::new(3, 1).unwrap();

        assert_eq!(
            restore_step(&mut credits, CombatCreditType::Attack, INTERVAL),
            (3, Recurrence::Finished)
        );
    }
}
