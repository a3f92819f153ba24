//! Per-actor cooldowns keyed by exhaustion category.

use std::collections::HashMap;
use std::time::Duration;

use crate::state::{CreatureId, Tick};

/// Cooldown category an operation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExhaustionType {
    /// Not subject to cooldowns.
    None,
    Action,
    Combat,
    Movement,
}

/// What the scheduler does with an operation whose actor is still exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    /// Discard the operation.
    Drop,
    /// Re-queue the operation at the moment the cooldown expires.
    Defer,
}

impl ExhaustionType {
    /// Returns the policy for this category, or `None` if it is never checked.
    pub fn policy(self) -> Option<ExhaustionPolicy> {
        match self {
            Self::None => None,
            Self::Action => Some(ExhaustionPolicy::Drop),
            Self::Combat | Self::Movement => Some(ExhaustionPolicy::Defer),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Cooldown expiries per `(actor, category)`.
#[derive(Clone, Debug, Default)]
pub struct ExhaustionTracker {
    until: HashMap<(CreatureId, ExhaustionType), Tick>,
}

impl ExhaustionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the expiry if `actor` is still exhausted for `kind` at `now`.
    ///
    /// Unchecked categories and the null actor are never exhausted.
    pub fn exhausted_until(
        &self,
        actor: CreatureId,
        kind: ExhaustionType,
        now: Tick,
    ) -> Option<Tick> {
        if actor.is_none() || kind.policy().is_none() {
            return None;
        }

        self.until
            .get(&(actor, kind))
            .copied()
            .filter(|expiry| *expiry > now)
    }

    /// Starts a cooldown of `cost` for `actor` beginning at `now`.
    ///
    /// A zero cost clears any existing cooldown for the pair.
    pub fn apply(&mut self, actor: CreatureId, kind: ExhaustionType, now: Tick, cost: Duration) {
        if actor.is_none() || kind.policy().is_none() {
            return;
        }

        if cost.is_zero() {
            self.until.remove(&(actor, kind));
        } else {
            self.until.insert((actor, kind), now + cost);
        }
    }

    /// Forgets every cooldown of `actor`.
    pub fn clear(&mut self, actor: CreatureId) {
        self.until.retain(|(owner, _), _| *owner != actor);
    }

    /// Drops entries that expired at or before `now`.
    pub fn prune(&mut self, now: Tick) {
        self.until.retain(|_, expiry| *expiry > now);
    }

    pub fn len(&self) -> usize {
        self.until.len()
    }

    pub fn is_empty(&self) -> bool {
        self.until.is_empty()
    }
}
