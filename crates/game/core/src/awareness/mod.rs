//! Creature awareness: who a creature tracks, and which of those it sees.
//!
//! Each creature owns an [`Awareness`] map from other creatures to an
//! [`AwarenessLevel`]. The map is driven from the outside (the runtime feeds it
//! the spectators the map reports) and decides visibility with the pure
//! [`can_see`] predicate.
//!
//! Transitions per observed creature:
//!
//! ```text
//!   (untracked) --start_sensing--> Sensed --start_sensing & can_see--> Seen
//!        ^                            |                                  |
//!        +--------stop_sensing--------+----------------------------------+
//! ```
//!
//! `Seen` never regresses to `Sensed`; a lost creature is removed outright.
mod visibility;

pub use visibility::{
    UNDERGROUND_FLOOR_SPREAD, VIEW_BOTTOM, VIEW_LEFT, VIEW_RIGHT, VIEW_TOP, can_see,
};

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::listeners::Listeners;
use crate::state::{CreatureId, Location};

/// How aware a creature is of another one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AwarenessLevel {
    /// Tracked, but not (yet) within the observer's viewport.
    Sensed,
    /// Tracked and confirmed visible at least once since tracking began.
    Seen,
}

/// A single awareness transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AwarenessChange {
    Sensed {
        observer: CreatureId,
        target: CreatureId,
    },
    Seen {
        observer: CreatureId,
        target: CreatureId,
    },
    Lost {
        observer: CreatureId,
        target: CreatureId,
    },
}

impl AwarenessChange {
    pub fn observer(&self) -> CreatureId {
        match *self {
            Self::Sensed { observer, .. }
            | Self::Seen { observer, .. }
            | Self::Lost { observer, .. } => observer,
        }
    }

    pub fn target(&self) -> CreatureId {
        match *self {
            Self::Sensed { target, .. } | Self::Seen { target, .. } | Self::Lost { target, .. } => {
                target
            }
        }
    }
}

/// Transitions produced by one [`Awareness::start_sensing`] call (at most two).
pub type SensingTransitions = ArrayVec<AwarenessChange, 2>;

/// Per-creature tracking map.
#[derive(Debug)]
pub struct Awareness {
    owner: CreatureId,
    tracked: BTreeMap<CreatureId, AwarenessLevel>,
    listeners: Listeners<AwarenessChange>,
}

impl Awareness {
    pub fn new(owner: CreatureId) -> Self {
        Self {
            owner,
            tracked: BTreeMap::new(),
            listeners: Listeners::new(),
        }
    }

    /// Starts (or continues) tracking `target`.
    ///
    /// An untracked target becomes `Sensed`; a `Sensed` target that passes the
    /// visibility test from `observer_at` is promoted to `Seen` in the same
    /// call. Tracking oneself is a no-op. Returns the transitions that fired,
    /// after notifying listeners of each.
    pub fn start_sensing(
        &mut self,
        observer_at: Location,
        target: CreatureId,
        target_at: Location,
    ) -> SensingTransitions {
        let mut transitions = SensingTransitions::new();
        let observer = self.owner;

        if target == observer {
            return transitions;
        }

        let level = self.tracked.entry(target).or_insert_with(|| {
            transitions.push(AwarenessChange::Sensed { observer, target });
            AwarenessLevel::Sensed
        });

        if *level == AwarenessLevel::Sensed && can_see(observer_at, target_at) {
            *level = AwarenessLevel::Seen;
            transitions.push(AwarenessChange::Seen { observer, target });
        }

        for change in &transitions {
            self.listeners.notify(change);
        }

        transitions
    }

    /// Stops tracking `target`, returning the `Lost` transition if it was tracked.
    pub fn stop_sensing(&mut self, target: CreatureId) -> Option<AwarenessChange> {
        if target == self.owner {
            return None;
        }

        self.tracked.remove(&target)?;

        let change = AwarenessChange::Lost {
            observer: self.owner,
            target,
        };
        self.listeners.notify(&change);

        Some(change)
    }

    /// Returns the awareness level of `target`, or `None` if it is not tracked.
    pub fn level_of(&self, target: CreatureId) -> Option<AwarenessLevel> {
        self.tracked.get(&target).copied()
    }

    /// Returns true if `target` is tracked and has been seen.
    pub fn has_seen(&self, target: CreatureId) -> bool {
        self.level_of(target) == Some(AwarenessLevel::Seen)
    }

    /// Iterates tracked creatures in id order.
    pub fn tracked(&self) -> impl Iterator<Item = (CreatureId, AwarenessLevel)> + '_ {
        self.tracked.iter().map(|(id, level)| (*id, *level))
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Registers a callback for every transition of this map.
    pub fn subscribe(&mut self, handler: impl FnMut(&AwarenessChange) + Send + 'static) {
        self.listeners.subscribe(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const OBSERVER: CreatureId = CreatureId(1);
    const TARGET: CreatureId = CreatureId(2);

    fn here() -> Location {
        Location::new(100, 100, 7)
    }

    fn far_away() -> Location {
        Location::new(130, 100, 7)
    }

    fn recorded(awareness: &mut Awareness) -> Arc<Mutex<Vec<AwarenessChange>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        awareness.subscribe(move |change| sink.lock().unwrap().push(*change));
        log
    }

    #[test]
    fn tracking_self_is_ignored() {
        let mut awareness = Awareness::new(OBSERVER);

        assert!(awareness.start_sensing(here(), OBSERVER, here()).is_empty());
        assert_eq!(awareness.stop_sensing(OBSERVER), None);
        assert!(awareness.is_empty());
    }

    #[test]
    fn visible_target_is_sensed_then_seen_in_one_call() {
        let mut awareness = Awareness::new(OBSERVER);
        let log = recorded(&mut awareness);

        let transitions = awareness.start_sensing(here(), TARGET, here());

        assert_eq!(
            transitions.as_slice(),
            &[
                AwarenessChange::Sensed {
                    observer: OBSERVER,
                    target: TARGET
                },
                AwarenessChange::Seen {
                    observer: OBSERVER,
                    target: TARGET
                },
            ]
        );
        assert_eq!(log.lock().unwrap().len(), 2);
        assert_eq!(awareness.level_of(TARGET), Some(AwarenessLevel::Seen));
    }

    #[test]
    fn sensed_fires_once_and_seen_fires_at_the_transition() {
        let mut awareness = Awareness::new(OBSERVER);
        let log = recorded(&mut awareness);

        let first = awareness.start_sensing(here(), TARGET, far_away());
        assert_eq!(first.len(), 1);
        assert_eq!(awareness.level_of(TARGET), Some(AwarenessLevel::Sensed));

        let second = awareness.start_sensing(here(), TARGET, far_away());
        assert!(second.is_empty());

        let third = awareness.start_sensing(here(), TARGET, here());
        assert_eq!(
            third.as_slice(),
            &[AwarenessChange::Seen {
                observer: OBSERVER,
                target: TARGET
            }]
        );

        let fourth = awareness.start_sensing(here(), TARGET, here());
        assert!(fourth.is_empty());

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(matches!(log[0], AwarenessChange::Sensed { .. }));
        assert!(matches!(log[1], AwarenessChange::Seen { .. }));
    }

    #[test]
    fn seen_does_not_regress_when_target_leaves_view() {
        let mut awareness = Awareness::new(OBSERVER);
        awareness.start_sensing(here(), TARGET, here());

        let transitions = awareness.start_sensing(here(), TARGET, far_away());

        assert!(transitions.is_empty());
        assert!(awareness.has_seen(TARGET));
    }

    #[test]
    fn lost_fires_exactly_once() {
        let mut awareness = Awareness::new(OBSERVER);
        let log = recorded(&mut awareness);
        awareness.start_sensing(here(), TARGET, far_away());

        assert_eq!(
            awareness.stop_sensing(TARGET),
            Some(AwarenessChange::Lost {
                observer: OBSERVER,
                target: TARGET
            })
        );
        assert_eq!(awareness.stop_sensing(TARGET), None);
        assert_eq!(awareness.level_of(TARGET), None);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn tracked_iterates_in_id_order() {
        let mut awareness = Awareness::new(OBSERVER);
        awareness.start_sensing(here(), CreatureId(9), here());
        awareness.start_sensing(here(), CreatureId(3), far_away());

        let tracked: Vec<_> = awareness.tracked().collect();

        assert_eq!(
            tracked,
            vec![
                (CreatureId(3), AwarenessLevel::Sensed),
                (CreatureId(9), AwarenessLevel::Seen),
            ]
        );
    }
}
