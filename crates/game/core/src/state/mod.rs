//! Creature state and the primitive types every mechanic is keyed by.
//!
//! Identifiers, locations, and simulated time live in [`common`]; the
//! [`creature`] module holds the combatant model that operations mutate.
mod common;
mod creature;

pub use common::{CreatureId, Location, Tick};
pub use creature::{
    Creature, CreatureDescriptor, CreatureError, CreatureIdIssuer, CreatureSnapshot, CreatureStat,
    Stat, StatChanged,
};
