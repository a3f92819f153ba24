//! Collaborator traits through which operations reach the world.
//!
//! The scheduler treats the world as an opaque capability set: a creature
//! registry plus a read-only map view. [`InMemoryWorld`] is the default
//! implementation used by the server and tests.

mod memory;

pub use memory::InMemoryWorld;

use mechanics_core::{Creature, CreatureId, Location, SenseRange};

/// Resolves creature ids to live creatures.
pub trait CreatureRegistry {
    fn creature(&self, id: CreatureId) -> Option<&Creature>;

    fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature>;

    /// Adds a creature, returning any creature previously stored under its id.
    fn insert(&mut self, creature: Creature) -> Option<Creature>;

    fn remove(&mut self, id: CreatureId) -> Option<Creature>;

    /// Every registered id, in ascending order.
    fn ids(&self) -> Vec<CreatureId>;
}

/// Read-only spatial queries.
pub trait MapDescriptor {
    fn location_of(&self, id: CreatureId) -> Option<Location>;

    /// Creatures within `range` of `center`, in id order.
    fn spectators(&self, center: Location, range: &SenseRange) -> Vec<(CreatureId, Location)>;
}

/// Everything the scheduler worker needs from the world.
pub trait GameWorld: CreatureRegistry + MapDescriptor + Send {}

impl<T> GameWorld for T where T: CreatureRegistry + MapDescriptor + Send {}
