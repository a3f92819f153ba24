use std::collections::BTreeMap;

use mechanics_core::{Creature, CreatureId, Location, SenseRange};

use super::{CreatureRegistry, MapDescriptor};

/// Creatures kept in an ordered map; locations are read from the creatures.
#[derive(Debug, Default)]
pub struct InMemoryWorld {
    creatures: BTreeMap<CreatureId, Creature>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_creatures(creatures: impl IntoIterator<Item = Creature>) -> Self {
        Self {
            creatures: creatures
                .into_iter()
                .map(|creature| (creature.id(), creature))
                .collect(),
        }
    }

    /// Moves a creature. Returns false if it is not registered.
    pub fn set_location(&mut self, id: CreatureId, location: Location) -> bool {
        match self.creatures.get_mut(&id) {
            Some(creature) => {
                creature.set_location(location);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}

impl CreatureRegistry for InMemoryWorld {
    fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    fn insert(&mut self, creature: Creature) -> Option<Creature> {
        self.creatures.insert(creature.id(), creature)
    }

    fn remove(&mut self, id: CreatureId) -> Option<Creature> {
        self.creatures.remove(&id)
    }

    fn ids(&self) -> Vec<CreatureId> {
        self.creatures.keys().copied().collect()
    }
}

impl MapDescriptor for InMemoryWorld {
    fn location_of(&self, id: CreatureId) -> Option<Location> {
        self.creatures.get(&id).map(Creature::location)
    }

    fn spectators(&self, center: Location, range: &SenseRange) -> Vec<(CreatureId, Location)> {
        self.creatures
            .values()
            .filter(|creature| range.contains(center, creature.location()))
            .map(|creature| (creature.id(), creature.location()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::creature_at;

    #[test]
    fn spectators_are_filtered_by_range_in_id_order() {
        let world = InMemoryWorld::with_creatures([
            creature_at(3, Location::new(105, 100, 7)),
            creature_at(1, Location::new(100, 100, 7)),
            creature_at(2, Location::new(200, 100, 7)),
        ]);

        let spectators = world.spectators(Location::new(100, 100, 7), &SenseRange::default());

        assert_eq!(
            spectators,
            vec![
                (CreatureId(1), Location::new(100, 100, 7)),
                (CreatureId(3), Location::new(105, 100, 7)),
            ]
        );
    }

    #[test]
    fn moving_updates_location() {
        let mut world = InMemoryWorld::with_creatures([creature_at(1, Location::new(1, 1, 7))]);

        assert!(world.set_location(CreatureId(1), Location::new(2, 2, 7)));
        assert!(!world.set_location(CreatureId(9), Location::new(2, 2, 7)));
        assert_eq!(world.location_of(CreatureId(1)), Some(Location::new(2, 2, 7)));
    }
}
