//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::sync::broadcast;

use super::types::{AwarenessEvent, CombatEvent, CreatureEvent, SchedulerEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::EnumIter)]
pub enum Topic {
    /// Credits, targets, modes, attacks, deaths
    Combat,
    /// Seen/lost transitions
    Awareness,
    /// Spawns, stat and skill changes
    Creature,
    /// Failed, deferred, and dropped operations
    Scheduler,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Combat(CombatEvent),
    Awareness(AwarenessEvent),
    Creature(CreatureEvent),
    Scheduler(SchedulerEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Awareness(_) => Topic::Awareness,
            Event::Creature(_) => Topic::Creature,
            Event::Scheduler(_) => Topic::Scheduler,
        }
    }
}

struct Channels {
    combat: broadcast::Sender<Event>,
    awareness: broadcast::Sender<Event>,
    creature: broadcast::Sender<Event>,
    scheduler: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Awareness => &self.awareness,
            Topic::Creature => &self.creature,
            Topic::Scheduler => &self.scheduler,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events published while a
/// topic has no subscribers are discarded.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            channels: Arc::new(Channels {
                combat: broadcast::channel(capacity).0,
                awareness: broadcast::channel(capacity).0,
                creature: broadcast::channel(capacity).0,
                scheduler: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Subscribe to every topic
    pub fn subscribe_all(&self) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.subscribe_multiple(&Topic::iter().collect::<Vec<_>>())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mechanics_core::CreatureId;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut receivers = bus.subscribe_all();

        bus.publish(Event::Combat(CombatEvent::Death {
            combatant: CreatureId(3),
        }));

        let combat = receivers.get_mut(&Topic::Combat).unwrap();
        assert_eq!(
            combat.recv().await.unwrap(),
            Event::Combat(CombatEvent::Death {
                combatant: CreatureId(3)
            })
        );

        for topic in [Topic::Awareness, Topic::Creature, Topic::Scheduler] {
            assert!(receivers.get_mut(&topic).unwrap().try_recv().is_err());
        }
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::Awareness(AwarenessEvent::Lost {
            observer: CreatureId(1),
            target: CreatureId(2),
        }));
    }
}
