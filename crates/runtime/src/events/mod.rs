//! Topic-based event bus and the notification surfaces that feed it.
//!
//! Operations report their effects through [`CombatApi`] and [`GameApi`].
//! [`EventBusNotifier`] turns those calls into [`Event`]s published per
//! [`Topic`], so consumers subscribe only to what they need.

mod api;
mod bus;
mod notifier;
mod recording;
mod types;

pub use api::{CombatApi, GameApi};
pub use bus::{Event, EventBus, Topic};
pub use notifier::EventBusNotifier;
pub use recording::{Notification, RecordingNotifier};
pub use types::{AwarenessEvent, CombatEvent, CreatureEvent, SchedulerEvent};
