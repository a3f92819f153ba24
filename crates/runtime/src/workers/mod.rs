//! Worker tasks that back the runtime orchestration.
//!
//! The scheduler worker is the only task that executes operations; every
//! producer reaches it through the command channel.

mod scheduler;

pub use scheduler::{Command, SchedulerWorker};
