//! Server configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use mechanics_runtime::RuntimeConfig;

/// Everything the server binary needs to start.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub runtime: RuntimeConfig,
    /// Period of the demo AI producer.
    pub ai_tick: Duration,
    /// Stop after this long; run until Ctrl-C when unset.
    pub run_for: Option<Duration>,
    /// Also write logs to `mechanics.log` in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            ai_tick: Self::DEFAULT_AI_TICK,
            run_for: None,
            log_dir: None,
        }
    }
}

impl ServerConfig {
    pub const DEFAULT_AI_TICK: Duration = Duration::from_millis(1_500);

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MECHANICS_COMMAND_BUFFER` - Scheduler command queue size (default: 64)
    /// - `MECHANICS_EVENT_BUFFER` - Per-topic event buffer (default: 256)
    /// - `MECHANICS_RESTORE_INTERVAL_MS` - Credit restore interval (default: 1000)
    /// - `MECHANICS_ATTACK_EXHAUSTION_MS` - Cooldown after an attack (default: 2000)
    /// - `MECHANICS_AI_TICK_MS` - Demo AI period (default: 1500)
    /// - `MECHANICS_RUN_SECONDS` - Stop after this many seconds (default: run until Ctrl-C)
    /// - `MECHANICS_LOG_DIR` - Directory for a log file (default: stderr only)
    ///
    /// Unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key);
        let mut config = Self::default();

        if let Some(capacity) = parse::<usize>(read("MECHANICS_COMMAND_BUFFER")) {
            config.runtime.command_buffer_size = capacity.max(1);
        }

        if let Some(capacity) = parse::<usize>(read("MECHANICS_EVENT_BUFFER")) {
            config.runtime.event_buffer_size = capacity.max(1);
        }

        if let Some(millis) = parse::<u64>(read("MECHANICS_RESTORE_INTERVAL_MS")) {
            config.runtime.mechanics.credit_restore_interval = Duration::from_millis(millis);
        }

        if let Some(millis) = parse::<u64>(read("MECHANICS_ATTACK_EXHAUSTION_MS")) {
            config.runtime.mechanics.attack_exhaustion = Duration::from_millis(millis);
        }

        if let Some(millis) = parse::<u64>(read("MECHANICS_AI_TICK_MS")) {
            config.ai_tick = Duration::from_millis(millis.max(1));
        }

        config.run_for = parse::<u64>(read("MECHANICS_RUN_SECONDS")).map(Duration::from_secs);
        config.log_dir = read("MECHANICS_LOG_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        config
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}
