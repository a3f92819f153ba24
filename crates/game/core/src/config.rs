use std::time::Duration;

/// Mechanics constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MechanicsConfig {
    /// Delay between two steps of a combat credit restore chain.
    pub credit_restore_interval: Duration,
    /// Combat cooldown imposed on an attacker after each executed attack.
    pub attack_exhaustion: Duration,
    /// Attack credit maximum for creatures that do not specify one.
    pub default_attack_credits: u32,
    /// Defense credit maximum for creatures that do not specify one.
    pub default_defense_credits: u32,
    /// Area around a location within which the map reports spectators.
    pub sense_range: SenseRange,
}

impl MechanicsConfig {
    // ===== creature defaults =====
    pub const DEFAULT_CARRY_STRENGTH: u32 = 150;
    pub const MAX_CARRY_STRENGTH: u32 = 10_000;
    pub const DEFAULT_BASE_SPEED: u32 = 70;
    pub const MAX_BASE_SPEED: u32 = 1_500;

    /// Amount restored by a single credit restore step.
    pub const CREDITS_PER_RESTORE: u32 = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CREDIT_RESTORE_INTERVAL: Duration = Duration::from_millis(1_000);
    pub const DEFAULT_ATTACK_EXHAUSTION: Duration = Duration::from_millis(2_000);
    pub const DEFAULT_ATTACK_CREDITS: u32 = 1;
    pub const DEFAULT_DEFENSE_CREDITS: u32 = 2;

    pub fn new() -> Self {
        Self {
            credit_restore_interval: Self::DEFAULT_CREDIT_RESTORE_INTERVAL,
            attack_exhaustion: Self::DEFAULT_ATTACK_EXHAUSTION,
            default_attack_credits: Self::DEFAULT_ATTACK_CREDITS,
            default_defense_credits: Self::DEFAULT_DEFENSE_CREDITS,
            sense_range: SenseRange::default(),
        }
    }

    pub fn with_credit_restore_interval(mut self, interval: Duration) -> Self {
        self.credit_restore_interval = interval;
        self
    }

    pub fn with_attack_exhaustion(mut self, exhaustion: Duration) -> Self {
        self.attack_exhaustion = exhaustion;
        self
    }
}

impl Default for MechanicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Half-extents of the area in which creatures sense each other.
///
/// Sensing is wider than seeing: the window covers the whole perspective-shifted
/// viewport of every floor within `floors` of the observer, so a creature is
/// already tracked before it steps into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SenseRange {
    pub horizontal: u16,
    pub vertical: u16,
    pub floors: u8,
}

impl SenseRange {
    /// Returns true if `other` lies within this range around `center`.
    pub fn contains(&self, center: crate::Location, other: crate::Location) -> bool {
        center.x.abs_diff(other.x) <= self.horizontal
            && center.y.abs_diff(other.y) <= self.vertical
            && center.z.abs_diff(other.z) <= self.floors
    }
}

impl Default for SenseRange {
    fn default() -> Self {
        Self {
            horizontal: 11,
            vertical: 9,
            floors: 2,
        }
    }
}
