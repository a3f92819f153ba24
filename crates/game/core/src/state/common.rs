use std::fmt;
use std::time::Duration;

/// Unique identifier for any creature tracked by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureId(pub u32);

impl CreatureId {
    /// Reserved identifier meaning "no creature".
    ///
    /// Operations submitted by the world itself (spawns, map triggers) carry
    /// this as their requestor and are never subject to exhaustion.
    pub const NONE: Self = Self(0);

    /// Returns true if this identifier does not name a creature.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tile coordinates plus floor.
///
/// Floors `0..=7` form the surface band (7 is ground level), floors `8..=15`
/// are underground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub x: u16,
    pub y: u16,
    pub z: u8,
}

impl Location {
    pub const fn new(x: u16, y: u16, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Returns true if this location lies on the surface band.
    #[inline]
    pub const fn is_surface(self) -> bool {
        self.z <= Self::GROUND_FLOOR
    }

    /// Highest floor number that still belongs to the surface band.
    pub const GROUND_FLOOR: u8 = 7;
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// Simulated world time in milliseconds since the world started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Converts an elapsed duration into a tick, saturating at `u64::MAX`.
    pub fn from_duration(elapsed: Duration) -> Self {
        Self(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }

    /// Returns the duration between the world start and this tick.
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Returns the time remaining from `self` until `later`, or zero.
    pub fn until(self, later: Tick) -> Duration {
        Duration::from_millis(later.0.saturating_sub(self.0))
    }
}

/// Delays round up to whole milliseconds, so a positive delay is never due
/// immediately. Saturates at `u64::MAX`.
impl std::ops::Add<Duration> for Tick {
    type Output = Tick;
    fn add(self, rhs: Duration) -> Tick {
        let partial = u128::from(rhs.subsec_nanos() % 1_000_000 != 0);
        let millis = u64::try_from(rhs.as_millis() + partial).unwrap_or(u64::MAX);
        self.0.checked_add(millis).map_or(Tick(u64::MAX), Tick)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
