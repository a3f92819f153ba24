//! Skill progression.
//!
//! A skill accumulates experience ("count") towards a threshold. Reaching the
//! threshold advances the level and grows the threshold geometrically by the
//! skill's rate. Counts are cumulative: they are not reset on level-up, so the
//! percentage right after an advance reflects the old threshold against the
//! new one.

use crate::error::{ErrorSeverity, GameError};
use crate::listeners::Listeners;
use crate::state::CreatureId;

/// Tolerance used when deciding whether the count reached the threshold.
const THRESHOLD_EPSILON: f64 = 0.001;

/// Increase factors are expressed in thousandths.
const RATE_DENOMINATOR: f64 = 1000.0;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillType {
    #[default]
    Fist,
    Club,
    Sword,
    Axe,
    Distance,
    Shield,
    Fishing,
    Magic,
}

/// Construction parameters for a [`Skill`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSpec {
    pub skill_type: SkillType,
    /// Level used when `level` is zero.
    pub default_level: u32,
    /// Starting level; zero selects `default_level`.
    pub level: u32,
    pub max_level: u32,
    pub current_count: f64,
    pub count_for_next_level: f64,
    /// Threshold growth per level, in thousandths (1100 means x1.1).
    pub increase_factor: u32,
    /// Levels gained per threshold crossing.
    pub per_level_increase: u8,
}

impl SkillSpec {
    /// A level-1 skill with the common growth parameters.
    pub fn starting(skill_type: SkillType) -> Self {
        Self {
            skill_type,
            default_level: 1,
            level: 0,
            max_level: 200,
            current_count: 0.0,
            count_for_next_level: 50.0,
            increase_factor: 1100,
            per_level_increase: 1,
        }
    }
}

/// Record broadcast when a skill's level or percentage changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillChanged {
    pub owner: CreatureId,
    pub skill: SkillType,
    pub previous_level: u32,
    pub previous_percent: u8,
    pub level: u32,
    pub percent: u8,
}

/// Errors raised while constructing a skill.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SkillError {
    #[error("skill must belong to a creature")]
    MissingOwner,

    #[error("maximum level must be positive")]
    ZeroMaximumLevel,

    #[error("maximum level {max_level} is below default level {default_level}")]
    MaximumBelowDefault { max_level: u32, default_level: u32 },

    #[error("count for next level must be positive, got {0}")]
    NonPositiveThreshold(f64),

    #[error("count for next level must be a finite whole number, got {0}")]
    FractionalThreshold(f64),

    #[error("increase factor {0} would shrink the threshold (minimum is 1000)")]
    ShrinkingRate(u32),
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingOwner => "SKILL_MISSING_OWNER",
            Self::ZeroMaximumLevel => "SKILL_ZERO_MAXIMUM_LEVEL",
            Self::MaximumBelowDefault { .. } => "SKILL_MAXIMUM_BELOW_DEFAULT",
            Self::NonPositiveThreshold(_) => "SKILL_NON_POSITIVE_THRESHOLD",
            Self::FractionalThreshold(_) => "SKILL_FRACTIONAL_THRESHOLD",
            Self::ShrinkingRate(_) => "SKILL_SHRINKING_RATE",
        }
    }
}

#[derive(Debug)]
pub struct Skill {
    owner: CreatureId,
    skill_type: SkillType,
    current_level: u32,
    maximum_level: u32,
    default_level: u32,
    current_count: f64,
    count_for_next_level: f64,
    count_at_start_of_level: f64,
    per_level_increase: u8,
    rate: f64,
    listeners: Listeners<SkillChanged>,
}

impl Skill {
    pub fn new(owner: CreatureId, spec: SkillSpec) -> Result<Self, SkillError> {
        if owner.is_none() {
            return Err(SkillError::MissingOwner);
        }

        if spec.max_level == 0 {
            return Err(SkillError::ZeroMaximumLevel);
        }

        if spec.max_level < spec.default_level {
            return Err(SkillError::MaximumBelowDefault {
                max_level: spec.max_level,
                default_level: spec.default_level,
            });
        }

        if !(spec.count_for_next_level > 0.0) {
            return Err(SkillError::NonPositiveThreshold(spec.count_for_next_level));
        }

        // Thresholds are whole counts.
        if !spec.count_for_next_level.is_finite() || spec.count_for_next_level.fract() != 0.0 {
            return Err(SkillError::FractionalThreshold(spec.count_for_next_level));
        }

        if spec.increase_factor < 1000 {
            return Err(SkillError::ShrinkingRate(spec.increase_factor));
        }

        let starting_level = if spec.level == 0 {
            spec.default_level
        } else {
            spec.level
        };

        Ok(Self {
            owner,
            skill_type: spec.skill_type,
            current_level: starting_level.min(spec.max_level),
            maximum_level: spec.max_level,
            default_level: spec.default_level,
            current_count: spec.current_count.clamp(0.0, spec.count_for_next_level),
            count_for_next_level: spec.count_for_next_level,
            count_at_start_of_level: 0.0,
            per_level_increase: spec.per_level_increase,
            rate: f64::from(spec.increase_factor) / RATE_DENOMINATOR,
            listeners: Listeners::new(),
        })
    }

    pub fn owner(&self) -> CreatureId {
        self.owner
    }

    pub fn skill_type(&self) -> SkillType {
        self.skill_type
    }

    pub fn level(&self) -> u32 {
        self.current_level
    }

    pub fn maximum_level(&self) -> u32 {
        self.maximum_level
    }

    pub fn default_level(&self) -> u32 {
        self.default_level
    }

    pub fn count(&self) -> f64 {
        self.current_count
    }

    pub fn count_for_next_level(&self) -> f64 {
        self.count_for_next_level
    }

    pub fn count_at_start_of_level(&self) -> f64 {
        self.count_at_start_of_level
    }

    pub fn per_level_increase(&self) -> u8 {
        self.per_level_increase
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Progress towards the next level, `0..=100`.
    ///
    /// The ratio is capped at 1 before scaling.
    pub fn percent(&self) -> u8 {
        let ratio = (self.current_count / self.count_for_next_level).clamp(0.0, 1.0);
        (ratio * 100.0).floor() as u8
    }

    /// Adds experience, advancing at most one level.
    ///
    /// The count is clamped at the threshold; reaching it advances the level by
    /// `per_level_increase` (saturating at the maximum) and grows the threshold
    /// to `floor(threshold * rate)`. Listeners are notified, and the change is
    /// returned, only if the level or percentage changed. Negative or
    /// non-finite amounts are ignored.
    pub fn increase_counter(&mut self, amount: f64) -> Option<SkillChanged> {
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }

        let previous_level = self.current_level;
        let previous_percent = self.percent();

        self.current_count = (self.current_count + amount).min(self.count_for_next_level);

        if (self.current_count - self.count_for_next_level).abs() < THRESHOLD_EPSILON {
            self.current_level = self
                .current_level
                .saturating_add(u32::from(self.per_level_increase))
                .min(self.maximum_level);

            self.count_at_start_of_level = self.count_for_next_level;
            self.count_for_next_level = (self.count_for_next_level * self.rate)
                .floor()
                .max(self.count_at_start_of_level);
        }

        let percent = self.percent();
        if self.current_level == previous_level && percent == previous_percent {
            return None;
        }

        let change = SkillChanged {
            owner: self.owner,
            skill: self.skill_type,
            previous_level,
            previous_percent,
            level: self.current_level,
            percent,
        };
        self.listeners.notify(&change);

        Some(change)
    }

    /// Registers a callback for level/percentage changes.
    pub fn subscribe(&mut self, handler: impl FnMut(&SkillChanged) + Send + 'static) {
        self.listeners.subscribe(handler);
    }
}
