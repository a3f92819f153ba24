//! Creature model: identity, stats, skills, awareness, and combat state.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use strum::IntoEnumIterator;

use super::common::{CreatureId, Location};
use crate::awareness::{Awareness, AwarenessLevel};
use crate::combat::{
    CombatCreditType, CombatCredits, CombatModes, CombatState, CreditError, CreditMeter,
};
use crate::config::MechanicsConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::listeners::Listeners;
use crate::skills::{Skill, SkillChanged, SkillError, SkillSpec, SkillType};

// ============================================================================
// Stats
// ============================================================================

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreatureStat {
    HitPoints,
    CarryStrength,
    BaseSpeed,
}

/// A bounded stat value: `current <= maximum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stat {
    pub current: u32,
    pub maximum: u32,
}

impl Stat {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }
}

/// Record broadcast when a stat's current value changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatChanged {
    pub creature: CreatureId,
    pub stat: CreatureStat,
    pub previous: u32,
    pub current: u32,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CreatureError {
    #[error("creature id must not be NONE")]
    MissingId,

    #[error("creature name must not be blank")]
    BlankName,

    #[error("maximum hitpoints must be positive")]
    ZeroHitPoints,

    #[error("invalid skill: {0}")]
    Skill(#[from] SkillError),

    #[error("invalid combat credits: {0}")]
    Credits(#[from] CreditError),
}

impl GameError for CreatureError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingId => "CREATURE_MISSING_ID",
            Self::BlankName => "CREATURE_BLANK_NAME",
            Self::ZeroHitPoints => "CREATURE_ZERO_HITPOINTS",
            Self::Skill(err) => err.error_code(),
            Self::Credits(err) => err.error_code(),
        }
    }
}

// ============================================================================
// Descriptor
// ============================================================================

/// Everything needed to build a creature, minus its id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureDescriptor {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub article: String,
    pub max_hitpoints: u32,
    /// Zero means "start at maximum".
    #[cfg_attr(feature = "serde", serde(default))]
    pub current_hitpoints: u32,
    pub location: Location,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_credits: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense_credits: Option<u32>,
    /// Overrides for individual skills; unlisted skills start at level 1.
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillSpec>,
}

impl CreatureDescriptor {
    pub fn new(name: impl Into<String>, max_hitpoints: u32, location: Location) -> Self {
        Self {
            name: name.into(),
            article: String::new(),
            max_hitpoints,
            current_hitpoints: 0,
            location,
            attack_credits: None,
            defense_credits: None,
            skills: Vec::new(),
        }
    }

    pub fn with_article(mut self, article: impl Into<String>) -> Self {
        self.article = article.into();
        self
    }

    pub fn with_credits(mut self, attack: u32, defense: u32) -> Self {
        self.attack_credits = Some(attack);
        self.defense_credits = Some(defense);
        self
    }

    pub fn with_skill(mut self, spec: SkillSpec) -> Self {
        self.skills.push(spec);
        self
    }
}

// ============================================================================
// Creature
// ============================================================================

#[derive(Debug)]
pub struct Creature {
    id: CreatureId,
    name: String,
    article: String,
    location: Location,
    stats: BTreeMap<CreatureStat, Stat>,
    skills: BTreeMap<SkillType, Skill>,
    awareness: Awareness,
    combat: CombatState,
    stat_listeners: Listeners<StatChanged>,
}

impl Creature {
    pub fn new(
        id: CreatureId,
        descriptor: CreatureDescriptor,
        config: &MechanicsConfig,
    ) -> Result<Self, CreatureError> {
        if id.is_none() {
            return Err(CreatureError::MissingId);
        }

        if descriptor.name.trim().is_empty() {
            return Err(CreatureError::BlankName);
        }

        if descriptor.max_hitpoints == 0 {
            return Err(CreatureError::ZeroHitPoints);
        }

        let current_hitpoints = match descriptor.current_hitpoints {
            0 => descriptor.max_hitpoints,
            current => current,
        };

        let stats = BTreeMap::from([
            (
                CreatureStat::HitPoints,
                Stat::new(current_hitpoints, descriptor.max_hitpoints),
            ),
            (
                CreatureStat::CarryStrength,
                Stat::new(
                    MechanicsConfig::DEFAULT_CARRY_STRENGTH,
                    MechanicsConfig::MAX_CARRY_STRENGTH,
                ),
            ),
            (
                CreatureStat::BaseSpeed,
                Stat::new(
                    MechanicsConfig::DEFAULT_BASE_SPEED,
                    MechanicsConfig::MAX_BASE_SPEED,
                ),
            ),
        ]);

        let mut specs: BTreeMap<SkillType, SkillSpec> = SkillType::iter()
            .map(|kind| (kind, SkillSpec::starting(kind)))
            .collect();
        for spec in descriptor.skills {
            specs.insert(spec.skill_type, spec);
        }

        let skills = specs
            .into_iter()
            .map(|(kind, spec)| Skill::new(id, spec).map(|skill| (kind, skill)))
            .collect::<Result<BTreeMap<_, _>, SkillError>>()?;

        let credits = CombatCredits::new(
            descriptor
                .attack_credits
                .unwrap_or(config.default_attack_credits),
            descriptor
                .defense_credits
                .unwrap_or(config.default_defense_credits),
        )?;

        Ok(Self {
            id,
            name: descriptor.name,
            article: descriptor.article,
            location: descriptor.location,
            stats,
            skills,
            awareness: Awareness::new(id),
            combat: CombatState::new(credits),
            stat_listeners: Listeners::new(),
        })
    }

    pub fn id(&self) -> CreatureId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// "article name", or just the name when there is no article.
    pub fn describe(&self) -> String {
        if self.article.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.article, self.name)
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    // ===== stats =====

    pub fn stat(&self, stat: CreatureStat) -> Stat {
        // Every stat is inserted at construction.
        self.stats.get(&stat).copied().unwrap_or(Stat::full(0))
    }

    pub fn hitpoints(&self) -> u32 {
        self.stat(CreatureStat::HitPoints).current
    }

    pub fn is_dead(&self) -> bool {
        self.hitpoints() == 0
    }

    /// Sets a stat's current value (clamped to its maximum), notifying
    /// listeners if it changed.
    pub fn set_stat(&mut self, stat: CreatureStat, current: u32) -> Option<StatChanged> {
        let entry = self.stats.get_mut(&stat)?;
        let previous = entry.current;
        entry.current = current.min(entry.maximum);

        if entry.current == previous {
            return None;
        }

        let change = StatChanged {
            creature: self.id,
            stat,
            previous,
            current: entry.current,
        };
        self.stat_listeners.notify(&change);

        Some(change)
    }

    /// Reduces hitpoints by `amount`, saturating at zero.
    pub fn damage(&mut self, amount: u32) -> Option<StatChanged> {
        let remaining = self.hitpoints().saturating_sub(amount);
        self.set_stat(CreatureStat::HitPoints, remaining)
    }

    pub fn subscribe_stats(&mut self, handler: impl FnMut(&StatChanged) + Send + 'static) {
        self.stat_listeners.subscribe(handler);
    }

    // ===== skills =====

    pub fn skill(&self, kind: SkillType) -> Option<&Skill> {
        self.skills.get(&kind)
    }

    pub fn skill_mut(&mut self, kind: SkillType) -> Option<&mut Skill> {
        self.skills.get_mut(&kind)
    }

    pub fn skill_level(&self, kind: SkillType) -> u32 {
        self.skill(kind).map_or(0, Skill::level)
    }

    /// Adds experience to `kind`, returning the change if one was observable.
    pub fn train(&mut self, kind: SkillType, amount: f64) -> Option<SkillChanged> {
        self.skills.get_mut(&kind)?.increase_counter(amount)
    }

    // ===== awareness & combat =====

    pub fn awareness(&self) -> &Awareness {
        &self.awareness
    }

    pub fn awareness_mut(&mut self) -> &mut Awareness {
        &mut self.awareness
    }

    pub fn combat(&self) -> &CombatState {
        &self.combat
    }

    pub fn combat_mut(&mut self) -> &mut CombatState {
        &mut self.combat
    }

    /// Plain-data copy of the observable state.
    pub fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            id: self.id,
            name: self.describe(),
            location: self.location,
            hitpoints: self.stat(CreatureStat::HitPoints),
            attack_credits: self.combat.credits.meter(CombatCreditType::Attack),
            defense_credits: self.combat.credits.meter(CombatCreditType::Defense),
            modes: self.combat.modes,
            attack_target: self.combat.attack_target(),
            follow_target: self.combat.follow_target(),
            tracked: self.awareness.tracked().collect(),
            skills: self
                .skills
                .values()
                .map(|skill| (skill.skill_type(), skill.level(), skill.percent()))
                .collect(),
        }
    }
}

/// Read-only view of a creature handed across the runtime boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureSnapshot {
    pub id: CreatureId,
    pub name: String,
    pub location: Location,
    pub hitpoints: Stat,
    pub attack_credits: CreditMeter,
    pub defense_credits: CreditMeter,
    pub modes: CombatModes,
    pub attack_target: Option<CreatureId>,
    pub follow_target: Option<CreatureId>,
    pub tracked: Vec<(CreatureId, AwarenessLevel)>,
    /// `(skill, level, percent)` in skill order.
    pub skills: Vec<(SkillType, u32, u8)>,
}

// ============================================================================
// Id issuing
// ============================================================================

/// Thread-safe creature id counter. The first id issued is 1.
#[derive(Debug)]
pub struct CreatureIdIssuer {
    next: AtomicU32,
}

impl CreatureIdIssuer {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Starts issuing at `first` (clamped to at least 1).
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first.max(1)),
        }
    }

    pub fn issue(&self) -> CreatureId {
        CreatureId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for CreatureIdIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn descriptor() -> CreatureDescriptor {
        CreatureDescriptor::new("rat", 20, Location::new(100, 100, 7)).with_article("a")
    }

    fn build(descriptor: CreatureDescriptor) -> Result<Creature, CreatureError> {
        Creature::new(CreatureId(1), descriptor, &MechanicsConfig::default())
    }

    #[test]
    fn defaults_are_applied() {
        let creature = build(descriptor()).unwrap();

        assert_eq!(creature.hitpoints(), 20);
        assert_eq!(creature.stat(CreatureStat::CarryStrength).current, 150);
        assert_eq!(creature.stat(CreatureStat::BaseSpeed).current, 70);
        assert_eq!(
            creature.combat().credits.maximum(CombatCreditType::Attack),
            MechanicsConfig::DEFAULT_ATTACK_CREDITS
        );
        assert_eq!(creature.skill_level(SkillType::Sword), 1);
        assert_eq!(creature.describe(), "a rat");
        assert_eq!(creature.awareness().len(), 0);
    }

    #[test]
    fn construction_is_validated() {
        assert_eq!(
            Creature::new(CreatureId::NONE, descriptor(), &MechanicsConfig::default())
                .unwrap_err(),
            CreatureError::MissingId
        );

        let mut blank = descriptor();
        blank.name = "   ".into();
        assert_eq!(build(blank).unwrap_err(), CreatureError::BlankName);

        let mut lifeless = descriptor();
        lifeless.max_hitpoints = 0;
        assert_eq!(build(lifeless).unwrap_err(), CreatureError::ZeroHitPoints);

        assert!(matches!(
            build(descriptor().with_credits(0, 1)),
            Err(CreatureError::Credits(_))
        ));

        let mut bad_skill = SkillSpec::starting(SkillType::Axe);
        bad_skill.increase_factor = 10;
        assert!(matches!(
            build(descriptor().with_skill(bad_skill)),
            Err(CreatureError::Skill(SkillError::ShrinkingRate(10)))
        ));
    }

    #[test]
    fn damage_notifies_and_kills_at_zero() {
        let mut creature = build(descriptor()).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        creature.subscribe_stats(move |change| sink.lock().unwrap().push(*change));

        assert_eq!(creature.damage(15).map(|change| change.current), Some(5));
        assert_eq!(creature.damage(15).map(|change| change.current), Some(0));
        assert_eq!(creature.damage(15), None);

        assert!(creature.is_dead());
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].previous, 5);
        assert_eq!(log[1].current, 0);
    }

    #[test]
    fn skill_overrides_replace_defaults() {
        let mut sword = SkillSpec::starting(SkillType::Sword);
        sword.level = 30;
        let creature = build(descriptor().with_skill(sword)).unwrap();

        assert_eq!(creature.skill_level(SkillType::Sword), 30);
        assert_eq!(creature.snapshot().skills.len(), SkillType::iter().count());
    }

    #[test]
    fn issuer_starts_at_one() {
        let issuer = CreatureIdIssuer::new();
        assert_eq!(issuer.issue(), CreatureId(1));
        assert_eq!(issuer.issue(), CreatureId(2));
        assert_eq!(CreatureIdIssuer::starting_at(0).issue(), CreatureId(1));
    }
}
