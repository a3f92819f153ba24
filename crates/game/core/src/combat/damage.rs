//! Damage calculation.

use super::modes::FightMode;

/// Flat damage added to every hit.
pub const BASE_DAMAGE: u32 = 5;

/// Calculate damage from a successful hit.
///
/// # Formula
///
/// ```text
/// base   = skill_level + BASE_DAMAGE
/// dealt  = base * attacker.attack_percent / 100
/// damage = max(dealt * defender.defense_percent / 100, 1)
/// ```
pub fn calculate_damage(skill_level: u32, attacker: FightMode, defender: FightMode) -> u32 {
    let base = u64::from(skill_level) + u64::from(BASE_DAMAGE);
    let dealt = base * u64::from(attacker.attack_percent()) / 100;
    let taken = dealt * u64::from(defender.defense_percent()) / 100;

    u32::try_from(taken).unwrap_or(u32::MAX).max(1)
}
