//! Hit resolution between the player and the enemies of the current room

use super::enemy::Enemy;
use super::geometry::Rect;
use super::player::{DamageOutcome, Player};

/// Outcome of one player attack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackReport {
    pub hits: usize,
    pub kills: usize,
}

/// Apply an attack hitbox to every living enemy it overlaps.
///
/// The hitbox is resolved once, on the tick the attack starts.
pub fn resolve_attack(hitbox: &Rect, damage: i32, enemies: &mut [Enemy]) -> AttackReport {
    let mut report = AttackReport::default();
    for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
        if hitbox.intersects(&enemy.rect()) {
            report.hits += 1;
            if enemy.take_damage(damage) {
                report.kills += 1;
            }
        }
    }
    report
}

/// Damage the player from the first living enemy touching them.
///
/// Returns `None` when nothing touches the player. Invincibility is handled
/// by the player, so a touch during invincibility reports `Ignored`.
pub fn resolve_contact(
    player: &mut Player,
    enemies: &[Enemy],
    damage: i32,
) -> Option<DamageOutcome> {
    let body = player.rect();
    let enemy = enemies
        .iter()
        .find(|e| e.is_alive() && body.intersects(&e.rect()))?;
    Some(player.take_damage(damage, Some(enemy.rect().center())))
}
