//! Weapons and the player's loadout
//!
//! A weapon is a plain value. Its capabilities (how it looks when idle, how
//! the attack animates, what happens when an attack starts) are methods on the
//! enum; a new weapon is a new variant.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::geometry::Rect;

/// Immutable combat numbers for a weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeaponStats {
    pub name: &'static str,
    pub damage: i32,
    /// Horizontal reach of the hitbox in front of the player
    pub range: f32,
    pub attack_duration: f32,
    pub attack_cooldown: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    Punch,
}

/// What the renderer needs to know about whoever holds the weapon
#[derive(Debug, Clone, Copy)]
pub struct Wielder {
    pub rect: Rect,
    pub facing: f32,
    pub moving: bool,
    pub anim_time: f32,
}

/// One drawable piece of a weapon pose, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PosePart {
    Hand { center: Vec2, radius: f32 },
    Arm(Rect),
    Fist(Rect),
    Knuckle(Rect),
    Impact { center: Vec2 },
}

const HAND_SIZE: f32 = 8.0;
const MAX_PUNCH_DISTANCE: f32 = 25.0;

impl Weapon {
    pub fn stats(&self) -> WeaponStats {
        match self {
            Weapon::Punch => WeaponStats {
                name: "Fists",
                damage: 25,
                range: 50.0,
                attack_duration: 0.3,
                attack_cooldown: 0.5,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.stats().name
    }

    /// Pose drawn while the player is not attacking
    pub fn idle_pose(&self, wielder: &Wielder) -> Vec<PosePart> {
        match self {
            Weapon::Punch => {
                let r = wielder.rect;
                let base_x = if wielder.facing > 0.0 {
                    r.right() + 6.0
                } else {
                    r.x - 6.0
                };
                let bob = if wielder.moving {
                    (wielder.anim_time * 8.0).sin() * 2.0
                } else {
                    0.0
                };
                let hand_y = r.y + r.height / 2.0 + bob;

                let mut parts = Vec::with_capacity(4);
                for hand_x in [base_x - 4.0, base_x + 4.0] {
                    parts.push(PosePart::Hand {
                        center: Vec2::new(hand_x, hand_y),
                        radius: HAND_SIZE / 2.0,
                    });
                    parts.push(PosePart::Knuckle(Rect::new(
                        hand_x - 1.0,
                        hand_y - 1.0,
                        2.0,
                        2.0,
                    )));
                }
                parts
            }
        }
    }

    /// Pose drawn during an attack, `progress` runs 0 → 1 over the attack
    pub fn attack_pose(&self, wielder: &Wielder, progress: f32) -> Vec<PosePart> {
        match self {
            Weapon::Punch => {
                let r = wielder.rect;
                let right = wielder.facing > 0.0;
                let punch = (progress.clamp(0.0, 1.0) * PI).sin() * MAX_PUNCH_DISTANCE;
                let arm_length = 12.0 + punch;
                let bob = if wielder.moving {
                    (wielder.anim_time * 8.0).sin()
                } else {
                    0.0
                };

                let arm_start_x = if right { r.right() } else { r.x };
                let arm_y = r.y + r.height / 2.0 - 2.0 + bob;
                let hand_x = if right {
                    arm_start_x + arm_length
                } else {
                    arm_start_x - arm_length - HAND_SIZE
                };
                let hand_y = arm_y - HAND_SIZE / 2.0;

                let arm_x = if right {
                    arm_start_x
                } else {
                    arm_start_x - arm_length
                };
                let mut parts = vec![
                    PosePart::Arm(Rect::new(arm_x, arm_y, arm_length, 4.0)),
                    PosePart::Fist(Rect::new(hand_x, hand_y, HAND_SIZE, HAND_SIZE)),
                    PosePart::Knuckle(Rect::new(hand_x + 1.0, hand_y + 1.0, 2.0, 2.0)),
                    PosePart::Knuckle(Rect::new(hand_x + 1.0, hand_y + 3.0, 2.0, 2.0)),
                ];

                if punch > MAX_PUNCH_DISTANCE * 0.7 {
                    let impact_x = if right { hand_x + HAND_SIZE } else { hand_x - 8.0 };
                    parts.push(PosePart::Impact {
                        center: Vec2::new(impact_x, hand_y + HAND_SIZE / 2.0),
                    });
                }
                parts
            }
        }
    }

    /// Hook run once when an attack begins
    pub fn on_attack_start(&self) {
        match self {
            Weapon::Punch => log::debug!("Punch attack started"),
        }
    }
}

/// Weapons the player carries, keyed by id
#[derive(Debug, Clone)]
pub struct Loadout {
    weapons: Vec<(String, Weapon)>,
    current: usize,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            weapons: vec![("punch".to_string(), Weapon::Punch)],
            current: 0,
        }
    }
}

impl Loadout {
    pub fn current(&self) -> Weapon {
        self.weapons[self.current].1
    }

    pub fn current_id(&self) -> &str {
        &self.weapons[self.current].0
    }

    /// Switch to a carried weapon; unknown ids are ignored
    pub fn switch_weapon(&mut self, id: &str) -> bool {
        match self.weapons.iter().position(|(key, _)| key == id) {
            Some(idx) => {
                self.current = idx;
                log::info!("Switched to weapon: {}", self.weapons[idx].1.name());
                true
            }
            None => false,
        }
    }

    /// Add a weapon, replacing any weapon already stored under `id`
    pub fn add_weapon(&mut self, id: &str, weapon: Weapon) {
        match self.weapons.iter_mut().find(|(key, _)| key == id) {
            Some(slot) => slot.1 = weapon,
            None => self.weapons.push((id.to_string(), weapon)),
        }
    }

    pub fn available(&self) -> Vec<&str> {
        self.weapons.iter().map(|(id, _)| id.as_str()).collect()
    }
}
