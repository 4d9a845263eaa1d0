//! Data-driven game balance
//!
//! Every field has a default, so a JSON override only needs the values it
//! changes.

use serde::{Deserialize, Serialize};

/// Player movement, combat and damage response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: i32,
    /// Ground speed and air speed cap (px/s)
    pub speed: f32,
    /// Air acceleration as a multiple of `speed` per second
    pub air_accel_factor: f32,
    /// Multiplicative horizontal drag per tick in the air with no input
    pub air_drag: f32,
    pub jump_power: f32,
    pub gravity: f32,
    /// Grace window after leaving the ground during which a jump is honored
    pub coyote_time: f32,
    pub invincibility_duration: f32,
    pub knockback_duration: f32,
    pub knockback_horizontal: f32,
    /// Always applied upward, regardless of where the hit came from
    pub knockback_vertical: f32,
    /// Delay before another room transition may start
    pub transition_cooldown: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            speed: 300.0,
            air_accel_factor: 1.5,
            air_drag: 0.995,
            jump_power: 500.0,
            gravity: 1200.0,
            coyote_time: 0.1,
            invincibility_duration: 1.0,
            knockback_duration: 0.3,
            knockback_horizontal: 300.0,
            knockback_vertical: 250.0,
            transition_cooldown: 1.0,
        }
    }
}

/// Patrol enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub max_health: i32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub base_speed: f32,
    /// Speed jitter applied on boundary reversals (base ± this)
    pub speed_jitter: f32,
    /// Speed jitter applied on random flips (base ± this)
    pub flip_speed_jitter: f32,
    pub patrol_min: f32,
    pub patrol_max: f32,
    /// Expected random direction flips per second
    pub random_flip_rate: f32,
    /// Amplitude of the slow speed wobble while patrolling
    pub speed_wobble: f32,
    /// Spawn delay of the first enemy in a room
    pub spawn_delay: f32,
    /// Extra spawn delay for each following enemy
    pub spawn_stagger: f32,
    /// Enemies per room, inclusive range
    pub per_room_min: u32,
    pub per_room_max: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            max_health: 1,
            gravity: 800.0,
            max_fall_speed: 600.0,
            base_speed: 60.0,
            speed_jitter: 10.0,
            flip_speed_jitter: 7.5,
            patrol_min: 80.0,
            patrol_max: 120.0,
            random_flip_rate: 0.1,
            speed_wobble: 5.0,
            spawn_delay: 0.5,
            spawn_stagger: 0.4,
            per_room_min: 2,
            per_room_max: 3,
        }
    }
}

/// Rooms and combat rules that involve both sides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Transition progress per second (2.0 = half a second per slide)
    pub transition_speed: f32,
    /// Damage dealt to the player on enemy contact
    pub contact_damage: i32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            transition_speed: 2.0,
            contact_damage: 10,
        }
    }
}

/// All balance knobs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub world: WorldTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player": { "speed": 420.0 } }"#).unwrap();
        assert_eq!(tuning.player.speed, 420.0);
        assert_eq!(tuning.player.jump_power, 500.0);
        assert_eq!(tuning.enemy, EnemyTuning::default());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Tuning::from_json("{ player: }").is_err());
    }

    #[test]
    fn test_json_roundtrip_defaults() {
        let json = Tuning::default().to_json();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }
}
