//! Patrol enemies
//!
//! Lifecycle: `Spawning` (inert while the delay runs, then falling) →
//! `Patrol` once it first touches the ground → `Dead`. Dead enemies stay in
//! their room's list but are never updated or drawn again.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::geometry::{Bounds, Rect};
use crate::consts::{ENEMY_HEIGHT, ENEMY_WIDTH};
use crate::tuning::EnemyTuning;

/// Coarse lifecycle state, derived from the enemy's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnemyPhase {
    /// Waiting out the spawn delay
    Delayed,
    /// Falling toward the ground for the first time
    Falling,
    Patrol,
    Dead,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub is_grounded: bool,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    pub base_speed: f32,
    pub speed: f32,
    pub patrol_distance: f32,
    /// Patrol center, latched on first landing
    pub start_x: f32,
    pub is_spawning: bool,
    pub spawn_delay: f32,
    pub has_landed: bool,
    pub phase_offset: f32,
    /// Position in the room's list, used for animation variety
    pub index: u32,
    pub anim_time: f32,
    pub bob_offset: f32,
}

/// Uniform jitter in `[-amount, amount]`
fn jitter(rng: &mut impl Rng, amount: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0 * amount
}

impl Enemy {
    pub fn new(
        pos: Vec2,
        index: u32,
        spawn_delay: f32,
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
    ) -> Self {
        let phase_offset = index as f32 * 0.5 + rng.random::<f32>() * 2.0;
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            health: tuning.max_health,
            max_health: tuning.max_health,
            is_grounded: false,
            direction: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
            base_speed: tuning.base_speed,
            speed: tuning.base_speed + jitter(rng, tuning.speed_jitter),
            patrol_distance: tuning.patrol_min
                + rng.random::<f32>() * (tuning.patrol_max - tuning.patrol_min),
            start_x: pos.x,
            is_spawning: true,
            spawn_delay,
            has_landed: false,
            phase_offset,
            index,
            anim_time: phase_offset,
            bob_offset: 0.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn phase(&self) -> EnemyPhase {
        if !self.is_alive() {
            EnemyPhase::Dead
        } else if self.spawn_delay > 0.0 {
            EnemyPhase::Delayed
        } else if !self.has_landed {
            EnemyPhase::Falling
        } else {
            EnemyPhase::Patrol
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        bounds: &Bounds,
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
    ) {
        if !self.is_alive() {
            return;
        }

        if self.spawn_delay > 0.0 {
            self.spawn_delay = (self.spawn_delay - dt).max(0.0);
            return;
        }

        if self.has_landed {
            self.update_patrol(dt, tuning, rng);
        } else {
            self.vel.x = 0.0;
        }
        self.update_physics(dt, bounds, tuning);
        self.update_animation(dt);
    }

    fn update_patrol(&mut self, dt: f32, tuning: &EnemyTuning, rng: &mut impl Rng) {
        let from_start = self.pos.x - self.start_x;

        // Only reverse when still heading outward, so we never jitter on the edge
        if from_start >= self.patrol_distance && self.direction > 0.0 {
            self.direction = -1.0;
            self.speed = self.base_speed + jitter(rng, tuning.speed_jitter);
        } else if from_start <= -self.patrol_distance && self.direction < 0.0 {
            self.direction = 1.0;
            self.speed = self.base_speed + jitter(rng, tuning.speed_jitter);
        }

        if rng.random::<f32>() < dt * tuning.random_flip_rate {
            self.direction = -self.direction;
            self.speed = self.base_speed + jitter(rng, tuning.flip_speed_jitter);
        }

        let wobble = (self.anim_time * 0.5).sin() * tuning.speed_wobble;
        self.vel.x = self.direction * (self.speed + wobble);
    }

    fn update_physics(&mut self, dt: f32, bounds: &Bounds, tuning: &EnemyTuning) {
        if !self.is_grounded {
            self.vel.y = (self.vel.y + tuning.gravity * dt).min(tuning.max_fall_speed);
        }

        self.pos += self.vel * dt;

        if self.pos.y + self.size.y >= bounds.ground_y {
            self.pos.y = bounds.ground_y - self.size.y;
            self.vel.y = 0.0;
            self.is_grounded = true;
            if !self.has_landed {
                self.has_landed = true;
                self.is_spawning = false;
                self.start_x = self.pos.x;
                log::debug!("Enemy {} landed at x={:.1}", self.index, self.pos.x);
            }
        } else {
            self.is_grounded = false;
        }

        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.direction = 1.0;
        } else if self.pos.x + self.size.x > bounds.width {
            self.pos.x = (bounds.width - self.size.x).max(0.0);
            self.direction = -1.0;
        }
    }

    fn update_animation(&mut self, dt: f32) {
        self.anim_time += dt;
        let frequency = 4.0 + self.index as f32 * 0.5;
        self.bob_offset = (self.anim_time * frequency + self.phase_offset).sin();
    }

    /// Apply damage, returns true if this hit killed the enemy
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            log::debug!("Enemy {} defeated", self.index);
            return true;
        }
        false
    }

    /// Re-seat on a changed screen: stand on the new ground line and stay in
    /// the horizontal bounds. Dead enemies are left untouched.
    pub fn reseat(&mut self, bounds: &Bounds) {
        if !self.is_alive() {
            return;
        }
        if self.has_landed || self.pos.y + self.size.y > bounds.ground_y {
            self.pos.y = bounds.ground_y - self.size.y;
            self.vel.y = 0.0;
        }
        self.pos.x = bounds.clamp_x(self.pos.x, self.size.x);
        self.start_x = bounds.clamp_x(self.start_x, self.size.x);
    }

    /// Which of the five body tints to use
    pub fn palette_index(&self) -> usize {
        self.index as usize % 5
    }
}
