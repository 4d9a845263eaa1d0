//! The player character
//!
//! Several sub-states run side by side: grounded/airborne, idle/attacking,
//! normal/invincible and free control/knockback. Each has its own timer and
//! they are advanced together once per tick.

use glam::Vec2;
use serde::Serialize;

use super::geometry::{Bounds, Rect};
use super::room::Direction;
use super::weapon::{Loadout, Weapon, Wielder};
use crate::consts::{
    ATTACK_MIN_BAND, PLAYER_HEIGHT, PLAYER_WIDTH, TRANSITION_EDGE_MARGIN,
};
use crate::direction_or;
use crate::tuning::PlayerTuning;

/// Per-tick controls after edge detection
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerControls {
    /// -1 left, 0 none, +1 right
    pub horizontal: f32,
    pub jump_pressed: bool,
    pub attack_pressed: bool,
}

/// Result of `Player::take_damage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DamageOutcome {
    /// Invincible, nothing changed
    Ignored,
    Hurt,
    /// Health hit zero; the caller runs the death hook, then `restore`
    Died,
}

/// An attack that started this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackStart {
    pub weapon: Weapon,
    pub hitbox: Rect,
    pub damage: i32,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub is_grounded: bool,
    pub coyote_timer: f32,
    /// +1 facing right, -1 facing left
    pub facing: f32,

    pub is_attacking: bool,
    pub attack_timer: f32,
    pub attack_cooldown_timer: f32,
    /// Hitbox resolved when the current attack started
    pub active_hitbox: Option<Rect>,

    pub is_invincible: bool,
    pub invincibility_timer: f32,

    pub is_knocked_back: bool,
    pub knockback_timer: f32,

    pub can_transition: bool,
    pub transition_timer: f32,

    pub loadout: Loadout,
    pub anim_time: f32,
    pub tuning: PlayerTuning,
}

impl Player {
    pub fn new(pos: Vec2, tuning: PlayerTuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            health: tuning.max_health,
            max_health: tuning.max_health,
            is_grounded: false,
            coyote_timer: 0.0,
            facing: 1.0,
            is_attacking: false,
            attack_timer: 0.0,
            attack_cooldown_timer: 0.0,
            active_hitbox: None,
            is_invincible: false,
            invincibility_timer: 0.0,
            is_knocked_back: false,
            knockback_timer: 0.0,
            can_transition: true,
            transition_timer: 0.0,
            loadout: Loadout::default(),
            anim_time: 0.0,
            tuning,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn weapon(&self) -> Weapon {
        self.loadout.current()
    }

    /// Walk-cycle frame (4 frames, 10 per second)
    pub fn frame_index(&self) -> u32 {
        (self.anim_time / 0.1) as u32 % 4
    }

    /// Attack animation progress in 0..=1, `None` when not attacking
    pub fn attack_progress(&self) -> Option<f32> {
        if !self.is_attacking {
            return None;
        }
        let duration = self.weapon().stats().attack_duration;
        Some((1.0 - self.attack_timer / duration).clamp(0.0, 1.0))
    }

    pub fn wielder(&self) -> Wielder {
        Wielder {
            rect: self.rect(),
            facing: self.facing,
            moving: self.vel.x.abs() > 10.0,
            anim_time: self.anim_time,
        }
    }

    /// Advance one tick. Input is ignored while a room transition runs.
    /// Returns the attack that started this tick, if any.
    pub fn update(
        &mut self,
        dt: f32,
        controls: &PlayerControls,
        bounds: &Bounds,
        transitioning: bool,
    ) -> Option<AttackStart> {
        let attack = if transitioning {
            None
        } else {
            self.handle_input(dt, controls, bounds)
        };
        self.update_physics(dt, bounds);
        self.update_combat(dt);
        self.update_status(dt);
        self.anim_time += dt;
        attack
    }

    fn handle_input(
        &mut self,
        dt: f32,
        controls: &PlayerControls,
        bounds: &Bounds,
    ) -> Option<AttackStart> {
        let input = controls.horizontal;
        if input != 0.0 {
            self.facing = input.signum();
        }

        if !self.is_knocked_back {
            let speed = self.tuning.speed;
            if self.is_grounded {
                // Tight platformer feel: no ramp up, no slide
                self.vel.x = input * speed;
            } else if input != 0.0 {
                self.vel.x += input * speed * self.tuning.air_accel_factor * dt;
                self.vel.x = self.vel.x.clamp(-speed, speed);
            } else {
                self.vel.x *= self.tuning.air_drag;
            }
        }

        if controls.jump_pressed && (self.is_grounded || self.coyote_timer > 0.0) {
            log::debug!("Jump");
            self.vel.y = -self.tuning.jump_power;
            self.coyote_timer = 0.0;
            self.is_grounded = false;
        }

        if controls.attack_pressed && !self.is_attacking && self.attack_cooldown_timer <= 0.0 {
            return Some(self.start_attack(bounds));
        }
        None
    }

    fn update_physics(&mut self, dt: f32, bounds: &Bounds) {
        if !self.is_grounded {
            self.vel.y += self.tuning.gravity * dt;
            self.coyote_timer = (self.coyote_timer - dt).max(0.0);
        }

        self.pos += self.vel * dt;

        if self.pos.y + self.size.y >= bounds.ground_y && self.vel.y >= 0.0 {
            self.pos.y = bounds.ground_y - self.size.y;
            self.vel.y = 0.0;
            // Knockback keeps the player airborne until it wears off
            if !self.is_knocked_back {
                self.is_grounded = true;
                self.coyote_timer = self.tuning.coyote_time;
            }
        } else {
            self.is_grounded = false;
        }

        self.pos.x = bounds.clamp_x(self.pos.x, self.size.x);
    }

    fn update_combat(&mut self, dt: f32) {
        if self.is_attacking {
            self.attack_timer -= dt;
            if self.attack_timer <= 0.0 {
                self.is_attacking = false;
                self.attack_timer = 0.0;
                self.active_hitbox = None;
                self.attack_cooldown_timer = self.weapon().stats().attack_cooldown;
                return;
            }
        }
        if self.attack_cooldown_timer > 0.0 {
            self.attack_cooldown_timer = (self.attack_cooldown_timer - dt).max(0.0);
        }
    }

    fn update_status(&mut self, dt: f32) {
        if self.is_invincible {
            self.invincibility_timer -= dt;
            if self.invincibility_timer <= 0.0 {
                self.is_invincible = false;
                self.invincibility_timer = 0.0;
            }
        }
        if self.is_knocked_back {
            self.knockback_timer -= dt;
            if self.knockback_timer <= 0.0 {
                self.is_knocked_back = false;
                self.knockback_timer = 0.0;
            }
        }
        if self.transition_timer > 0.0 {
            self.transition_timer -= dt;
            if self.transition_timer <= 0.0 {
                self.transition_timer = 0.0;
                self.can_transition = true;
            }
        }
    }

    fn start_attack(&mut self, bounds: &Bounds) -> AttackStart {
        let weapon = self.weapon();
        let stats = weapon.stats();
        log::debug!("Starting attack with {}", stats.name);

        self.is_attacking = true;
        self.attack_timer = stats.attack_duration;
        weapon.on_attack_start();

        let hitbox = self.attack_hitbox(stats.range, bounds.ground_y);
        self.active_hitbox = Some(hitbox);
        AttackStart {
            weapon,
            hitbox,
            damage: stats.damage,
        }
    }

    /// Area in front of the player, from its center down to the ground.
    /// The band is never thinner than `ATTACK_MIN_BAND`.
    pub fn attack_hitbox(&self, range: f32, ground_y: f32) -> Rect {
        let x = if self.facing > 0.0 {
            self.pos.x + self.size.x
        } else {
            self.pos.x - range
        };
        let top = self.rect().center().y.min(ground_y - ATTACK_MIN_BAND);
        Rect::new(x, top, range, ground_y - top)
    }

    /// Take damage from an optional source position (its center).
    pub fn take_damage(&mut self, amount: i32, source: Option<Vec2>) -> DamageOutcome {
        if self.is_invincible {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount).max(0);
        self.is_invincible = true;
        self.invincibility_timer = self.tuning.invincibility_duration;

        if let Some(source) = source {
            self.apply_knockback(source);
        }

        if self.health == 0 {
            log::info!("Player died");
            return DamageOutcome::Died;
        }
        DamageOutcome::Hurt
    }

    fn apply_knockback(&mut self, source: Vec2) {
        let away = direction_or(source, self.rect().center(), Vec2::new(-self.facing, 0.0));
        self.vel = Vec2::new(
            away.x * self.tuning.knockback_horizontal,
            -self.tuning.knockback_vertical,
        );
        self.is_knocked_back = true;
        self.knockback_timer = self.tuning.knockback_duration;
        self.is_grounded = false;
        self.coyote_timer = 0.0;
    }

    /// Soft reset after death: full health, no motion, no status effects
    pub fn restore(&mut self) {
        self.health = self.max_health;
        self.vel = Vec2::ZERO;
        self.is_attacking = false;
        self.attack_timer = 0.0;
        self.attack_cooldown_timer = 0.0;
        self.active_hitbox = None;
        self.is_invincible = false;
        self.invincibility_timer = 0.0;
        self.is_knocked_back = false;
        self.knockback_timer = 0.0;
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Edge the player is pushing against, if a transition may start
    pub fn transition_request(&self, bounds: &Bounds) -> Option<Direction> {
        if !self.can_transition {
            return None;
        }
        if self.pos.x <= TRANSITION_EDGE_MARGIN && self.vel.x < 0.0 {
            Some(Direction::Left)
        } else if self.pos.x >= bounds.width - self.size.x - TRANSITION_EDGE_MARGIN
            && self.vel.x > 0.0
        {
            Some(Direction::Right)
        } else {
            None
        }
    }

    pub fn start_transition_cooldown(&mut self) {
        self.can_transition = false;
        self.transition_timer = self.tuning.transition_cooldown;
    }

    /// Keep the player on the ground line and on screen after a resize
    pub fn reseat(&mut self, bounds: &Bounds) {
        if self.is_grounded || self.pos.y + self.size.y > bounds.ground_y {
            self.pos.y = bounds.ground_y - self.size.y;
            self.vel.y = self.vel.y.min(0.0);
        }
        self.pos.x = bounds.clamp_x(self.pos.x, self.size.x);
    }
}
