//! Per-frame simulation tick
//!
//! Order within a tick: clamp dt, derive press edges, handle pause and the
//! debug toggle, advance the room transition, update the player and land its
//! attack, request a transition, update the current room's enemies, then
//! resolve contact damage.

use super::combat::{resolve_attack, resolve_contact};
use super::player::{DamageOutcome, PlayerControls};
use super::state::{GameEvent, GameState};
use crate::consts::MAX_FRAME_DT;

/// Buttons held during this frame, as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
    pub pause: bool,
    pub debug: bool,
}

impl TickInput {
    /// -1, 0 or +1. Right wins when both are held.
    pub fn horizontal(&self) -> f32 {
        if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        }
    }
}

/// Clamp a wall-clock frame delta before any integration
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Advance the game by one frame of (clamped) wall-clock time
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = clamp_dt(dt);

    // Edges are tracked even while paused so the latches follow the keys
    let edges = state.input.update(input);
    if edges.pause {
        state.toggle_pause();
    }
    if edges.debug {
        let enabled = state.settings.toggle_debug();
        state.events.push(GameEvent::DebugToggled { enabled });
    }
    if state.is_paused() {
        return;
    }

    state.time += dt;
    state.time_ticks += 1;

    if let Some(id) = state.rooms.update(dt) {
        state.events.push(GameEvent::RoomEntered { id });
    }

    let bounds = state.rooms.bounds();
    let transitioning = state.rooms.is_transitioning();
    let controls = PlayerControls {
        horizontal: input.horizontal(),
        jump_pressed: edges.jump,
        attack_pressed: edges.attack,
    };
    let room_id = state.rooms.current_id();
    // An attack lands on the tick it starts, before any transition begins
    if let Some(attack) = state.player.update(dt, &controls, &bounds, transitioning) {
        state.events.push(GameEvent::AttackStarted {
            weapon: attack.weapon,
        });
        if let Some(room) = state.rooms.current_room_mut() {
            let report = resolve_attack(&attack.hitbox, attack.damage, &mut room.enemies);
            if report.hits > 0 {
                log::debug!("Attack hit {} enemies", report.hits);
                state.events.push(GameEvent::EnemiesHit { count: report.hits });
            }
            for _ in 0..report.kills {
                state.events.push(GameEvent::EnemyDefeated { room: room_id });
            }
        }
    }

    if !transitioning {
        if let Some(direction) = state.player.transition_request(&bounds) {
            if state.rooms.start_transition(direction, &mut state.player) {
                state.player.start_transition_cooldown();
                if let Some(t) = state.rooms.transition() {
                    state.events.push(GameEvent::TransitionStarted {
                        direction,
                        target: t.target,
                    });
                }
            }
        }
    }

    let Some(room) = state.rooms.current_room_mut() else {
        return;
    };
    room.update(dt, &state.tuning.enemy, &mut state.rng);

    // No contact damage while the screen is sliding
    if state.rooms.is_transitioning() {
        return;
    }
    let Some(room) = state.rooms.current_room_mut() else {
        return;
    };

    let contact = resolve_contact(
        &mut state.player,
        &room.enemies,
        state.tuning.world.contact_damage,
    );
    match contact {
        Some(DamageOutcome::Hurt) => {
            log::debug!("Player hit, health {}", state.player.health);
            state.events.push(GameEvent::PlayerHurt {
                health: state.player.health,
            });
        }
        Some(DamageOutcome::Died) => state.player_died(),
        Some(DamageOutcome::Ignored) | None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Enemy;
    use crate::sim::state::GamePhase;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    /// A state whose first room holds a single grounded enemy at `x`
    fn state_with_enemy(x: f32) -> GameState {
        let mut state = GameState::new(99);
        let bounds = state.bounds();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::new(
            Vec2::new(x, bounds.ground_y - 20.0),
            0,
            0.0,
            &state.tuning.enemy,
            &mut rng,
        );
        enemy.is_spawning = false;
        enemy.has_landed = true;
        enemy.is_grounded = true;
        enemy.speed = 0.0;
        enemy.base_speed = 0.0;
        state.tuning.enemy.speed_wobble = 0.0;
        state.tuning.enemy.random_flip_rate = 0.0;
        if let Some(room) = state.rooms.current_room_mut() {
            room.enemies = vec![enemy];
        }
        ground_player(&mut state, 100.0);
        state
    }

    fn ground_player(state: &mut GameState, x: f32) {
        let ground = state.bounds().ground_y;
        state.player.pos = Vec2::new(x, ground - state.player.size.y);
        state.player.vel = Vec2::ZERO;
        state.player.is_grounded = true;
    }

    fn clear_room(state: &mut GameState) {
        if let Some(room) = state.rooms.current_room_mut() {
            room.clear_enemies();
        }
    }

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.5), MAX_FRAME_DT);
        assert_eq!(clamp_dt(0.01), 0.01);
        assert_eq!(clamp_dt(-1.0), 0.0);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut state = GameState::new(1);
        clear_room(&mut state);
        ground_player(&mut state, 100.0);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.5);
        let moved = state.player.pos.x - 100.0;
        assert!((moved - 300.0 / 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_held_jump_fires_once() {
        let mut state = GameState::new(1);
        clear_room(&mut state);
        ground_player(&mut state, 300.0);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        // A jump is the only way to leave the ground moving upward
        let mut impulses = 0;
        for _ in 0..120 {
            let was_grounded = state.player.is_grounded;
            tick(&mut state, &jump, DT);
            if was_grounded && !state.player.is_grounded && state.player.vel.y < 0.0 {
                impulses += 1;
            }
        }
        assert_eq!(impulses, 1);
        assert!(state.player.is_grounded);

        tick(&mut state, &TickInput::default(), DT);
        tick(&mut state, &jump, DT);
        assert!(state.player.vel.y < 0.0);
    }

    #[test]
    fn test_attack_kills_enemy_in_front() {
        let mut state = state_with_enemy(140.0);
        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        tick(&mut state, &attack, DT);

        let room = state.current_room().unwrap();
        assert_eq!(room.enemies[0].health, 0);
        assert_eq!(room.living_count(), 0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::EnemiesHit { count: 1 }));
        assert!(events.contains(&GameEvent::EnemyDefeated { room: 1 }));
    }

    #[test]
    fn test_held_attack_damages_once_per_activation() {
        let mut state = state_with_enemy(140.0);
        if let Some(room) = state.rooms.current_room_mut() {
            room.enemies[0].health = 100;
            room.enemies[0].max_health = 100;
        }
        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &attack, DT);
        }
        let room = state.current_room().unwrap();
        assert_eq!(room.enemies[0].health, 75);
    }

    #[test]
    fn test_attack_lands_on_transition_tick() {
        let mut state = state_with_enemy(0.0);
        let width = state.bounds().width;
        if let Some(room) = state.rooms.current_room_mut() {
            room.enemies[0].pos.x = width - 20.0;
            room.enemies[0].health = 100;
            room.enemies[0].max_health = 100;
        }
        ground_player(&mut state, width - 32.0 - 5.0);
        let input = TickInput {
            right: true,
            attack: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);

        assert!(state.rooms.is_transitioning());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::EnemiesHit { count: 1 }));
        let first = state.rooms.room(1).unwrap();
        assert_eq!(first.enemies[0].health, 75);
    }

    #[test]
    fn test_contact_hurts_player_once_per_window() {
        let mut state = state_with_enemy(110.0);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.health, 90);
        assert!(state.player.is_invincible);

        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.player.health, 90);
    }

    #[test]
    fn test_death_emits_event_and_restores() {
        let mut state = state_with_enemy(110.0);
        state.player.health = 10;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.health, state.player.max_health);
        assert!(state.drain_events().contains(&GameEvent::PlayerDied));
    }

    #[test]
    fn test_walking_off_right_edge_changes_room() {
        let mut state = GameState::new(1);
        clear_room(&mut state);
        let width = state.bounds().width;
        ground_player(&mut state, width - 32.0 - 5.0);
        let right = TickInput {
            right: true,
            ..Default::default()
        };

        tick(&mut state, &right, DT);
        assert!(state.rooms.is_transitioning());
        assert_eq!(state.player.pos.x, 50.0);
        assert!(!state.player.can_transition);

        let mut entered = None;
        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), DT);
            for event in state.drain_events() {
                if let GameEvent::RoomEntered { id } = event {
                    assert!(entered.is_none());
                    entered = Some(id);
                }
            }
        }
        assert_eq!(entered, Some(2));
        assert_eq!(state.rooms.current_id(), 2);
    }

    #[test]
    fn test_left_edge_of_first_room_is_a_wall() {
        let mut state = GameState::new(1);
        clear_room(&mut state);
        ground_player(&mut state, 2.0);
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &left, DT);
        }
        assert!(!state.rooms.is_transitioning());
        assert_eq!(state.player.pos.x, 0.0);
        assert_eq!(state.rooms.current_id(), 1);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = GameState::new(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert!(state.is_paused());

        let snapshot = (state.player.pos, state.time_ticks);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &right, DT);
        }
        assert_eq!((state.player.pos, state.time_ticks), snapshot);

        // Release then press again to resume
        tick(&mut state, &TickInput::default(), DT);
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_held_button_does_not_fire_after_resume() {
        let mut state = GameState::new(1);
        clear_room(&mut state);
        ground_player(&mut state, 300.0);

        // Jump goes down while the tab is hidden and no frames run
        state.set_focus(false);
        state.set_focus(true);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, DT);
        assert!(state.player.is_grounded);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_debug_toggle_is_edge_triggered() {
        let mut state = GameState::new(1);
        let debug = TickInput {
            debug: true,
            ..Default::default()
        };
        tick(&mut state, &debug, DT);
        tick(&mut state, &debug, DT);
        assert!(state.settings.debug_mode);
        tick(&mut state, &TickInput::default(), DT);
        tick(&mut state, &debug, DT);
        assert!(!state.settings.debug_mode);
    }

    #[test]
    fn test_enemies_in_other_rooms_stay_put() {
        let mut state = GameState::new(1);
        let before: Vec<Vec2> = state.rooms.rooms()[1].enemies.iter().map(|e| e.pos).collect();
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), DT);
        }
        let after: Vec<Vec2> = state.rooms.rooms()[1].enemies.iter().map(|e| e.pos).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_horizontal_right_wins() {
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(both.horizontal(), 1.0);
    }
}
