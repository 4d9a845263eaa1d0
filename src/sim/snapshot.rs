//! Read-only view of a frame for the presentation layer

use serde::Serialize;

use super::enemy::Enemy;
use super::geometry::{Bounds, Rect};
use super::room::Room;
use super::state::{GamePhase, GameState};
use super::weapon::{PosePart, Weapon};
use crate::slides::Slide;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    pub facing: f32,
    pub health: i32,
    pub max_health: i32,
    pub is_grounded: bool,
    pub is_moving: bool,
    pub is_invincible: bool,
    /// Off-phase of the invincibility blink; the body is skipped when false
    pub visible: bool,
    pub frame: u32,
    pub weapon: Weapon,
    /// `Some` while attacking, 0..=1
    pub attack_progress: Option<f32>,
    pub pose: Vec<PosePart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub rect: Rect,
    /// Vertical draw offset from the idle bob
    pub bob: f32,
    pub palette: usize,
    pub direction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomView {
    pub id: u32,
    /// Horizontal draw offset, non-zero only during a transition
    pub offset_x: f32,
    pub slide: Slide,
    pub enemies: Vec<EnemyView>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub bounds: Bounds,
    pub time: f32,
    pub phase: GamePhase,
    /// Manual pauses show a menu, focus-loss pauses do not
    pub show_pause_menu: bool,
    pub debug: bool,
    /// Current room first, then the incoming room during a transition
    pub rooms: Vec<RoomView>,
    pub player: PlayerView,
    pub room_label: String,
    pub total_rooms: usize,
    /// Attack area while attacking (debug overlay)
    pub attack_hitbox: Option<Rect>,
}

fn enemy_view(enemy: &Enemy) -> EnemyView {
    EnemyView {
        rect: enemy.rect(),
        bob: enemy.bob_offset,
        palette: enemy.palette_index(),
        direction: enemy.direction,
    }
}

fn room_view(room: &Room, offset_x: f32) -> RoomView {
    RoomView {
        id: room.id,
        offset_x,
        slide: room.slide.clone(),
        enemies: room.living_enemies().map(enemy_view).collect(),
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let bounds = self.bounds();
        let player = &self.player;

        let mut rooms = Vec::with_capacity(2);
        match (self.rooms.offsets(), self.rooms.transition()) {
            (Some((current, incoming)), Some(t)) => {
                if let Some(room) = self.rooms.current_room() {
                    rooms.push(room_view(room, current));
                }
                if let Some(room) = self.rooms.room(t.target) {
                    rooms.push(room_view(room, incoming));
                }
            }
            _ => {
                if let Some(room) = self.rooms.current_room() {
                    rooms.push(room_view(room, 0.0));
                }
            }
        }

        let weapon = player.weapon();
        let attack_progress = player.attack_progress();
        let wielder = player.wielder();
        let pose = match attack_progress {
            Some(progress) => weapon.attack_pose(&wielder, progress),
            None => weapon.idle_pose(&wielder),
        };
        // Blink at 10 Hz while invincible
        let visible = !player.is_invincible || (player.invincibility_timer * 10.0) as u32 % 2 == 0;

        Snapshot {
            bounds,
            time: self.time,
            phase: self.phase,
            show_pause_menu: self.phase
                == GamePhase::Paused {
                    by_focus_loss: false,
                },
            debug: self.settings.debug_mode,
            rooms,
            player: PlayerView {
                rect: player.rect(),
                facing: player.facing,
                health: player.health,
                max_health: player.max_health,
                is_grounded: player.is_grounded,
                is_moving: wielder.moving,
                is_invincible: player.is_invincible,
                visible,
                frame: player.frame_index(),
                weapon,
                attack_progress,
                pose,
            },
            room_label: self.rooms.room_label(),
            total_rooms: self.rooms.total(),
            attack_hitbox: player.active_hitbox,
        }
    }
}
