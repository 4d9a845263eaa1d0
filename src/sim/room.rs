//! Rooms and the horizontal transition between them
//!
//! Rooms form a doubly linked chain (one per slide). Moving between two rooms
//! is a short slide animation: while it runs `progress` climbs from 0 to 1 and
//! the current room only changes, once, on the tick it reaches 1.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::enemy::Enemy;
use super::geometry::Bounds;
use super::player::Player;
use crate::consts::TRANSITION_ENTRY_OFFSET;
use crate::slides::{Slide, SlideDeck};
use crate::tuning::{EnemyTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Room {
    /// 1-based, unique
    pub id: u32,
    pub slide: Slide,
    pub bounds: Bounds,
    pub enemies: Vec<Enemy>,
    pub left: Option<u32>,
    pub right: Option<u32>,
}

impl Room {
    /// Create a room and populate it with a few enemies dropping in from
    /// above the ground.
    pub fn new(
        id: u32,
        slide: Slide,
        bounds: Bounds,
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
    ) -> Self {
        let max = tuning.per_room_max.max(tuning.per_room_min);
        let count = rng.random_range(tuning.per_room_min..=max);
        let enemies = (0..count)
            .map(|i| {
                let x = 200.0 + rng.random::<f32>() * (bounds.width - 400.0).max(0.0);
                let y = bounds.ground_y - 100.0 - rng.random::<f32>() * 100.0;
                let delay = tuning.spawn_delay + i as f32 * tuning.spawn_stagger;
                Enemy::new(Vec2::new(x, y), i, delay, tuning, rng)
            })
            .collect();

        Self {
            id,
            slide,
            bounds,
            enemies,
            left: None,
            right: None,
        }
    }

    pub fn neighbor(&self, direction: Direction) -> Option<u32> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn update(&mut self, dt: f32, tuning: &EnemyTuning, rng: &mut impl Rng) {
        let bounds = self.bounds;
        for enemy in &mut self.enemies {
            enemy.update(dt, &bounds, tuning, rng);
        }
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn living_count(&self) -> usize {
        self.living_enemies().count()
    }

    pub fn clear_enemies(&mut self) {
        self.enemies.clear();
    }

    /// Apply new screen bounds and re-seat every enemy on the new ground
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        for enemy in &mut self.enemies {
            enemy.reseat(&bounds);
        }
    }
}

/// An in-flight move to a neighboring room
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub direction: Direction,
    pub target: u32,
    /// 0..=1
    pub progress: f32,
}

#[derive(Debug, Clone)]
pub struct RoomManager {
    /// Ordered by id; `rooms[i].id == i + 1`
    rooms: Vec<Room>,
    current: u32,
    transition: Option<Transition>,
    pub transition_speed: f32,
    bounds: Bounds,
}

impl RoomManager {
    /// One room per slide, linked left to right. An empty deck falls back to
    /// the demo deck so there is always a room to stand in.
    pub fn generate(deck: &SlideDeck, bounds: Bounds, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let demo;
        let deck = if deck.is_empty() {
            log::warn!("Empty slide deck, using demo slides");
            demo = SlideDeck::demo();
            &demo
        } else {
            deck
        };

        let total = deck.len() as u32;
        let rooms = deck
            .iter()
            .enumerate()
            .map(|(i, slide)| {
                let id = i as u32 + 1;
                let mut room = Room::new(id, slide.clone(), bounds, &tuning.enemy, rng);
                room.left = (id > 1).then(|| id - 1);
                room.right = (id < total).then(|| id + 1);
                room
            })
            .collect::<Vec<_>>();

        log::info!("Generated {} rooms", rooms.len());
        Self {
            rooms,
            current: 1,
            transition: None,
            transition_speed: tuning.world.transition_speed,
            bounds,
        }
    }

    pub fn room(&self, id: u32) -> Option<&Room> {
        let idx = (id as usize).checked_sub(1)?;
        self.rooms.get(idx).filter(|r| r.id == id)
    }

    fn room_mut(&mut self, id: u32) -> Option<&mut Room> {
        let idx = (id as usize).checked_sub(1)?;
        self.rooms.get_mut(idx).filter(|r| r.id == id)
    }

    pub fn current_id(&self) -> u32 {
        self.current
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.room(self.current)
    }

    pub fn current_room_mut(&mut self) -> Option<&mut Room> {
        self.room_mut(self.current)
    }

    pub fn total(&self) -> usize {
        self.rooms.len()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Start moving toward the neighbor in `direction`, repositioning the
    /// player at the entry side. Returns false when already moving or when
    /// there is no such neighbor.
    pub fn start_transition(&mut self, direction: Direction, player: &mut Player) -> bool {
        if self.transition.is_some() {
            return false;
        }
        let Some(target) = self.current_room().and_then(|r| r.neighbor(direction)) else {
            return false;
        };
        if self.room(target).is_none() {
            return false;
        }

        self.transition = Some(Transition {
            direction,
            target,
            progress: 0.0,
        });

        player.pos.x = match direction {
            Direction::Right => TRANSITION_ENTRY_OFFSET,
            Direction::Left => self.bounds.width - TRANSITION_ENTRY_OFFSET - player.size.x,
        };
        log::debug!("Transition {:?} to room {}", direction, target);
        true
    }

    /// Advance the transition. Returns the new room id on the tick it commits.
    pub fn update(&mut self, dt: f32) -> Option<u32> {
        let transition = self.transition.as_mut()?;
        transition.progress = (transition.progress + self.transition_speed * dt).min(1.0);
        if transition.progress < 1.0 {
            return None;
        }

        let target = transition.target;
        self.transition = None;
        self.current = target;
        log::info!("Entered room {}", target);
        Some(target)
    }

    /// Horizontal draw offsets `(current, target)` for the running transition.
    /// Going right the current room slides out to the left.
    pub fn offsets(&self) -> Option<(f32, f32)> {
        let t = self.transition.as_ref()?;
        let width = self.bounds.width;
        let shift = -t.direction.sign() * width * t.progress;
        Some((shift, shift + t.direction.sign() * width))
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        for room in &mut self.rooms {
            room.set_bounds(bounds);
        }
    }

    /// "Slide n/m - title" for the current room
    pub fn room_label(&self) -> String {
        match self.current_room() {
            Some(room) => format!("Slide {}/{} - {}", room.id, self.total(), room.slide.title),
            None => String::new(),
        }
    }
}
