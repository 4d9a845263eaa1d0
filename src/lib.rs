//! Slide Scroller - a side-scrolling platformer through a slide deck
//!
//! Core modules:
//! - `sim`: Simulation (entities, combat, rooms, transitions, tick)
//! - `renderer`: Display list built from a simulation snapshot
//! - `platform`: Browser key codes mapped onto logical buttons
//! - `slides`: Slide deck contract and loading progress
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod slides;
pub mod tuning;

pub use settings::Settings;
pub use slides::{Slide, SlideDeck, SlideImage};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Upper bound for one frame's delta time (seconds)
    pub const MAX_FRAME_DT: f32 = 1.0 / 60.0;

    /// Distance between the bottom of the screen and the ground line
    pub const GROUND_MARGIN: f32 = 50.0;

    /// Screen size used before the host reports the real viewport
    pub const DEFAULT_SCREEN_WIDTH: f32 = 1200.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 800.0;

    /// Entity bounding boxes
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const ENEMY_WIDTH: f32 = 20.0;
    pub const ENEMY_HEIGHT: f32 = 20.0;

    /// Player spawn point (y is measured up from the screen bottom)
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_FROM_BOTTOM: f32 = 150.0;

    /// How close to a screen edge the player must get to leave the room
    pub const TRANSITION_EDGE_MARGIN: f32 = 10.0;
    /// Where the player re-enters, measured from the opposite edge
    pub const TRANSITION_ENTRY_OFFSET: f32 = 50.0;

    /// Minimum height of the attack hitbox band
    pub const ATTACK_MIN_BAND: f32 = 40.0;

    /// Slides beyond this count are ignored
    pub const MAX_SLIDES: usize = 100;
}

/// Ground line for a screen of the given height
#[inline]
pub fn ground_line(screen_height: f32) -> f32 {
    screen_height - consts::GROUND_MARGIN
}

/// Unit vector from `from` toward `to`, or `fallback` when they coincide
#[inline]
pub fn direction_or(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    let delta = to - from;
    if delta.length_squared() <= f32::EPSILON {
        fallback
    } else {
        delta.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_line() {
        assert_eq!(ground_line(800.0), 750.0);
    }

    #[test]
    fn test_direction_or() {
        let d = direction_or(Vec2::ZERO, Vec2::new(3.0, 4.0), Vec2::X);
        assert!((d - Vec2::new(0.6, 0.8)).length() < 1e-6);
        assert_eq!(direction_or(Vec2::ONE, Vec2::ONE, Vec2::NEG_X), Vec2::NEG_X);
    }
}
