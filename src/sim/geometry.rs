//! Axis-aligned rectangles and the room bounds entities live in

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use crate::ground_line;

/// Axis-aligned bounding box, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Overlap test on half-open ranges: rectangles that only share an edge
    /// do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Playable area of a room, derived from the screen size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    /// Y of the flat ground line; entity bottoms rest here
    pub ground_y: f32,
}

impl Bounds {
    pub fn from_screen(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ground_y: ground_line(height),
        }
    }

    /// Clamp an x coordinate so a box of `width` stays on screen
    #[inline]
    pub fn clamp_x(&self, x: f32, width: f32) -> f32 {
        x.clamp(0.0, (self.width - width).max(0.0))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_screen(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
    }
}
