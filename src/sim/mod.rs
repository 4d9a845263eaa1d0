//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - Frame delta clamped before any integration
//! - Seeded RNG only
//! - Stable iteration order (enemies in spawn order, rooms by id)

pub mod combat;
pub mod enemy;
pub mod geometry;
pub mod input;
pub mod player;
pub mod room;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod weapon;

pub use combat::{AttackReport, resolve_attack, resolve_contact};
pub use enemy::{Enemy, EnemyPhase};
pub use geometry::{Bounds, Rect};
pub use input::{ButtonLatch, Edges, InputTracker};
pub use player::{AttackStart, DamageOutcome, Player, PlayerControls};
pub use room::{Direction, Room, RoomManager, Transition};
pub use snapshot::{EnemyView, PlayerView, RoomView, Snapshot};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, clamp_dt, tick};
pub use weapon::{Loadout, PosePart, Weapon, WeaponStats, Wielder};
