//! Game state and events
//!
//! `GameState` is the single explicit context the host owns and passes to
//! `tick`. Nothing in the simulation reaches for globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::geometry::Bounds;
use super::input::InputTracker;
use super::player::Player;
use super::room::{Direction, Room, RoomManager};
use super::weapon::Weapon;
use crate::consts::{
    DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, PLAYER_SPAWN_FROM_BOTTOM, PLAYER_SPAWN_X,
};
use crate::settings::Settings;
use crate::slides::SlideDeck;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Playing,
    /// Frozen. A focus-loss pause is silent and only lifted by regaining focus.
    Paused { by_focus_loss: bool },
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    AttackStarted { weapon: Weapon },
    EnemiesHit { count: usize },
    EnemyDefeated { room: u32 },
    PlayerHurt { health: i32 },
    PlayerDied,
    TransitionStarted { direction: Direction, target: u32 },
    RoomEntered { id: u32 },
    Paused { by_focus_loss: bool },
    Resumed,
    DebugToggled { enabled: bool },
    SlidesLoaded { count: usize },
}

type DeathHook = Box<dyn FnMut()>;

pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub settings: Settings,
    pub player: Player,
    pub rooms: RoomManager,
    pub deck: SlideDeck,
    pub phase: GamePhase,
    /// Seconds of unpaused play
    pub time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) input: InputTracker,
    pub(crate) events: Vec<GameEvent>,
    on_death: Option<DeathHook>,
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("seed", &self.seed)
            .field("phase", &self.phase)
            .field("room", &self.rooms.current_id())
            .field("time_ticks", &self.time_ticks)
            .finish_non_exhaustive()
    }
}

fn spawn_point(bounds: &Bounds) -> Vec2 {
    Vec2::new(PLAYER_SPAWN_X, bounds.height - PLAYER_SPAWN_FROM_BOTTOM)
}

impl GameState {
    /// Create a new game with the demo deck and default balance
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Settings::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bounds = Bounds::from_screen(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT);
        let deck = SlideDeck::demo();
        let rooms = RoomManager::generate(&deck, bounds, &tuning, &mut rng);
        let player = Player::new(spawn_point(&bounds), tuning.player.clone());

        Self {
            seed,
            rng,
            tuning,
            settings,
            player,
            rooms,
            deck,
            phase: GamePhase::Playing,
            time: 0.0,
            time_ticks: 0,
            input: InputTracker::new(),
            events: Vec::new(),
            on_death: None,
        }
    }

    /// Register a callback run whenever the player dies
    pub fn set_on_death(&mut self, hook: impl FnMut() + 'static) {
        self.on_death = Some(Box::new(hook));
    }

    pub fn bounds(&self) -> Bounds {
        self.rooms.bounds()
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.rooms.current_room()
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, GamePhase::Paused { .. })
    }

    /// Replace the deck: rooms are rebuilt, any transition is dropped and the
    /// player goes back to the spawn point with their health intact.
    pub fn load_slides(&mut self, deck: SlideDeck) {
        let bounds = self.bounds();
        self.rooms = RoomManager::generate(&deck, bounds, &self.tuning, &mut self.rng);
        self.deck = deck;

        self.player.pos = spawn_point(&bounds);
        self.player.vel = Vec2::ZERO;
        self.player.can_transition = true;
        self.player.transition_timer = 0.0;

        log::info!("Loaded {} slides", self.rooms.total());
        self.events.push(GameEvent::SlidesLoaded {
            count: self.rooms.total(),
        });
    }

    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        let bounds = Bounds::from_screen(width, height);
        if bounds == self.bounds() {
            return;
        }
        log::debug!("Screen resized to {}x{}", width, height);
        self.rooms.set_bounds(bounds);
        self.player.reseat(&bounds);
    }

    /// Start over in the first room with a fresh player
    pub fn restart(&mut self) {
        let bounds = self.bounds();
        self.rooms = RoomManager::generate(&self.deck, bounds, &self.tuning, &mut self.rng);
        self.player = Player::new(spawn_point(&bounds), self.tuning.player.clone());
        self.phase = GamePhase::Playing;
        self.input.arm_all();
        log::info!("Game restarted");
    }

    /// Manual pause toggle. Ignored while paused by focus loss.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused {
                    by_focus_loss: false,
                };
                log::info!("Game paused");
                self.events.push(GameEvent::Paused {
                    by_focus_loss: false,
                });
                true
            }
            GamePhase::Paused {
                by_focus_loss: false,
            } => {
                self.resume();
                true
            }
            GamePhase::Paused {
                by_focus_loss: true,
            } => false,
        }
    }

    /// Window focus or page visibility changed
    pub fn set_focus(&mut self, focused: bool) {
        match (focused, self.phase) {
            (false, GamePhase::Playing) if self.settings.pause_on_blur => {
                self.phase = GamePhase::Paused {
                    by_focus_loss: true,
                };
                log::info!("Game paused (focus lost)");
                self.events.push(GameEvent::Paused {
                    by_focus_loss: true,
                });
            }
            (
                true,
                GamePhase::Paused {
                    by_focus_loss: true,
                },
            ) => self.resume(),
            _ => {}
        }
    }

    fn resume(&mut self) {
        self.phase = GamePhase::Playing;
        // Buttons held across the pause must be released before they count
        self.input.arm_all();
        log::info!("Game resumed");
        self.events.push(GameEvent::Resumed);
    }

    /// Death hook first, then the in-place restore
    pub(crate) fn player_died(&mut self) {
        self.events.push(GameEvent::PlayerDied);
        if let Some(hook) = self.on_death.as_mut() {
            hook();
        }
        self.player.restore();
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::Slide;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_new_state() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.rooms.total(), 7);
        assert_eq!(state.rooms.current_id(), 1);
        assert_eq!(state.player.pos, Vec2::new(100.0, 650.0));
        assert_eq!(state.player.health, 100);
    }

    #[test]
    fn test_same_seed_same_rooms() {
        let a = GameState::new(7);
        let b = GameState::new(7);
        for (ra, rb) in a.rooms.rooms().iter().zip(b.rooms.rooms()) {
            assert_eq!(ra.enemies.len(), rb.enemies.len());
            for (ea, eb) in ra.enemies.iter().zip(&rb.enemies) {
                assert_eq!(ea.pos, eb.pos);
                assert_eq!(ea.speed, eb.speed);
            }
        }
    }

    #[test]
    fn test_manual_pause_toggles() {
        let mut state = GameState::new(1);
        assert!(state.toggle_pause());
        assert_eq!(
            state.phase,
            GamePhase::Paused {
                by_focus_loss: false
            }
        );
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_focus_pause_ignores_manual_toggle() {
        let mut state = GameState::new(1);
        state.set_focus(false);
        assert_eq!(
            state.phase,
            GamePhase::Paused {
                by_focus_loss: true
            }
        );
        assert!(!state.toggle_pause());
        assert!(state.is_paused());

        state.set_focus(true);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_focus_regain_keeps_manual_pause() {
        let mut state = GameState::new(1);
        state.toggle_pause();
        state.set_focus(false);
        state.set_focus(true);
        assert_eq!(
            state.phase,
            GamePhase::Paused {
                by_focus_loss: false
            }
        );
    }

    #[test]
    fn test_focus_loss_without_pause_on_blur() {
        let mut state = GameState::new(1);
        state.settings.pause_on_blur = false;
        state.set_focus(false);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_load_slides_rebuilds_rooms() {
        let mut state = GameState::new(3);
        state.player.health = 40;
        state.player.pos.x = 900.0;

        let deck = SlideDeck::from_slides(vec![
            Slide::placeholder("Intro"),
            Slide::placeholder("Outro"),
        ]);
        state.load_slides(deck);

        assert_eq!(state.rooms.total(), 2);
        assert_eq!(state.rooms.current_id(), 1);
        assert!(!state.rooms.is_transitioning());
        assert_eq!(state.player.health, 40);
        assert_eq!(state.player.pos.x, 100.0);
        assert_eq!(state.rooms.room_label(), "Slide 1/2 - Intro");
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::SlidesLoaded { count: 2 })
        );
    }

    #[test]
    fn test_resize_moves_ground() {
        let mut state = GameState::new(3);
        state.player.is_grounded = true;
        state.player.pos.y = state.bounds().ground_y - state.player.size.y;

        state.set_screen_size(1000.0, 600.0);
        assert_eq!(state.bounds().ground_y, 550.0);
        assert_eq!(state.player.pos.y + state.player.size.y, 550.0);
        for room in state.rooms.rooms() {
            assert_eq!(room.bounds.width, 1000.0);
        }
    }

    #[test]
    fn test_restart_resets_player_and_rooms() {
        let mut state = GameState::new(5);
        state.player.health = 10;
        state.toggle_pause();
        state.restart();
        assert_eq!(state.player.health, 100);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.rooms.current_id(), 1);
    }

    #[test]
    fn test_death_hook_runs() {
        let mut state = GameState::new(5);
        let deaths = Rc::new(Cell::new(0));
        let counter = deaths.clone();
        state.set_on_death(move || counter.set(counter.get() + 1));
        state.player.health = 0;
        state.player_died();
        assert_eq!(deaths.get(), 1);
        assert_eq!(state.player.health, state.player.max_health);
        assert_eq!(state.drain_events(), vec![GameEvent::PlayerDied]);
        assert!(state.drain_events().is_empty());
    }
}
