//! Press-edge detection for one-shot actions
//!
//! The host only reports which buttons are held. Jump, attack, pause and the
//! debug toggle fire on the transition from released to held, derived here by
//! comparing against the previous frame.

use super::tick::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LatchState {
    #[default]
    Idle,
    Held,
}

/// Two-state debounce for a single button
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonLatch {
    state: LatchState,
}

impl ButtonLatch {
    /// Feed the current held state, returns true on the press edge only
    pub fn update(&mut self, held: bool) -> bool {
        match (self.state, held) {
            (LatchState::Idle, true) => {
                self.state = LatchState::Held;
                true
            }
            (LatchState::Held, false) => {
                self.state = LatchState::Idle;
                false
            }
            _ => false,
        }
    }

    /// Require a release before the next press counts
    pub fn arm(&mut self) {
        self.state = LatchState::Held;
    }

    pub fn is_held(&self) -> bool {
        self.state == LatchState::Held
    }
}

/// Press edges produced for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub jump: bool,
    pub attack: bool,
    pub pause: bool,
    pub debug: bool,
}

/// Latches for every edge-triggered action
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    jump: ButtonLatch,
    attack: ButtonLatch,
    pause: ButtonLatch,
    debug: ButtonLatch,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, input: &TickInput) -> Edges {
        Edges {
            jump: self.jump.update(input.jump),
            attack: self.attack.update(input.attack),
            pause: self.pause.update(input.pause),
            debug: self.debug.update(input.debug),
        }
    }

    /// Swallow whatever is held right now so nothing captured before a pause
    /// fires after it.
    pub fn arm_all(&mut self) {
        self.jump.arm();
        self.attack.arm();
        self.pause.arm();
        self.debug.arm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_fires_once_per_press() {
        let mut latch = ButtonLatch::default();
        assert!(latch.update(true));
        assert!(!latch.update(true));
        assert!(!latch.update(true));
        assert!(!latch.update(false));
        assert!(latch.update(true));
    }

    #[test]
    fn test_armed_latch_needs_release() {
        let mut latch = ButtonLatch::default();
        latch.arm();
        assert!(!latch.update(true));
        assert!(!latch.update(false));
        assert!(latch.update(true));
    }

    #[test]
    fn test_tracker_edges() {
        let mut tracker = InputTracker::new();
        let held = TickInput {
            jump: true,
            attack: true,
            ..Default::default()
        };
        let edges = tracker.update(&held);
        assert!(edges.jump && edges.attack);
        assert!(!edges.pause);

        let edges = tracker.update(&held);
        assert_eq!(edges, Edges::default());
    }
}
