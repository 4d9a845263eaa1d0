//! Presentation preferences
//!
//! These never affect the simulation; they only change what the host draws
//! and how it reacts to focus changes.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Draw hitbox outlines and the attack area
    pub debug_mode: bool,
    /// Silently pause when the tab is hidden or the window loses focus
    pub pause_on_blur: bool,

    // === HUD ===
    /// Show the controls hint after the game starts
    pub show_controls_help: bool,
    /// Seconds before the controls hint fades out
    pub controls_help_secs: f32,
    /// Show the "Slide n/m - title" label
    pub show_room_label: bool,
    /// Draw the health bar
    pub show_health_bar: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_mode: false,
            pause_on_blur: true,

            // HUD
            show_controls_help: true,
            controls_help_secs: 3.0,
            show_room_label: true,
            show_health_bar: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Flip the hitbox overlay, returning the new state
    pub fn toggle_debug(&mut self) -> bool {
        self.debug_mode = !self.debug_mode;
        log::info!(
            "Debug overlay {}",
            if self.debug_mode { "enabled" } else { "disabled" }
        );
        self.debug_mode
    }

    /// Opacity of the controls hint `elapsed` seconds after start (fades over 1s)
    pub fn controls_help_alpha(&self, elapsed: f32) -> f32 {
        if !self.show_controls_help {
            return 0.0;
        }
        if elapsed <= self.controls_help_secs {
            1.0
        } else {
            (1.0 - (elapsed - self.controls_help_secs)).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_from_empty_json() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_toggle_debug() {
        let mut settings = Settings::default();
        assert!(settings.toggle_debug());
        assert!(!settings.toggle_debug());
    }

    #[test]
    fn test_controls_help_fades() {
        let settings = Settings::default();
        assert_eq!(settings.controls_help_alpha(1.0), 1.0);
        assert!((settings.controls_help_alpha(3.5) - 0.5).abs() < 1e-5);
        assert_eq!(settings.controls_help_alpha(10.0), 0.0);
    }
}
