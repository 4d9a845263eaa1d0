//! Scene building: snapshot in, display list out
//!
//! Pure and browser-free so the whole frame layout can be unit tested. The
//! canvas backend only has to execute the commands in order.

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::geometry::Rect;
use crate::sim::snapshot::{EnemyView, PlayerView, RoomView, Snapshot};
use crate::sim::weapon::PosePart;
use crate::slides::SlideImage;

/// RGBA, components in 0..=1
pub type Color = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Color;

    /// Room backgrounds, picked by room id
    pub const ROOM_PALETTE: [Color; 7] = [
        [0.165, 0.290, 0.420, 1.0], // blue
        [0.420, 0.165, 0.290, 1.0], // red
        [0.290, 0.420, 0.165, 1.0], // green
        [0.420, 0.290, 0.165, 1.0], // brown
        [0.290, 0.165, 0.420, 1.0], // purple
        [0.420, 0.420, 0.165, 1.0], // olive
        [0.165, 0.420, 0.420, 1.0], // teal
    ];
    /// Enemy bodies, variations on the base red
    pub const ENEMY_PALETTE: [Color; 5] = [
        [1.0, 0.267, 0.267, 1.0],   // #ff4444
        [1.0, 0.4, 0.267, 1.0],     // #ff6644
        [1.0, 0.267, 0.4, 1.0],     // #ff4466
        [0.8, 0.267, 0.267, 1.0],   // #cc4444
        [1.0, 0.467, 0.267, 1.0],   // #ff7744
    ];

    pub const SLIDE_TEXT: Color = [1.0, 1.0, 1.0, 0.1];
    pub const SLIDE_FRAME: Color = [1.0, 1.0, 1.0, 0.05];
    pub const SLIDE_CAPTION: Color = [1.0, 1.0, 1.0, 0.3];
    pub const GROUND: Color = [0.4, 0.4, 0.4, 1.0];
    pub const GROUND_EDGE: Color = [0.533, 0.533, 0.533, 1.0];

    pub const PLAYER_BODY: Color = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER_EYE: Color = [0.180, 0.490, 0.196, 1.0];
    pub const LOGO: [Color; 4] = [
        [0.953, 0.325, 0.145, 1.0],
        [0.506, 0.737, 0.024, 1.0],
        [0.020, 0.651, 0.941, 1.0],
        [1.0, 0.729, 0.031, 1.0],
    ];
    pub const SHADOW: Color = [0.0, 0.0, 0.0, 0.3];
    pub const GROUNDED_MARK: Color = [0.0, 1.0, 0.0, 1.0];

    pub const SKIN: Color = [0.992, 0.737, 0.706, 1.0];
    pub const FIST: Color = [0.957, 0.659, 0.541, 1.0];
    pub const KNUCKLE: Color = [0.902, 0.576, 0.451, 1.0];
    pub const IMPACT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const SPARKLE: Color = [1.0, 1.0, 0.0, 1.0];

    pub const ENEMY_EYE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const ENEMY_MOUTH: Color = [0.0, 0.0, 0.0, 1.0];

    pub const DEBUG_ENEMY: Color = [1.0, 0.0, 0.0, 0.7];
    pub const DEBUG_PLAYER: Color = [0.0, 1.0, 0.0, 0.7];
    pub const DEBUG_ATTACK: Color = [1.0, 1.0, 0.0, 0.3];

    pub const HEALTH_BACK: Color = [0.3, 0.0, 0.0, 0.8];
    pub const HEALTH_FILL: Color = [0.2, 0.8, 0.2, 1.0];
    pub const HEALTH_LOW: Color = [0.9, 0.2, 0.1, 1.0];
    pub const HUD_TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const PAUSE_SCRIM: Color = [0.0, 0.0, 0.0, 0.8];
}

/// CSS `rgba()` string for a color
pub fn css_color(c: Color) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (c[0] * 255.0).round() as u8,
        (c[1] * 255.0).round() as u8,
        (c[2] * 255.0).round() as u8,
        c[3]
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One drawing operation in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect { rect: Rect, color: Color },
    RoundRect { rect: Rect, radius: f32, color: Color },
    StrokeRect { rect: Rect, color: Color, width: f32 },
    Circle { center: Vec2, radius: f32, color: Color },
    Ellipse { center: Vec2, radii: Vec2, color: Color },
    /// Stroked arc, angles in radians
    Arc { center: Vec2, radius: f32, start: f32, end: f32, color: Color, width: f32 },
    Line { from: Vec2, to: Vec2, color: Color, width: f32 },
    /// `title` is drawn instead when the image handle is unknown
    Image { image: SlideImage, rect: Rect, title: String },
    Text { text: String, pos: Vec2, size: f32, color: Color, align: TextAlign },
}

const ENEMY_CORNER: f32 = 4.0;

/// Largest rect with the image's aspect ratio that fits the screen, centered
fn contain(image: &SlideImage, width: f32, height: f32) -> Rect {
    if image.width == 0 || image.height == 0 {
        return Rect::new(0.0, 0.0, width, height);
    }
    let scale = (width / image.width as f32).min(height / image.height as f32);
    let w = image.width as f32 * scale;
    let h = image.height as f32 * scale;
    Rect::new((width - w) / 2.0, (height - h) / 2.0, w, h)
}

fn shifted(rect: Rect, dx: f32) -> Rect {
    Rect::new(rect.x + dx, rect.y, rect.width, rect.height)
}

fn push_room(cmds: &mut Vec<DrawCmd>, room: &RoomView, snap: &Snapshot) {
    let b = snap.bounds;
    let dx = room.offset_x;
    let palette = &colors::ROOM_PALETTE;
    let color = palette[(room.id as usize).saturating_sub(1) % palette.len()];

    cmds.push(DrawCmd::FillRect {
        rect: Rect::new(dx, 0.0, b.width, b.height),
        color,
    });

    match &room.slide.image {
        Some(image) => cmds.push(DrawCmd::Image {
            image: *image,
            rect: shifted(contain(image, b.width, b.height), dx),
            title: room.slide.title.clone(),
        }),
        None => {
            cmds.push(DrawCmd::Text {
                text: room.slide.title.clone(),
                pos: Vec2::new(dx + b.width / 2.0, b.height / 2.0),
                size: 120.0,
                color: colors::SLIDE_TEXT,
                align: TextAlign::Center,
            });
            cmds.push(DrawCmd::StrokeRect {
                rect: Rect::new(dx + 50.0, 50.0, b.width - 100.0, b.height - 100.0),
                color: colors::SLIDE_FRAME,
                width: 4.0,
            });
            cmds.push(DrawCmd::Text {
                text: format!("Room {} - {}", room.id, room.slide.title),
                pos: Vec2::new(dx + 70.0, 100.0),
                size: 24.0,
                color: colors::SLIDE_CAPTION,
                align: TextAlign::Left,
            });
        }
    }

    cmds.push(DrawCmd::FillRect {
        rect: Rect::new(dx, b.ground_y, b.width, b.height - b.ground_y),
        color: colors::GROUND,
    });
    cmds.push(DrawCmd::Line {
        from: Vec2::new(dx, b.ground_y),
        to: Vec2::new(dx + b.width, b.ground_y),
        color: colors::GROUND_EDGE,
        width: 2.0,
    });

    for enemy in &room.enemies {
        push_enemy(cmds, enemy, dx, snap.debug);
    }
}

fn push_enemy(cmds: &mut Vec<DrawCmd>, enemy: &EnemyView, dx: f32, debug: bool) {
    let r = enemy.rect;
    let x = r.x + dx;
    let y = r.y + enemy.bob;
    let palette = &colors::ENEMY_PALETTE;

    cmds.push(DrawCmd::RoundRect {
        rect: Rect::new(x, y, r.width, r.height),
        radius: ENEMY_CORNER,
        color: palette[enemy.palette % palette.len()],
    });
    for eye_x in [x + 6.0, x + r.width - 6.0] {
        cmds.push(DrawCmd::Circle {
            center: Vec2::new(eye_x, y + 6.0),
            radius: 3.0,
            color: colors::ENEMY_EYE,
        });
    }
    cmds.push(DrawCmd::Arc {
        center: Vec2::new(x + r.width / 2.0, y + 16.0),
        radius: 4.0,
        start: 0.0,
        end: std::f32::consts::PI,
        color: colors::ENEMY_MOUTH,
        width: 1.0,
    });

    if debug {
        cmds.push(DrawCmd::StrokeRect {
            rect: shifted(r, dx),
            color: colors::DEBUG_ENEMY,
            width: 2.0,
        });
    }
}

fn push_pose(cmds: &mut Vec<DrawCmd>, parts: &[PosePart]) {
    for part in parts {
        match *part {
            PosePart::Hand { center, radius } => cmds.push(DrawCmd::Circle {
                center,
                radius,
                color: colors::SKIN,
            }),
            PosePart::Arm(rect) => cmds.push(DrawCmd::FillRect {
                rect,
                color: colors::SKIN,
            }),
            PosePart::Fist(rect) => cmds.push(DrawCmd::FillRect {
                rect,
                color: colors::FIST,
            }),
            PosePart::Knuckle(rect) => cmds.push(DrawCmd::FillRect {
                rect,
                color: colors::KNUCKLE,
            }),
            PosePart::Impact { center } => {
                for offset in [Vec2::new(-4.0, -3.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, -5.0)] {
                    let p = center + offset;
                    cmds.push(DrawCmd::FillRect {
                        rect: Rect::new(p.x, p.y, 2.0, 2.0),
                        color: colors::SPARKLE,
                    });
                }
                let spokes = [
                    (Vec2::new(-6.0, -6.0), Vec2::new(6.0, 6.0)),
                    (Vec2::new(-6.0, 6.0), Vec2::new(6.0, -6.0)),
                    (Vec2::new(-8.0, 0.0), Vec2::new(8.0, 0.0)),
                    (Vec2::new(0.0, -8.0), Vec2::new(0.0, 8.0)),
                ];
                for (a, b) in spokes {
                    cmds.push(DrawCmd::Line {
                        from: center + a,
                        to: center + b,
                        color: colors::IMPACT,
                        width: 2.0,
                    });
                }
            }
        }
    }
}

fn push_player(cmds: &mut Vec<DrawCmd>, player: &PlayerView) {
    let r = player.rect;

    if player.is_grounded {
        cmds.push(DrawCmd::Ellipse {
            center: Vec2::new(r.x + r.width / 2.0, r.bottom() + 2.0),
            radii: Vec2::new(r.width / 2.0 - 2.0, 8.0),
            color: colors::SHADOW,
        });
    }

    if player.visible {
        cmds.push(DrawCmd::FillRect {
            rect: r,
            color: colors::PLAYER_BODY,
        });

        // Four-square logo on the chest
        let size = 6.0;
        let gap = 1.0;
        let start = Vec2::new(
            r.x + (r.width - (size * 2.0 + gap)) / 2.0,
            r.y + (r.height - (size * 2.0 + gap)) / 2.0 + 8.0,
        );
        for (i, color) in colors::LOGO.iter().enumerate() {
            let col = (i % 2) as f32;
            let row = (i / 2) as f32;
            cmds.push(DrawCmd::FillRect {
                rect: Rect::new(
                    start.x + col * (size + gap),
                    start.y + row * (size + gap),
                    size,
                    size,
                ),
                color: *color,
            });
        }

        let eye_x = if player.facing > 0.0 {
            r.right() - 8.0
        } else {
            r.x + 4.0
        };
        for eye_y in [r.y + 8.0, r.y + 16.0] {
            cmds.push(DrawCmd::FillRect {
                rect: Rect::new(eye_x, eye_y, 4.0, 4.0),
                color: colors::PLAYER_EYE,
            });
        }
    }

    push_pose(cmds, &player.pose);

    if player.is_moving {
        cmds.push(DrawCmd::StrokeRect {
            rect: Rect::new(r.x - 1.0, r.y - 1.0, r.width + 2.0, r.height + 2.0),
            color: colors::PLAYER_BODY,
            width: 2.0,
        });
    }
    if player.is_grounded {
        cmds.push(DrawCmd::FillRect {
            rect: Rect::new(r.x + r.width / 2.0 - 2.0, r.y - 8.0, 4.0, 4.0),
            color: colors::GROUNDED_MARK,
        });
    }
}

fn push_hud(cmds: &mut Vec<DrawCmd>, snap: &Snapshot, settings: &Settings) {
    let b = snap.bounds;

    if settings.show_health_bar {
        let bar = Rect::new(20.0, 20.0, 200.0, 20.0);
        let fraction = if snap.player.max_health > 0 {
            (snap.player.health as f32 / snap.player.max_health as f32).clamp(0.0, 1.0)
        } else {
            0.0
        };
        cmds.push(DrawCmd::FillRect {
            rect: bar,
            color: colors::HEALTH_BACK,
        });
        cmds.push(DrawCmd::FillRect {
            rect: Rect::new(bar.x, bar.y, bar.width * fraction, bar.height),
            color: if fraction <= 0.25 {
                colors::HEALTH_LOW
            } else {
                colors::HEALTH_FILL
            },
        });
        cmds.push(DrawCmd::StrokeRect {
            rect: bar,
            color: colors::HUD_TEXT,
            width: 2.0,
        });
        cmds.push(DrawCmd::Text {
            text: format!("HP {}/{}", snap.player.health, snap.player.max_health),
            pos: Vec2::new(bar.x + 8.0, bar.bottom() + 20.0),
            size: 16.0,
            color: colors::HUD_TEXT,
            align: TextAlign::Left,
        });
    }

    if settings.show_room_label && !snap.room_label.is_empty() {
        cmds.push(DrawCmd::Text {
            text: snap.room_label.clone(),
            pos: Vec2::new(b.width / 2.0, 36.0),
            size: 20.0,
            color: colors::HUD_TEXT,
            align: TextAlign::Center,
        });
    }

    let help_alpha = settings.controls_help_alpha(snap.time);
    if help_alpha > 0.0 {
        let mut color = colors::HUD_TEXT;
        color[3] = help_alpha;
        cmds.push(DrawCmd::Text {
            text: "A/D - Move, W - Jump, Space - Attack, Esc - Pause".to_string(),
            pos: Vec2::new(b.width / 2.0, b.height - 16.0),
            size: 18.0,
            color,
            align: TextAlign::Center,
        });
    }

    if snap.show_pause_menu {
        cmds.push(DrawCmd::FillRect {
            rect: Rect::new(0.0, 0.0, b.width, b.height),
            color: colors::PAUSE_SCRIM,
        });
        cmds.push(DrawCmd::Text {
            text: "PAUSED".to_string(),
            pos: Vec2::new(b.width / 2.0, b.height / 2.0),
            size: 48.0,
            color: colors::HUD_TEXT,
            align: TextAlign::Center,
        });
        cmds.push(DrawCmd::Text {
            text: "Press ESC to resume".to_string(),
            pos: Vec2::new(b.width / 2.0, b.height / 2.0 + 60.0),
            size: 24.0,
            color: colors::HUD_TEXT,
            align: TextAlign::Center,
        });
    }
}

/// Build the display list for one frame
pub fn build_scene(snap: &Snapshot, settings: &Settings) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(64);

    for room in &snap.rooms {
        push_room(&mut cmds, room, snap);
    }

    push_player(&mut cmds, &snap.player);

    if snap.debug {
        cmds.push(DrawCmd::StrokeRect {
            rect: snap.player.rect,
            color: colors::DEBUG_PLAYER,
            width: 2.0,
        });
        if let Some(hitbox) = snap.attack_hitbox {
            cmds.push(DrawCmd::FillRect {
                rect: hitbox,
                color: colors::DEBUG_ATTACK,
            });
        }
    }

    push_hud(&mut cmds, snap, settings);
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::room::Direction;
    use crate::sim::state::GameState;
    use crate::slides::{Slide, SlideDeck};

    fn texts(cmds: &[DrawCmd]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color([1.0, 0.0, 0.5, 0.3]), "rgba(255, 0, 128, 0.3)");
    }

    #[test]
    fn test_room_background_uses_palette() {
        let state = GameState::new(4);
        let cmds = build_scene(&state.snapshot(), &state.settings);
        assert_eq!(
            cmds[0],
            DrawCmd::FillRect {
                rect: Rect::new(0.0, 0.0, 1200.0, 800.0),
                color: colors::ROOM_PALETTE[0],
            }
        );
    }

    #[test]
    fn test_placeholder_slide_draws_title() {
        let state = GameState::new(4);
        let cmds = build_scene(&state.snapshot(), &state.settings);
        let labels = texts(&cmds);
        assert!(labels.contains(&"Welcome Slide"));
        assert!(labels.contains(&"Slide 1/7 - Welcome Slide"));
    }

    #[test]
    fn test_image_slide_is_letterboxed() {
        let mut state = GameState::new(4);
        let image = SlideImage {
            handle: 9,
            width: 1600,
            height: 900,
        };
        state.load_slides(SlideDeck::from_slides(vec![Slide::with_image("Deck", image)]));
        let cmds = build_scene(&state.snapshot(), &state.settings);
        let rect = cmds
            .iter()
            .find_map(|c| match c {
                DrawCmd::Image { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert_eq!(rect.width, 1200.0);
        assert_eq!(rect.height, 675.0);
        assert!((rect.y - 62.5).abs() < 1e-3);
    }

    #[test]
    fn test_image_slide_carries_title_fallback() {
        let mut state = GameState::new(4);
        let image = SlideImage {
            handle: 3,
            width: 800,
            height: 600,
        };
        state.load_slides(SlideDeck::from_slides(vec![Slide::with_image("Page 1", image)]));
        let cmds = build_scene(&state.snapshot(), &state.settings);
        assert!(cmds.iter().any(
            |c| matches!(c, DrawCmd::Image { title, .. } if title == "Page 1")
        ));
    }

    #[test]
    fn test_enemy_palette_stays_red() {
        for [r, g, b, _] in colors::ENEMY_PALETTE {
            assert!(r > g && r > b);
        }
    }

    #[test]
    fn test_debug_overlay_toggles_hitboxes() {
        let mut state = GameState::new(4);
        let count = |cmds: &[DrawCmd]| {
            cmds.iter()
                .filter(|c| matches!(c, DrawCmd::StrokeRect { color, .. } if *color == colors::DEBUG_ENEMY))
                .count()
        };
        let plain = build_scene(&state.snapshot(), &state.settings);
        assert_eq!(count(&plain), 0);

        state.settings.debug_mode = true;
        let living = state.current_room().map_or(0, |r| r.living_count());
        let debug = build_scene(&state.snapshot(), &state.settings);
        assert_eq!(count(&debug), living);
    }

    #[test]
    fn test_pause_menu_drawn_last() {
        let mut state = GameState::new(4);
        state.toggle_pause();
        let cmds = build_scene(&state.snapshot(), &state.settings);
        assert_eq!(texts(&cmds).last(), Some(&"Press ESC to resume"));
    }

    #[test]
    fn test_transition_draws_both_rooms() {
        let mut state = GameState::new(4);
        let GameState { rooms, player, .. } = &mut state;
        rooms.start_transition(Direction::Right, player);
        rooms.update(0.1);

        let cmds = build_scene(&state.snapshot(), &state.settings);
        let backgrounds = cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::FillRect { rect, .. } if rect.height == 800.0 && rect.width == 1200.0))
            .count();
        assert_eq!(backgrounds, 2);
    }

    #[test]
    fn test_hud_can_be_hidden() {
        let state = GameState::new(4);
        let settings = Settings {
            show_health_bar: false,
            show_room_label: false,
            show_controls_help: false,
            ..Settings::default()
        };
        let cmds = build_scene(&state.snapshot(), &settings);
        let labels = texts(&cmds);
        assert!(!labels.iter().any(|t| t.starts_with("HP ")));
        assert!(!labels.iter().any(|t| t.starts_with("Slide ")));
    }
}
