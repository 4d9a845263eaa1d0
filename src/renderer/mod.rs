//! Rendering module
//!
//! `scene` turns a simulation snapshot into a display list; `canvas` draws it
//! with the browser's 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{Color, DrawCmd, TextAlign, build_scene, colors, css_color};
