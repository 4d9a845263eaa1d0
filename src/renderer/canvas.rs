//! Canvas 2D backend
//!
//! Executes a display list on a `CanvasRenderingContext2d`. Slide images are
//! decoded by the host and registered here under their handle.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::{DrawCmd, TextAlign, colors, css_color};
use crate::slides::SlideImage;

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
    let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
    let _ = ctx.arc_to(x, y + h, x, y, r);
    let _ = ctx.arc_to(x, y, x + w, y, r);
    ctx.close_path();
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: HashMap<u32, HtmlImageElement>,
    next_handle: u32,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        // Crisp pixel art for the sprites
        ctx.set_image_smoothing_enabled(false);
        Ok(Self {
            canvas,
            ctx,
            images: HashMap::new(),
            next_handle: 1,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.ctx.set_image_smoothing_enabled(false);
    }

    /// Keep a decoded image alive and return the handle slides refer to it by
    pub fn register_image(&mut self, image: HtmlImageElement) -> SlideImage {
        let handle = self.next_handle;
        self.next_handle += 1;
        let slide = SlideImage {
            handle,
            width: image.natural_width(),
            height: image.natural_height(),
        };
        self.images.insert(handle, image);
        slide
    }

    pub fn clear_images(&mut self) {
        self.images.clear();
    }

    pub fn draw(&self, cmds: &[DrawCmd]) {
        let ctx = &self.ctx;
        let (w, h) = self.size();
        ctx.clear_rect(0.0, 0.0, w as f64, h as f64);

        for cmd in cmds {
            match cmd {
                DrawCmd::FillRect { rect, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
                }
                DrawCmd::RoundRect {
                    rect,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    rounded_rect_path(
                        ctx,
                        rect.x as f64,
                        rect.y as f64,
                        rect.width as f64,
                        rect.height as f64,
                        *radius as f64,
                    );
                    ctx.fill();
                }
                DrawCmd::StrokeRect { rect, color, width } => {
                    ctx.set_stroke_style_str(&css_color(*color));
                    ctx.set_line_width(*width as f64);
                    ctx.stroke_rect(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
                }
                DrawCmd::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.begin_path();
                    let _ = ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    );
                    ctx.fill();
                }
                DrawCmd::Ellipse {
                    center,
                    radii,
                    color,
                } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.begin_path();
                    let _ = ctx.ellipse(
                        center.x as f64,
                        center.y as f64,
                        radii.x as f64,
                        radii.y as f64,
                        0.0,
                        0.0,
                        std::f64::consts::TAU,
                    );
                    ctx.fill();
                }
                DrawCmd::Arc {
                    center,
                    radius,
                    start,
                    end,
                    color,
                    width,
                } => {
                    ctx.set_stroke_style_str(&css_color(*color));
                    ctx.set_line_width(*width as f64);
                    ctx.begin_path();
                    let _ = ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        *start as f64,
                        *end as f64,
                    );
                    ctx.stroke();
                }
                DrawCmd::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    ctx.set_stroke_style_str(&css_color(*color));
                    ctx.set_line_width(*width as f64);
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                }
                DrawCmd::Image { image, rect, title } => match self.images.get(&image.handle) {
                    Some(img) => {
                        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                            img,
                            rect.x as f64,
                            rect.y as f64,
                            rect.width as f64,
                            rect.height as f64,
                        );
                    }
                    None => {
                        // Unregistered handle: show the title like a placeholder slide
                        let center = rect.center();
                        ctx.set_fill_style_str(&css_color(colors::SLIDE_TEXT));
                        ctx.set_font("120px Arial");
                        ctx.set_text_align("center");
                        ctx.set_text_baseline("middle");
                        let _ = ctx.fill_text(title, center.x as f64, center.y as f64);
                    }
                },
                DrawCmd::Text {
                    text,
                    pos,
                    size,
                    color,
                    align,
                } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.set_font(&format!("{}px Arial", size));
                    ctx.set_text_align(match align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                    });
                    ctx.set_text_baseline("middle");
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
            }
        }
    }
}
