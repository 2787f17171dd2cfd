//! Software rasterisation into an RGBA frame.
//!
//! Geometry arrives in the plot's y-up frame (origin bottom-left) and is
//! flipped onto the y-down frame buffer by [`Canvas::to_screen`].

use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::arc::Point;
use crate::config::Color;
use crate::error::{PlotError, Result};

// ============================================================================
// CANVAS
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// `frame` must hold `width * height` RGBA pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(frame.len(), width * height * 4);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn to_screen(&self, p: Point) -> (f64, f64) {
        (p.x, self.height as f64 - p.y)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    /// Alpha-blend `color` over the pixel at `(x, y)`. Out-of-bounds writes are dropped.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r, color.g, color.b];
        for (channel, s) in src.iter().enumerate() {
            let d = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (*s as f32 * a + d * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    /// Spread one sub-pixel sample over its four neighbours.
    fn blend_subpixel(&mut self, x: f64, y: f64, color: Color, alpha: f32) {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let x_frac = x - x_floor;
        let y_frac = y - y_floor;
        let (xi, yi) = (x_floor as i32, y_floor as i32);

        let samples = [
            (xi, yi, (1.0 - x_frac) * (1.0 - y_frac)),
            (xi + 1, yi, x_frac * (1.0 - y_frac)),
            (xi, yi + 1, (1.0 - x_frac) * y_frac),
            (xi + 1, yi + 1, x_frac * y_frac),
        ];
        for (px, py, weight) in samples {
            let a = alpha * weight as f32;
            if a > 0.001 {
                self.blend(px, py, color, a);
            }
        }
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

/// Anti-aliased line between two screen positions.
pub fn draw_line(
    canvas: &mut Canvas,
    from: (f64, f64),
    to: (f64, f64),
    thickness: f32,
    color: Color,
) {
    let (x0, y0) = (from.0 as f32, from.1 as f32);
    let (x1, y1) = (to.0 as f32, to.1 as f32);
    let pad = thickness.ceil() + 1.0;
    let min_x = (x0.min(x1) - pad).floor() as i32;
    let max_x = (x0.max(x1) + pad).ceil() as i32;
    let min_y = (y0.min(y1) - pad).floor() as i32;
    let max_y = (y0.max(y1) + pad).ceil() as i32;
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 - x0;
            let py = y as f32 - y0;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let lx = x0 + t * dx;
            let ly = y0 + t * dy;
            let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa);
            }
        }
    }
}

/// Filled anti-aliased disc.
pub fn draw_dot(canvas: &mut Canvas, center: (f64, f64), radius: i32, color: Color) {
    let (cx, cy) = (center.0.round() as i32, center.1.round() as i32);
    for y in -radius - 1..=radius + 1 {
        for x in -radius - 1..=radius + 1 {
            let dist = ((x * x + y * y) as f64).sqrt();
            let aa = if dist > radius as f64 {
                1.0 - (dist - radius as f64).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                canvas.blend(cx + x, cy + y, color, aa as f32);
            }
        }
    }
}

/// Closed polyline through `points`; fewer than two points draws nothing.
pub fn draw_polygon(canvas: &mut Canvas, points: &[(f64, f64)], thickness: f32, color: Color) {
    if points.len() < 2 {
        return;
    }
    for (i, &from) in points.iter().enumerate() {
        let to = points[(i + 1) % points.len()];
        draw_line(canvas, from, to, thickness, color);
    }
}

// ============================================================================
// TEXT
// ============================================================================

/// Draws strings with a font loaded at runtime.
pub struct TextRenderer {
    font: Font<'static>,
}

impl TextRenderer {
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(bytes).map(|font| Self { font })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes).ok_or_else(|| PlotError::Font {
            path: path.to_path_buf(),
            reason: "not a TrueType or OpenType font".to_string(),
        })
    }

    fn layout(&self, text: &str, size: f32) -> Vec<PositionedGlyph<'static>> {
        self.font
            .layout(text, Scale::uniform(size), point(0.0, 0.0))
            .collect()
    }

    /// Advance width of `text` in pixels.
    pub fn text_width(&self, text: &str, size: f32) -> f64 {
        let glyphs = self.layout(text, size);
        match glyphs.last() {
            Some(last) => {
                (last.position().x + last.unpositioned().h_metrics().advance_width) as f64
            }
            None => 0.0,
        }
    }

    /// Draw `text` with the left end of its baseline at `origin` (screen
    /// coordinates), rotated clockwise on screen by `rotation` radians.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        origin: (f64, f64),
        rotation: f64,
        size: f32,
        color: Color,
    ) {
        let (sin_r, cos_r) = rotation.sin_cos();
        for glyph in self.layout(text, size) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                if v <= 0.001 {
                    return;
                }
                let local_x = gx as f64 + bb.min.x as f64;
                let local_y = gy as f64 + bb.min.y as f64;
                let x = origin.0 + local_x * cos_r - local_y * sin_r;
                let y = origin.1 + local_x * sin_r + local_y * cos_r;
                canvas.blend_subpixel(x, y, color, v);
            });
        }
    }
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `position` is the left end of the baseline.
    Left,
    /// `position` is the middle of the baseline.
    Center,
}

/// Drawing commands in plot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line {
        from: Point,
        to: Point,
        thickness: f32,
        color: Color,
    },
    Polygon {
        points: Vec<Point>,
        thickness: f32,
        color: Color,
    },
    Dot {
        center: Point,
        radius: i32,
        color: Color,
    },
    Text {
        text: String,
        position: Point,
        /// Radians, counter-clockwise in the plot frame.
        rotation: f64,
        font_size: f32,
        align: Align,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Replay the commands in order. Text is skipped when no font is available.
    pub fn render(&self, canvas: &mut Canvas, text: Option<&TextRenderer>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Line {
                    from,
                    to,
                    thickness,
                    color,
                } => {
                    let (from, to) = (canvas.to_screen(*from), canvas.to_screen(*to));
                    draw_line(canvas, from, to, *thickness, *color);
                }
                DrawCommand::Polygon {
                    points,
                    thickness,
                    color,
                } => {
                    let screen: Vec<(f64, f64)> =
                        points.iter().map(|p| canvas.to_screen(*p)).collect();
                    draw_polygon(canvas, &screen, *thickness, *color);
                }
                DrawCommand::Dot {
                    center,
                    radius,
                    color,
                } => {
                    let center = canvas.to_screen(*center);
                    draw_dot(canvas, center, *radius, *color);
                }
                DrawCommand::Text {
                    text: string,
                    position,
                    rotation,
                    font_size,
                    align,
                    color,
                } => {
                    let Some(renderer) = text else {
                        continue;
                    };
                    let (mut x, y) = canvas.to_screen(*position);
                    if *align == Align::Center {
                        x -= renderer.text_width(string, *font_size) / 2.0;
                    }
                    renderer.draw(canvas, string, (x, y), -*rotation, *font_size, *color);
                }
            }
        }
    }
}
