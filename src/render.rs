// ============================================================================
// SOFTWARE RASTERIZER FOR SCENES
// ============================================================================

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::error::WheelError;
use crate::scene::{Color, DrawCommand, Scene};

/// Places a usable font is commonly installed when none is configured.
const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the timer font.
///
/// An explicit path must load. Without one the fallback list is searched and
/// `Ok(None)` means text is simply not drawn.
pub fn load_font(path: Option<&Path>) -> Result<Option<Font<'static>>, WheelError> {
    if let Some(path) = path {
        let data = std::fs::read(path).map_err(|source| WheelError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::try_from_vec(data).ok_or_else(|| WheelError::FontParse(path.to_path_buf()))?;
        info!("loaded font {}", path.display());
        return Ok(Some(font));
    }

    for candidate in FALLBACK_FONTS.iter().map(PathBuf::from) {
        let Ok(data) = std::fs::read(&candidate) else {
            continue;
        };
        if let Some(font) = Font::try_from_vec(data) {
            info!("loaded font {}", candidate.display());
            return Ok(Some(font));
        }
    }

    warn!("no font found; elapsed time will not be drawn (pass --font)");
    Ok(None)
}

// ============================================================================
// TRANSFORMS
// ============================================================================

/// 2D affine matrix, laid out like a canvas `setTransform(a, b, c, d, e, f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Transform {
    const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translate(&mut self, dx: f64, dy: f64) {
        self.e += self.a * dx + self.c * dy;
        self.f += self.b * dx + self.d * dy;
    }

    fn rotate(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);
        self.a = a * cos + c * sin;
        self.b = b * cos + d * sin;
        self.c = c * cos - a * sin;
        self.d = d * cos - b * sin;
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn rotation(&self) -> f64 {
        self.b.atan2(self.a)
    }

    fn scale(&self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn is_axis_aligned(&self) -> bool {
        self.b == 0.0 && self.c == 0.0
    }
}

// ============================================================================
// CANVAS
// ============================================================================

/// RGBA8 frame with a transform stack.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    transform: Transform,
    stack: Vec<Transform>,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            transform: Transform::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGB of a pixel, `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 3)
            .map(|px| (px[0], px[1], px[2]))
    }

    /// Execute every command of `scene` in order. Text is skipped when no font is given.
    pub fn render(&mut self, scene: &Scene, font: Option<&Font>) {
        for command in scene {
            match command {
                DrawCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => self.fill_rect(*x, *y, *width, *height, *color),
                DrawCommand::StrokeArc {
                    cx,
                    cy,
                    radius,
                    start_angle,
                    end_angle,
                    line_width,
                    color,
                } => {
                    let (dcx, dcy) = self.transform.apply(*cx, *cy);
                    let scale = self.transform.scale();
                    let rotation = self.transform.rotation();
                    stroke_arc(
                        self,
                        dcx,
                        dcy,
                        radius * scale,
                        start_angle + rotation,
                        end_angle + rotation,
                        line_width * scale,
                        *color,
                    );
                }
                DrawCommand::FillCircle {
                    cx,
                    cy,
                    radius,
                    color,
                } => {
                    let (dcx, dcy) = self.transform.apply(*cx, *cy);
                    let scale = self.transform.scale();
                    fill_circle(self, dcx, dcy, radius * scale, *color);
                }
                DrawCommand::StrokeLine {
                    x0,
                    y0,
                    x1,
                    y1,
                    line_width,
                    color,
                } => {
                    let (dx0, dy0) = self.transform.apply(*x0, *y0);
                    let (dx1, dy1) = self.transform.apply(*x1, *y1);
                    let scale = self.transform.scale();
                    draw_thick_line_aa(self, dx0, dy0, dx1, dy1, line_width * scale, *color);
                }
                DrawCommand::FillPolygon { points, color } => {
                    let device: Vec<(f64, f64)> = points
                        .iter()
                        .map(|&(x, y)| self.transform.apply(x, y))
                        .collect();
                    fill_polygon(self, &device, *color);
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    if let Some(font) = font {
                        let (dx, dy) = self.transform.apply(*x, *y);
                        draw_text(self, dx, dy, text, font, Scale::uniform(*font_size), *color);
                    }
                }
                DrawCommand::Save => self.stack.push(self.transform),
                DrawCommand::Restore => {
                    // Unbalanced restore is ignored, as on a canvas
                    if let Some(saved) = self.stack.pop() {
                        self.transform = saved;
                    }
                }
                DrawCommand::Translate { dx, dy } => self.transform.translate(*dx, *dy),
                DrawCommand::Rotate(angle) => self.transform.rotate(*angle),
            }
        }
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        if !self.transform.is_axis_aligned() {
            let corners = [(x, y), (x + width, y), (x + width, y + height), (x, y + height)];
            let device: Vec<(f64, f64)> = corners
                .iter()
                .map(|&(px, py)| self.transform.apply(px, py))
                .collect();
            fill_polygon(self, &device, color);
            return;
        }

        let (x0, y0) = self.transform.apply(x, y);
        let (x1, y1) = self.transform.apply(x + width, y + height);
        let (min_x, max_x) = (x0.min(x1).max(0.0), x0.max(x1).min(self.width as f64));
        let (min_y, max_y) = (y0.min(y1).max(0.0), y0.max(y1).min(self.height as f64));

        if min_x <= 0.0 && min_y <= 0.0 && max_x >= self.width as f64 && max_y >= self.height as f64 {
            self.clear(color);
            return;
        }
        for py in min_y.round() as usize..max_y.round() as usize {
            for px in min_x.round() as usize..max_x.round() as usize {
                set_pixel(self, px, py, color, 1.0);
            }
        }
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn set_pixel(canvas: &mut Canvas, x: usize, y: usize, color: Color, alpha: f32) {
    if canvas.width > 0 && x < canvas.width && y < canvas.frame.len() / (canvas.width * 4) {
        let idx = (y * canvas.width + x) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let dst = &mut canvas.frame[idx..idx + 4];
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        let out = [
            blend(color.r, dst[0]),
            blend(color.g, dst[1]),
            blend(color.b, dst[2]),
            0xff,
        ];
        dst.copy_from_slice(&out);
    }
}

/// Integer pixel range covering `[lo, hi]`, clipped to `[0, limit)`.
fn pixel_span(lo: f64, hi: f64, limit: usize) -> std::ops::Range<usize> {
    let start = lo.floor().max(0.0) as usize;
    let end = (hi.ceil() + 1.0).clamp(0.0, limit as f64) as usize;
    start..end.max(start)
}

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    thickness: f64,
    color: Color,
) {
    let pad = thickness.ceil() + 1.0;
    let xs = pixel_span(x0.min(x1) - pad, x0.max(x1) + pad, canvas.width);
    let ys = pixel_span(y0.min(y1) - pad, y0.max(y1) + pad, canvas.height);
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    for y in ys {
        for x in xs.clone() {
            let px = x as f64 - x0;
            let py = y as f64 - y0;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let lx = x0 + t * dx;
            let ly = y0 + t * dy;
            let dist = ((lx - x as f64).powi(2) + (ly - y as f64).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                set_pixel(canvas, x, y, color, aa as f32);
            }
        }
    }
}

fn fill_circle(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: Color) {
    let xs = pixel_span(cx - radius - 1.0, cx + radius + 1.0, canvas.width);
    let ys = pixel_span(cy - radius - 1.0, cy + radius + 1.0, canvas.height);
    for y in ys {
        for x in xs.clone() {
            let dist = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
            let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
            if aa > 0.0 {
                set_pixel(canvas, x, y, color, aa as f32);
            }
        }
    }
}

/// Ring segment swept from `start_angle` towards increasing angles.
/// A sweep of a full turn or more is a closed ring; an empty or negative one draws nothing.
fn stroke_arc(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    r: f64,
    start_angle: f64,
    end_angle: f64,
    line_width: f64,
    color: Color,
) {
    let span = end_angle - start_angle;
    if !(span > 0.0) || r <= 0.0 {
        return;
    }
    let full_turn = 2.0 * PI;
    let closed = span >= full_turn;
    let start = start_angle.rem_euclid(full_turn);

    let outer = r + line_width / 2.0 + 1.0;
    let xs = pixel_span(cx - outer, cx + outer, canvas.width);
    let ys = pixel_span(cy - outer, cy + outer, canvas.height);
    for y in ys {
        for x in xs.clone() {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let aa = (line_width / 2.0 + 0.5 - (dist - r).abs()).clamp(0.0, 1.0);
            if aa <= 0.0 {
                continue;
            }
            let in_arc = closed || {
                let angle = dy.atan2(dx).rem_euclid(full_turn);
                (angle - start).rem_euclid(full_turn) <= span
            };
            if in_arc {
                set_pixel(canvas, x, y, color, aa as f32);
            }
        }
    }
}

/// Even-odd fill sampled at pixel centers.
fn fill_polygon(canvas: &mut Canvas, points: &[(f64, f64)], color: Color) {
    if points.len() < 3 {
        return;
    }
    let (min_x, max_x, min_y, max_y) = points.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), &(x, y)| (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y)),
    );
    let xs = pixel_span(min_x, max_x, canvas.width);
    let ys = pixel_span(min_y, max_y, canvas.height);
    for y in ys {
        for x in xs.clone() {
            if point_in_polygon(x as f64 + 0.5, y as f64 + 0.5, points) {
                set_pixel(canvas, x, y, color, 1.0);
            }
        }
    }
}

fn point_in_polygon(x: f64, y: f64, points: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Text centered on (x, y)
fn draw_text(canvas: &mut Canvas, x: f64, y: f64, text: &str, font: &Font, scale: Scale, color: Color) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x.round() as i32 - width_px / 2;
    let offset_y = y.round() as i32 - height_px / 2;
    let (width, height) = (canvas.width as i32, canvas.height as i32);
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                if px >= 0 && px < width && py >= 0 && py < height {
                    set_pixel(canvas, px as usize, py as usize, color, v);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{tick, FrameStyle, Surface};
    use crate::state::WheelState;

    const SIZE: usize = 600;

    fn render_state(state: &mut WheelState) -> Vec<u8> {
        let mut frame = vec![0u8; SIZE * SIZE * 4];
        let scene = tick(state, 0.0, Surface::new(SIZE, SIZE), &FrameStyle::default());
        Canvas::new(&mut frame, SIZE, SIZE).render(&scene, None);
        frame
    }

    fn pixel(frame: &mut [u8], x: usize, y: usize) -> Option<(u8, u8, u8)> {
        Canvas::new(frame, SIZE, SIZE).pixel(x, y)
    }

    #[test]
    fn background_is_cleared_to_white() {
        let mut frame = render_state(&mut WheelState::default());
        assert_eq!(pixel(&mut frame, 5, 5), Some((0xff, 0xff, 0xff)));
        assert_eq!(pixel(&mut frame, SIZE, 0), None);
    }

    #[test]
    fn hub_dot_is_black() {
        let mut frame = render_state(&mut WheelState::default());
        assert_eq!(pixel(&mut frame, 300, 300), Some((0, 0, 0)));
        assert_eq!(pixel(&mut frame, 303, 300), Some((0, 0, 0)));
        assert_eq!(pixel(&mut frame, 310, 300), Some((0xff, 0xff, 0xff)));
    }

    #[test]
    fn full_arc_is_a_closed_ring() {
        let mut frame = render_state(&mut WheelState::default());
        for (x, y) in [(300, 420), (420, 300), (180, 300)] {
            assert_eq!(pixel(&mut frame, x, y), Some((0, 0, 0)), "ring at ({x}, {y})");
        }
    }

    #[test]
    fn quarter_arc_covers_bottom_left_only() {
        let mut state = WheelState {
            arc_span: 90.0,
            ..WheelState::default()
        };
        let mut frame = render_state(&mut state);
        // From south (π/2) sweeping to west (π)
        assert_eq!(pixel(&mut frame, 300, 420), Some((0, 0, 0)));
        assert_eq!(pixel(&mut frame, 180, 300), Some((0, 0, 0)));
        assert_eq!(pixel(&mut frame, 420, 300), Some((0xff, 0xff, 0xff)));
        assert_eq!(pixel(&mut frame, 300, 180), Some((0xff, 0xff, 0xff)));
    }

    #[test]
    fn zero_arc_draws_no_ring() {
        let mut state = WheelState {
            arc_span: 0.0,
            ..WheelState::default()
        };
        let mut frame = render_state(&mut state);
        assert_eq!(pixel(&mut frame, 420, 300), Some((0xff, 0xff, 0xff)));
        assert_eq!(pixel(&mut frame, 300, 180), Some((0xff, 0xff, 0xff)));
    }

    #[test]
    fn flag_is_drawn_above_center_for_full_arc() {
        let mut frame = render_state(&mut WheelState::default());
        // Indicator points north; pole spans y 150..180, clockwise flag leans right
        assert_eq!(pixel(&mut frame, 300, 165), Some((0xff, 0, 0)));
        assert_eq!(pixel(&mut frame, 305, 150), Some((0xff, 0, 0)));
        assert_eq!(pixel(&mut frame, 295, 150), Some((0xff, 0xff, 0xff)));
    }

    #[test]
    fn counterclockwise_flag_leans_the_other_way() {
        let mut state = WheelState {
            direction: crate::state::Direction::CounterClockwise,
            ..WheelState::default()
        };
        let mut frame = render_state(&mut state);
        assert_eq!(pixel(&mut frame, 295, 150), Some((0xff, 0, 0)));
        assert_eq!(pixel(&mut frame, 305, 150), Some((0xff, 0xff, 0xff)));
    }

    #[test]
    fn transform_stack_restores() {
        let mut t = Transform::IDENTITY;
        t.translate(10.0, 20.0);
        t.rotate(PI / 2.0);
        let (x, y) = t.apply(5.0, 0.0);
        assert!((x - 10.0).abs() < 1e-9 && (y - 25.0).abs() < 1e-9);
        assert!((t.rotation() - PI / 2.0).abs() < 1e-12);

        let mut frame = vec![0u8; 20 * 20 * 4];
        let mut canvas = Canvas::new(&mut frame, 20, 20);
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Save);
        scene.add_command(DrawCommand::Translate { dx: 10.0, dy: 10.0 });
        scene.add_command(DrawCommand::Restore);
        scene.add_command(DrawCommand::Restore);
        scene.add_command(DrawCommand::FillRect {
            x: 0.0,
            y: 0.0,
            width: 5.0,
            height: 5.0,
            color: Color::RED,
        });
        canvas.render(&scene, None);
        assert_eq!(canvas.pixel(0, 0), Some((0xff, 0, 0)));
        assert_eq!(canvas.pixel(4, 4), Some((0xff, 0, 0)));
        assert_eq!(canvas.pixel(6, 6), Some((0, 0, 0)));
    }

    #[test]
    fn explicit_missing_font_is_an_error() {
        let result = load_font(Some(Path::new("/nonexistent/wheel-font.ttf")));
        assert!(matches!(result, Err(WheelError::FontRead { .. })));
    }
}
