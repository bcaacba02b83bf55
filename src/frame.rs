use std::f64::consts::{FRAC_PI_2, PI};

use crate::scene::{Color, DrawCommand, Scene};
use crate::state::{Direction, WheelState};

/// Radius of the hub dot drawn at the wheel center.
pub const CENTER_DOT_RADIUS: f64 = 5.0;
/// Half the width of the flag base along the pole.
pub const FLAG_HALF_BASE: f64 = 10.0;
/// Perpendicular distance from the pole to the flag tip.
pub const FLAG_TIP_OFFSET: f64 = 15.0;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Colors and stroke widths used when emitting a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStyle {
    pub background: Color,
    pub arc_color: Color,
    pub indicator_color: Color,
    pub text_color: Color,
    pub arc_line_width: f64,
    pub pole_line_width: f64,
    pub timer_font_size: f32,
    pub timer_offset_y: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            arc_color: Color::BLACK,
            indicator_color: Color::RED,
            text_color: Color::BLACK,
            arc_line_width: 2.0,
            pole_line_width: 2.0,
            timer_font_size: 32.0,
            timer_offset_y: 40.0,
        }
    }
}

/// Advance `state` to `now_ms` and describe the frame to draw.
///
/// The time step is not clamped: a long gap between calls turns into a
/// proportional jump of the wheel.
pub fn tick(state: &mut WheelState, now_ms: f64, surface: Surface, style: &FrameStyle) -> Scene {
    advance(state, now_ms);
    build_scene(state, surface, style)
}

/// Kinematic half of [`tick`], without emitting any draw commands.
pub fn advance(state: &mut WheelState, now_ms: f64) {
    let delta_seconds = (now_ms - state.last_frame_ms) / 1000.0;
    state.last_frame_ms = now_ms;

    if state.running {
        state.elapsed_ms += now_ms - state.last_start_ms;
        state.last_start_ms = now_ms;

        state.rotation += state.direction.sign() * state.radians_per_second() * delta_seconds;
    }
}

/// Draw sequence for the current state: background, timer, arc, hub, flag.
pub fn build_scene(state: &WheelState, surface: Surface, style: &FrameStyle) -> Scene {
    let mut scene = Scene::new();
    let (cx, cy) = surface.center();

    scene.add_command(DrawCommand::FillRect {
        x: 0.0,
        y: 0.0,
        width: surface.width,
        height: surface.height,
        color: style.background,
    });

    scene.add_command(DrawCommand::Text {
        x: cx,
        y: style.timer_offset_y,
        text: format_elapsed(state.elapsed_ms),
        font_size: style.timer_font_size,
        color: style.text_color,
    });

    let (start_angle, end_angle) = arc_angles(state);
    scene.add_command(DrawCommand::StrokeArc {
        cx,
        cy,
        radius: state.radius,
        start_angle,
        end_angle,
        line_width: style.arc_line_width,
        color: style.arc_color,
    });

    scene.add_command(DrawCommand::FillCircle {
        cx,
        cy,
        radius: CENTER_DOT_RADIUS,
        color: style.arc_color,
    });

    add_indicator(&mut scene, state, (cx, cy), style);

    scene
}

fn add_indicator(scene: &mut Scene, state: &WheelState, center: (f64, f64), style: &FrameStyle) {
    scene.add_command(DrawCommand::Save);
    scene.add_command(DrawCommand::Translate {
        dx: center.0,
        dy: center.1,
    });
    scene.add_command(DrawCommand::Rotate(indicator_angle(state)));

    let flag_x = state.radius + state.indicator_length;
    scene.add_command(DrawCommand::StrokeLine {
        x0: state.radius,
        y0: 0.0,
        x1: flag_x,
        y1: 0.0,
        line_width: style.pole_line_width,
        color: style.indicator_color,
    });

    // Flat side lies on the pole, tip points with the direction of travel
    scene.add_command(DrawCommand::FillPolygon {
        points: vec![
            (flag_x - FLAG_HALF_BASE, 0.0),
            (flag_x + FLAG_HALF_BASE, 0.0),
            (flag_x, flag_tip_offset(state.direction)),
        ],
        color: style.indicator_color,
    });

    scene.add_command(DrawCommand::Restore);
}

/// Start and end angle of the arc. Zero sits at the bottom of the wheel.
pub fn arc_angles(state: &WheelState) -> (f64, f64) {
    let arc_radians = (state.arc_span / 360.0) * (2.0 * PI);
    let start_angle = FRAC_PI_2 + state.rotation;
    (start_angle, start_angle + arc_radians)
}

/// Rotation that places the indicator at the angular midpoint of the arc.
pub fn indicator_angle(state: &WheelState) -> f64 {
    state.rotation + FRAC_PI_2 + (state.arc_span / 2.0) * (PI / 180.0)
}

pub fn flag_tip_offset(direction: Direction) -> f64 {
    match direction {
        Direction::Clockwise => FLAG_TIP_OFFSET,
        Direction::CounterClockwise => -FLAG_TIP_OFFSET,
    }
}

/// `MM:SS:CS`, each part zero-padded to two digits.
pub fn format_elapsed(elapsed_ms: f64) -> String {
    let ms = elapsed_ms.max(0.0).floor() as u64;
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let centis = (ms % 1000) / 10;
    format!("{minutes:02}:{seconds:02}:{centis:02}")
}
