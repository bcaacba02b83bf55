use std::path::PathBuf;

use bon::Builder;

use crate::frame::FrameStyle;
use crate::scene::Color;
use crate::state::{Direction, WheelState, FULL_ARC, MIN_MAX_RPM};

/// Everything a [`crate::Wheel`] needs before the first frame.
#[derive(Debug, Clone, Builder)]
pub struct WheelConfig {
    #[builder(default = "Wheel".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 600)]
    pub window_width: usize,
    #[builder(default = 600)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Initial wheel parameters
    #[builder(default = 1000.0)]
    pub rpm: f64,
    #[builder(default = 5000.0)]
    pub max_rpm: f64,
    #[builder(default = 120.0)]
    pub radius: f64,
    #[builder(default = 30.0)]
    pub indicator_length: f64,
    #[builder(default = FULL_ARC)]
    pub arc_span: f64,
    #[builder(default)]
    pub direction: Direction,

    /// RPM restored by a reset
    #[builder(default = 0.0)]
    pub reset_rpm: f64,

    // Keyboard steps
    #[builder(default = 100.0)]
    pub rpm_step: f64,
    #[builder(default = 15.0)]
    pub arc_step: f64,
    #[builder(default = 10.0)]
    pub radius_step: f64,
    #[builder(default = 5.0)]
    pub indicator_length_step: f64,

    // Colors
    #[builder(default = Color::WHITE)]
    pub background_color: Color,
    #[builder(default = Color::BLACK)]
    pub arc_color: Color,
    #[builder(default = Color::RED)]
    pub indicator_color: Color,
    #[builder(default = Color::BLACK)]
    pub text_color: Color,

    // Strokes and text
    #[builder(default = 2.0)]
    pub arc_line_width: f64,
    #[builder(default = 2.0)]
    pub pole_line_width: f64,
    #[builder(default = 32.0)]
    pub timer_font_size: f32,
    #[builder(default = 40.0)]
    pub timer_offset_y: f64,

    /// TrueType/OpenType font for the timer. Falls back to well-known
    /// system locations when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WheelConfig {
    /// State at startup. The ceiling is raised to the policy minimum and the
    /// speed clamped under it, as the controls would.
    pub fn initial_state(&self) -> WheelState {
        let max_rpm = self.max_rpm.max(MIN_MAX_RPM);
        WheelState {
            rpm: self.rpm.clamp(0.0, max_rpm),
            max_rpm,
            direction: self.direction,
            arc_span: self.arc_span,
            radius: self.radius,
            indicator_length: self.indicator_length,
            ..WheelState::default()
        }
    }

    pub fn frame_style(&self) -> FrameStyle {
        FrameStyle {
            background: self.background_color,
            arc_color: self.arc_color,
            indicator_color: self.indicator_color,
            text_color: self.text_color,
            arc_line_width: self.arc_line_width,
            pole_line_width: self.pole_line_width,
            timer_font_size: self.timer_font_size,
            timer_offset_y: self.timer_offset_y,
        }
    }
}
