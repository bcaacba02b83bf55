// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod config;
pub mod controls;
pub mod error;
pub mod frame;
pub mod logging;
pub mod render;
pub mod scene;
pub mod state;

// External crate imports
use log::{debug, error, info};
use pixels::{Pixels, SurfaceTexture};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

pub use config::WheelConfig;
pub use controls::WheelCommand;
pub use error::WheelError;
pub use frame::{format_elapsed, tick, FrameStyle, Surface};
pub use scene::{Color, DrawCommand, Scene};
pub use state::{Direction, WheelState};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// A wheel plus the window that shows it.
#[derive(Debug, Clone)]
pub struct Wheel {
    config: WheelConfig,
    state: WheelState,
    epoch: Instant,
}

impl Wheel {
    pub fn new(config: WheelConfig) -> Self {
        let state = config.initial_state();
        Self {
            config,
            state,
            epoch: Instant::now(),
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn state(&self) -> &WheelState {
        &self.state
    }

    /// Milliseconds since this wheel was created; the clock every tick runs on.
    pub fn now_ms(&self) -> f64 {
        elapsed_ms(self.epoch)
    }

    pub fn apply(&mut self, command: WheelCommand) {
        let now = self.now_ms();
        controls::apply(&mut self.state, command, now, &self.config);
    }

    /// Advance to `now_ms` and return the frame for a surface of the given size.
    pub fn frame_at(&mut self, now_ms: f64, width: usize, height: usize) -> Scene {
        tick(
            &mut self.state,
            now_ms,
            Surface::new(width, height),
            &self.config.frame_style(),
        )
    }

    pub fn show(&mut self) -> Result<(), WheelError> {
        self.run_window(None)
    }

    /// Like [`Wheel::show`], also draining `receiver` before every frame.
    pub fn show_with_commands(&mut self, receiver: Receiver<WheelCommand>) -> Result<(), WheelError> {
        self.run_window(Some(receiver))
    }

    fn run_window(&mut self, receiver: Option<Receiver<WheelCommand>>) -> Result<(), WheelError> {
        let font = render::load_font(self.config.font_path.as_deref())?;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();

        let Wheel {
            config,
            state,
            epoch,
        } = self;
        let epoch = *epoch;
        let style = config.frame_style();

        // The first frame measures from here, not from construction
        state.last_frame_ms = elapsed_ms(epoch);
        if state.running {
            state.last_start_ms = state.last_frame_ms;
        }
        info!(
            "showing wheel {}x{} at {} rpm (max {})",
            fb_width, fb_height, state.rpm, state.max_rpm
        );

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            error!("resizing pixel buffer failed: {err}");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            error!("resizing surface failed: {err}");
                        }
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                logical_key,
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    } => match key_action(&logical_key, config) {
                        Some(KeyAction::Exit) => window_target.exit(),
                        Some(KeyAction::Command(command)) => {
                            controls::apply(state, command, elapsed_ms(epoch), config);
                        }
                        None => {}
                    },
                    WindowEvent::RedrawRequested => {
                        let now = elapsed_ms(epoch);
                        if let Some(ref receiver) = receiver {
                            // Try to get the latest commands without blocking
                            while let Ok(command) = receiver.try_recv() {
                                controls::apply(state, command, now, config);
                            }
                        }

                        let scene = tick(state, now, Surface::new(fb_width, fb_height), &style);
                        let mut canvas = render::Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        canvas.render(&scene, font.as_ref());
                        if let Err(err) = pixels.render() {
                            error!("presenting frame failed: {err}");
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        debug!("event loop finished");
        Ok(())
    }
}

fn elapsed_ms(epoch: Instant) -> f64 {
    epoch.elapsed().as_secs_f64() * 1000.0
}

// ============================================================================
// KEYBOARD BINDINGS
// ============================================================================

/// What a key press does to the wheel.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Command(WheelCommand),
    Exit,
}

/// Map a pressed key to an action. Unbound keys yield `None`.
pub fn key_action(key: &Key, config: &WheelConfig) -> Option<KeyAction> {
    let command = match key {
        Key::Named(NamedKey::Escape) => return Some(KeyAction::Exit),
        Key::Named(NamedKey::Space) => WheelCommand::ToggleRunning,
        Key::Named(NamedKey::ArrowUp) => WheelCommand::NudgeRpm(config.rpm_step),
        Key::Named(NamedKey::ArrowDown) => WheelCommand::NudgeRpm(-config.rpm_step),
        Key::Named(NamedKey::PageUp) => WheelCommand::RaiseMaxRpm,
        Key::Named(NamedKey::PageDown) => WheelCommand::LowerMaxRpm,
        Key::Character(c) => match c.to_lowercase().as_str() {
            "s" => WheelCommand::Start,
            "x" => WheelCommand::Stop,
            "r" => WheelCommand::Reset,
            "c" => WheelCommand::SetDirection(Direction::Clockwise),
            "a" => WheelCommand::SetDirection(Direction::CounterClockwise),
            "]" => WheelCommand::NudgeArc(config.arc_step),
            "[" => WheelCommand::NudgeArc(-config.arc_step),
            "=" | "+" => WheelCommand::NudgeRadius(config.radius_step),
            "-" => WheelCommand::NudgeRadius(-config.radius_step),
            "." => WheelCommand::NudgeIndicatorLength(config.indicator_length_step),
            "," => WheelCommand::NudgeIndicatorLength(-config.indicator_length_step),
            _ => return None,
        },
        _ => return None,
    };
    Some(KeyAction::Command(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_map_to_commands() {
        let config = WheelConfig::default();
        assert_eq!(
            key_action(&Key::Named(NamedKey::Space), &config),
            Some(KeyAction::Command(WheelCommand::ToggleRunning))
        );
        assert_eq!(
            key_action(&Key::Named(NamedKey::ArrowDown), &config),
            Some(KeyAction::Command(WheelCommand::NudgeRpm(-100.0)))
        );
        assert_eq!(
            key_action(&Key::Named(NamedKey::Escape), &config),
            Some(KeyAction::Exit)
        );
        assert_eq!(key_action(&Key::Named(NamedKey::Tab), &config), None);
    }

    #[test]
    fn character_keys_ignore_case() {
        let config = WheelConfig::builder().arc_step(30.0).build();
        assert_eq!(
            key_action(&Key::Character("R".into()), &config),
            Some(KeyAction::Command(WheelCommand::Reset))
        );
        assert_eq!(
            key_action(&Key::Character("a".into()), &config),
            Some(KeyAction::Command(WheelCommand::SetDirection(
                Direction::CounterClockwise
            )))
        );
        assert_eq!(
            key_action(&Key::Character("]".into()), &config),
            Some(KeyAction::Command(WheelCommand::NudgeArc(30.0)))
        );
        assert_eq!(key_action(&Key::Character("q".into()), &config), None);
    }

    #[test]
    fn wheel_starts_from_config() {
        let wheel = Wheel::new(WheelConfig::builder().rpm(250.0).radius(90.0).build());
        assert_eq!(wheel.state().rpm, 250.0);
        assert_eq!(wheel.state().radius, 90.0);
        assert!(!wheel.state().running);
    }

    #[test]
    fn wheel_frames_advance_only_after_start() {
        let mut wheel = Wheel::new(WheelConfig::builder().rpm(60.0).build());
        wheel.frame_at(500.0, 400, 400);
        assert_eq!(wheel.state().rotation, 0.0);

        wheel.apply(WheelCommand::Start);
        let start = wheel.state().last_start_ms;
        wheel.frame_at(start + 1000.0, 400, 400);
        assert!(wheel.state().rotation > 0.0);
        assert!((wheel.state().elapsed_ms - 1000.0).abs() < 1e-6);
    }
}
