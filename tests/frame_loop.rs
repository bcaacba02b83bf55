use std::f64::consts::PI;

use wheel::controls::apply;
use wheel::render::Canvas;
use wheel::{tick, Direction, DrawCommand, FrameStyle, Surface, WheelCommand, WheelConfig, WheelState};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn run_frames(state: &mut WheelState, from_ms: f64, frames: usize) -> f64 {
    let surface = Surface::new(400, 400);
    let style = FrameStyle::default();
    let mut now = from_ms;
    for _ in 0..frames {
        now += FRAME_MS;
        tick(state, now, surface, &style);
    }
    now
}

#[test]
fn start_stop_reset_session() {
    let config = WheelConfig::builder().rpm(60.0).build();
    let mut state = config.initial_state();

    // Idle frames do nothing
    let now = run_frames(&mut state, 0.0, 30);
    assert_eq!(state.rotation, 0.0);
    assert_eq!(state.elapsed_ms, 0.0);

    apply(&mut state, WheelCommand::Start, now, &config);
    let now = run_frames(&mut state, now, 60);
    assert!((state.rotation - 2.0 * PI).abs() < 1e-9);
    assert!((state.elapsed_ms - 1000.0).abs() < 1e-6);

    apply(&mut state, WheelCommand::Stop, now, &config);
    let frozen = (state.rotation, state.elapsed_ms);
    let now = run_frames(&mut state, now, 120);
    assert_eq!((state.rotation, state.elapsed_ms), frozen);

    // Reverse and run half a second: back half a turn
    apply(&mut state, WheelCommand::SetDirection(Direction::CounterClockwise), now, &config);
    apply(&mut state, WheelCommand::Start, now, &config);
    let now = run_frames(&mut state, now, 30);
    assert!((state.rotation - PI).abs() < 1e-9);
    assert!((state.elapsed_ms - 1500.0).abs() < 1e-6);

    apply(&mut state, WheelCommand::Reset, now, &config);
    assert_eq!(state.rotation, 0.0);
    assert!(!state.running);
    assert_eq!(state.arc_span, 360.0);
    assert_eq!(state.elapsed_ms, 0.0);
    assert_eq!(state.rpm, 0.0);
}

#[test]
fn timer_text_tracks_elapsed_time() {
    let config = WheelConfig::default();
    let mut state = config.initial_state();
    apply(&mut state, WheelCommand::Start, 0.0, &config);

    tick(&mut state, 61_234.0, Surface::new(400, 400), &FrameStyle::default());
    let scene = tick(&mut state, 61_234.0, Surface::new(400, 400), &FrameStyle::default());

    let text = scene.commands().iter().find_map(|command| match command {
        DrawCommand::Text { text, .. } => Some(text.as_str()),
        _ => None,
    });
    assert_eq!(text, Some("01:01:23"));
}

#[test]
fn scene_renders_without_a_font() {
    let mut state = WheelState::default();
    let scene = tick(&mut state, 0.0, Surface::new(64, 64), &FrameStyle::default());

    let mut frame = vec![0u8; 64 * 64 * 4];
    let mut canvas = Canvas::new(&mut frame, 64, 64);
    canvas.render(&scene, None);

    // Hub dot at the center over a white background
    assert_eq!(canvas.pixel(32, 32), Some((0, 0, 0)));
    assert_eq!(canvas.pixel(0, 0), Some((0xff, 0xff, 0xff)));
}
