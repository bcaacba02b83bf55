//! Input handlers for the wheel.
//!
//! Every user action (keyboard, command channel, CLI) is a [`WheelCommand`]
//! applied between frames. Raw text coming from number fields is parsed
//! leniently and falls back to a per-field default instead of failing.

use log::debug;

use crate::config::WheelConfig;
use crate::state::{Direction, WheelState, FULL_ARC, MIN_MAX_RPM};

/// Step applied to the RPM ceiling by [`WheelCommand::RaiseMaxRpm`] and
/// [`WheelCommand::LowerMaxRpm`].
pub const MAX_RPM_STEP: f64 = 500.0;

const RADIUS_FALLBACK: f64 = 40.0;
const INDICATOR_LENGTH_FALLBACK: f64 = 10.0;

/// Command enum for type-safe wheel updates
#[derive(Debug, Clone, PartialEq)]
pub enum WheelCommand {
    SetRpm(f64),
    SetRpmText(String),
    NudgeRpm(f64),
    RaiseMaxRpm,
    LowerMaxRpm,
    SetArc(f64),
    SetArcText(String),
    NudgeArc(f64),
    SetRadius(f64),
    SetRadiusText(String),
    NudgeRadius(f64),
    SetIndicatorLength(f64),
    SetIndicatorLengthText(String),
    NudgeIndicatorLength(f64),
    SetDirection(Direction),
    ToggleDirection,
    Start,
    Stop,
    ToggleRunning,
    Reset,
}

/// Apply one command. `now_ms` is the host clock, used to arm the stopwatch.
pub fn apply(state: &mut WheelState, command: WheelCommand, now_ms: f64, config: &WheelConfig) {
    debug!("applying {command:?}");
    match command {
        WheelCommand::SetRpm(rpm) => set_rpm(state, rpm),
        WheelCommand::SetRpmText(text) => set_rpm(state, parse_or(&text, 0.0)),
        WheelCommand::NudgeRpm(step) => set_rpm(state, state.rpm + step),
        WheelCommand::RaiseMaxRpm => raise_max_rpm(state),
        WheelCommand::LowerMaxRpm => lower_max_rpm(state),
        WheelCommand::SetArc(arc) => state.arc_span = arc,
        WheelCommand::SetArcText(text) => state.arc_span = parse_or(&text, 0.0),
        WheelCommand::NudgeArc(step) => state.arc_span = (state.arc_span + step).clamp(0.0, FULL_ARC),
        WheelCommand::SetRadius(radius) => state.radius = radius,
        WheelCommand::SetRadiusText(text) => state.radius = parse_or(&text, RADIUS_FALLBACK),
        WheelCommand::NudgeRadius(step) => state.radius = (state.radius + step).max(1.0),
        WheelCommand::SetIndicatorLength(length) => state.indicator_length = length,
        WheelCommand::SetIndicatorLengthText(text) => {
            state.indicator_length = parse_or(&text, INDICATOR_LENGTH_FALLBACK);
        }
        WheelCommand::NudgeIndicatorLength(step) => {
            state.indicator_length = (state.indicator_length + step).max(1.0);
        }
        WheelCommand::SetDirection(direction) => state.direction = direction,
        WheelCommand::ToggleDirection => state.direction = state.direction.flipped(),
        WheelCommand::Start => start(state, now_ms),
        WheelCommand::Stop => state.running = false,
        WheelCommand::ToggleRunning => {
            if state.running {
                state.running = false;
            } else {
                start(state, now_ms);
            }
        }
        WheelCommand::Reset => state.reset(config.reset_rpm),
    }
}

fn start(state: &mut WheelState, now_ms: f64) {
    if state.running {
        return;
    }
    state.running = true;
    state.last_start_ms = now_ms;
}

fn set_rpm(state: &mut WheelState, rpm: f64) {
    state.rpm = rpm.clamp(0.0, state.max_rpm);
}

fn raise_max_rpm(state: &mut WheelState) {
    state.max_rpm = if state.max_rpm == MIN_MAX_RPM {
        MAX_RPM_STEP
    } else {
        state.max_rpm + MAX_RPM_STEP
    };
}

fn lower_max_rpm(state: &mut WheelState) {
    if state.max_rpm > MIN_MAX_RPM {
        state.max_rpm = (state.max_rpm - MAX_RPM_STEP).max(MIN_MAX_RPM);
        state.rpm = state.rpm.min(state.max_rpm);
    }
}

/// Leading-integer parse of a number field. Empty, non-numeric and zero
/// input all yield `fallback`.
pub fn parse_or(text: &str, fallback: f64) -> f64 {
    match parse_int_prefix(text) {
        Some(value) if value != 0 => value as f64,
        _ => fallback,
    }
}

/// Optional sign followed by digits, ignoring leading whitespace and any
/// trailing garbage ("12px" is 12).
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
