/// Lowest value the RPM ceiling may take.
pub const MIN_MAX_RPM: f64 = 100.0;

/// Arc span restored by a reset, in degrees.
pub const FULL_ARC: f64 = 360.0;

/// Rotation direction of the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// +1 for clockwise, -1 for counterclockwise.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Mutable record driven by the controls and the frame driver.
///
/// Nothing here validates its inputs: clamping is the job of
/// [`crate::controls::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct WheelState {
    /// Current angle in radians, unbounded
    pub rotation: f64,
    pub rpm: f64,
    pub max_rpm: f64,
    pub direction: Direction,
    /// Arc span in degrees
    pub arc_span: f64,
    pub radius: f64,
    pub indicator_length: f64,
    pub running: bool,
    /// Accumulated run time in milliseconds
    pub elapsed_ms: f64,
    /// Timestamp of the previous frame
    pub last_frame_ms: f64,
    /// Start mark; re-armed on every running frame
    pub last_start_ms: f64,
}

impl Default for WheelState {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            rpm: 1000.0,
            max_rpm: 5000.0,
            direction: Direction::Clockwise,
            arc_span: FULL_ARC,
            radius: 120.0,
            indicator_length: 30.0,
            running: false,
            elapsed_ms: 0.0,
            last_frame_ms: 0.0,
            last_start_ms: 0.0,
        }
    }
}

impl WheelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Radians per second at the current speed, unsigned.
    pub fn radians_per_second(&self) -> f64 {
        (self.rpm / 60.0) * (2.0 * std::f64::consts::PI)
    }

    /// Back to a stopped, untouched wheel. Geometry the user tuned
    /// (radius, indicator length, ceiling, direction) survives.
    pub fn reset(&mut self, reset_rpm: f64) {
        self.rotation = 0.0;
        self.rpm = reset_rpm;
        self.running = false;
        self.arc_span = FULL_ARC;
        self.elapsed_ms = 0.0;
    }
}
