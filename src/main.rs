use std::path::PathBuf;

use clap::Parser;
use wheel::logging::{init_logging, LoggingConfig};
use wheel::{Direction, Wheel, WheelCommand, WheelConfig};

/// Animated rotating wheel with a run timer.
///
/// Keys: Space start/stop, S start, X stop, R reset, C/A direction,
/// Up/Down rpm, PageUp/PageDown rpm ceiling, [ ] arc, - = radius,
/// , . indicator length, Esc quit.
#[derive(Parser, Debug)]
#[command(name = "wheel", version)]
struct Cli {
    /// Window title
    #[arg(long, default_value = "Wheel")]
    title: String,

    #[arg(long, default_value_t = 600)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Redraw cap in frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Initial speed in revolutions per minute
    #[arg(long, default_value_t = 1000.0)]
    rpm: f64,

    /// Initial RPM ceiling (never below 100)
    #[arg(long, default_value_t = 5000.0)]
    max_rpm: f64,

    /// Speed restored by a reset
    #[arg(long, default_value_t = 0.0)]
    reset_rpm: f64,

    /// Wheel radius in pixels
    #[arg(long, default_value_t = 120.0)]
    radius: f64,

    /// Indicator pole length in pixels
    #[arg(long, default_value_t = 30.0)]
    indicator_length: f64,

    /// Arc span in degrees
    #[arg(long, default_value_t = 360.0)]
    arc: f64,

    /// Spin counterclockwise
    #[arg(long)]
    counterclockwise: bool,

    /// Start spinning immediately
    #[arg(long)]
    start: bool,

    /// Font used for the timer
    #[arg(long, env = "WHEEL_FONT")]
    font: Option<PathBuf>,

    /// Log filter, env_logger syntax (overrides RUST_LOG)
    #[arg(long, env = "WHEEL_LOG")]
    log: Option<String>,
}

impl Cli {
    fn to_config(&self) -> WheelConfig {
        let direction = if self.counterclockwise {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        };
        WheelConfig::builder()
            .title(self.title.clone())
            .window_width(self.width)
            .window_height(self.height)
            .max_framerate(self.fps)
            .rpm(self.rpm)
            .max_rpm(self.max_rpm)
            .reset_rpm(self.reset_rpm)
            .radius(self.radius)
            .indicator_length(self.indicator_length)
            .arc_span(self.arc)
            .direction(direction)
            .maybe_font_path(self.font.clone())
            .build()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let mut wheel = Wheel::new(cli.to_config());
    if cli.start {
        wheel.apply(WheelCommand::Start);
    }

    wheel.show()?;
    Ok(())
}
