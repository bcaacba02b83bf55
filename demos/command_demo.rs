use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use wheel::logging::{init_logging, LoggingConfig};
use wheel::{Direction, Wheel, WheelCommand, WheelConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default());

    let config = WheelConfig::builder()
        .title("Wheel command demo".to_string())
        .rpm(30.0)
        .arc_span(270.0)
        .build();

    let mut wheel = Wheel::new(config);

    // Create a channel for scripted commands
    let (sender, receiver) = mpsc::channel();

    // Spawn a thread that walks through the controls in a loop
    thread::spawn(move || {
        let script = [
            WheelCommand::Start,
            WheelCommand::SetRpm(60.0),
            WheelCommand::SetArcText("180".to_string()),
            WheelCommand::SetDirection(Direction::CounterClockwise),
            WheelCommand::RaiseMaxRpm,
            WheelCommand::SetRpm(120.0),
            WheelCommand::Stop,
            WheelCommand::SetRadiusText("not a number".to_string()),
            WheelCommand::Reset,
            WheelCommand::SetRadius(120.0),
            WheelCommand::SetDirection(Direction::Clockwise),
        ];

        loop {
            for command in script.iter().cloned() {
                if sender.send(command).is_err() {
                    return;
                }
                thread::sleep(Duration::from_millis(1500));
            }
        }
    });

    println!("Displaying a wheel driven from a command thread:");
    println!("- start, speed up, shrink the arc, reverse");
    println!("- stop, fall back to the default radius, reset");
    println!("Close the window or press Esc to exit");

    wheel.show_with_commands(receiver)?;
    Ok(())
}
