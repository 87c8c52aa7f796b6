// Runner binary for the `hue_hound` tracking engine.
//
// Wires the production screen capture and pointer backends into the control
// loop, prints the loop's event stream, and stops cleanly on Ctrl-C. An
// optional first argument overrides the target color as `#RRGGBB`.

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hue_hound::{
    EnigoActuator, LoopConfig, ScreenSource, Tracker, TrackerConfig, TrackerEvent,
};

fn parse_hex_color(text: &str) -> anyhow::Result<[u8; 3]> {
    let hex = text.strip_prefix('#').unwrap_or(text);
    if hex.len() != 6 {
        bail!("expected a color like #C9008D, got {text:?}");
    }
    let parse = |range| u8::from_str_radix(&hex[range], 16).context("invalid hex digit");
    Ok([parse(0..2)?, parse(2..4)?, parse(4..6)?])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = TrackerConfig::default();
    if let Some(arg) = std::env::args().nth(1) {
        config.target_color = parse_hex_color(&arg)?;
    }
    info!(color = ?config.target_color, "starting tracker");

    // Capability construction fails here, before the loop ever runs.
    let source = ScreenSource::new().context("screen capture unavailable")?;
    let actuator = EnigoActuator::new().context("pointer device unavailable")?;

    let (mut tracker, mut events) =
        Tracker::new(source, actuator, config, LoopConfig::default());
    tracker.start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Some(TrackerEvent::Status(message)) => info!("{message}"),
                Some(TrackerEvent::TargetFound { x, y }) => info!("target at ({x}, {y})"),
                None => break,
            },
        }
    }

    tracker.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_hex_color;

    #[test]
    fn parses_the_default_pink() {
        assert_eq!(parse_hex_color("#C9008D").unwrap(), [201, 0, 141]);
        assert_eq!(parse_hex_color("c9008d").unwrap(), [201, 0, 141]);
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(parse_hex_color("#C9008").is_err());
        assert!(parse_hex_color("not-a-color").is_err());
    }
}
