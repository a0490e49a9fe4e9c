//! Blinks the blue LED every 100 ms, forever.
//!
//! This program assumes the blue LED sits on physical pin #7 and the red one on pin #11, each behind a resistor,
//! and an SHT3x sensor on `/dev/i2c-1` with its ADDR pin pulled low.

use c2_blink::{Board, Config, Delay, Device, ToggleLoop};
use std::error::Error;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    let result = start();
    if let Err(err) = &result {
        error!(%err, "initialization failed");
    }
    result
}

fn start() -> Result<(), Box<dyn Error>> {
    let config = Config::compiled()?;
    let device = Device::new()?;
    let board = Board::init(&device, &config)?;
    info!(?config, "starting");

    // Held for the process lifetime, never used.
    let Board {
        blink_led,
        idle_led: _idle_led,
        sensor: _sensor,
    } = board;

    ToggleLoop::new(blink_led, Delay::new(), config.interval).run()
}
