//! Blocking delays backed by the operating system scheduler.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use std::thread;
use std::time::Duration;

/// Delay provider that suspends the calling thread.
///
/// `thread::sleep` never wakes up early, so every delay lasts at least the requested time.
#[derive(Copy, Clone, Debug, Default)]
pub struct Delay;

impl Delay {
    pub fn new() -> Self {
        Delay
    }
}

impl DelayMs<u32> for Delay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        self.delay_ms(u32::from(ms));
    }
}

impl DelayMs<u8> for Delay {
    fn delay_ms(&mut self, ms: u8) {
        self.delay_ms(u32::from(ms));
    }
}

impl DelayUs<u32> for Delay {
    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }
}
