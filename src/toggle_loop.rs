//! The firmware's only control loop: flip a pin, block for the interval, repeat.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::ToggleableOutputPin;
use std::convert::Infallible;
use tracing::{info, trace};

use crate::config::BlinkInterval;

/// Drives one output pin into an alternating pattern at a fixed cadence.
///
/// The loop exclusively owns its pin for its whole lifetime. Periods are measured independently by the
/// delay provider, so the real period is `interval` plus the time spent toggling, without drift correction.
pub struct ToggleLoop<P, D> {
    pin: P,
    delay: D,
    interval: BlinkInterval,
}

impl<P, D> ToggleLoop<P, D>
where
    P: ToggleableOutputPin<Error = Infallible>,
    D: DelayMs<u32>,
{
    /// Takes ownership of `pin` for the lifetime of the loop.
    pub fn new(pin: P, delay: D, interval: BlinkInterval) -> Self {
        Self {
            pin,
            delay,
            interval,
        }
    }

    /// Period slept after every toggle.
    pub fn interval(&self) -> BlinkInterval {
        self.interval
    }

    /// The driven pin, for inspection.
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Flips the pin to the opposite level.
    pub fn toggle(&mut self) {
        self.pin.toggle().unwrap_or_else(|never| match never {});
    }

    /// Blocks the calling thread for at least `ms` milliseconds.
    pub fn sleep(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Toggles and sleeps forever.
    pub fn run(mut self) -> ! {
        info!(interval_ms = self.interval.as_millis(), "entering toggle loop");

        loop {
            self.step();
        }
    }

    /// Same body as `run`, bounded to `iterations` periods.
    pub fn run_for(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.step();
        }
    }

    /// Gives back the pin and the delay provider.
    pub fn into_parts(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn step(&mut self) {
        self.toggle();
        trace!("toggled");
        self.sleep(self.interval.as_millis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::Delay;
    use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin};
    use std::sync::mpsc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[derive(Debug, Default)]
    struct MockPin {
        high: bool,
        toggles: usize,
    }

    impl OutputPin for MockPin {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.toggles += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.toggles += 1;
            Ok(())
        }
    }

    impl StatefulOutputPin for MockPin {
        fn is_set_high(&self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_set_low(&self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    impl embedded_hal::digital::v2::toggleable::Default for MockPin {}

    /// Records requested delays instead of blocking.
    #[derive(Debug, Default)]
    struct MockDelay {
        calls: Vec<u32>,
    }

    impl DelayMs<u32> for MockDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.calls.push(ms);
        }
    }

    /// Reports every delay to a channel. Once nobody listens it parks the thread for good.
    struct ReportingDelay(mpsc::Sender<u32>);

    impl DelayMs<u32> for ReportingDelay {
        fn delay_ms(&mut self, ms: u32) {
            if self.0.send(ms).is_err() {
                loop {
                    thread::park();
                }
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn interval(ms: i64) -> BlinkInterval {
        BlinkInterval::from_millis(ms).unwrap()
    }

    #[test]
    fn double_toggle_is_identity() {
        let mut blink = ToggleLoop::new(MockPin::default(), MockDelay::default(), interval(100));

        blink.toggle();
        blink.toggle();
        assert!(!blink.pin().high);
        assert_eq!(blink.pin().toggles, 2);
    }

    #[test]
    fn state_alternates_on_every_toggle() {
        let mut blink = ToggleLoop::new(MockPin::default(), MockDelay::default(), interval(100));

        let mut previous = blink.pin().high;
        for _ in 0..16 {
            blink.toggle();
            assert_eq!(blink.pin().high, !previous);
            previous = blink.pin().high;
        }
    }

    #[test]
    fn every_iteration_toggles_then_sleeps_for_interval() {
        let mut blink = ToggleLoop::new(MockPin::default(), MockDelay::default(), interval(100));
        blink.run_for(5);

        let (pin, delay) = blink.into_parts();
        assert_eq!(pin.toggles, 5);
        assert!(pin.high);
        assert_eq!(delay.calls, vec![100; 5]);
    }

    #[test]
    fn three_toggles_take_at_least_three_intervals() {
        let mut blink = ToggleLoop::new(MockPin::default(), Delay::new(), interval(100));
        let start = Instant::now();

        let mut observed = Vec::new();
        for _ in 0..3 {
            blink.toggle();
            observed.push(blink.pin().high);
            blink.sleep(blink.interval().as_millis());
        }

        assert_eq!(observed, vec![true, false, true]);
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn successive_toggles_are_at_least_one_interval_apart() {
        let mut blink = ToggleLoop::new(MockPin::default(), Delay::new(), interval(15));

        let mut last = Instant::now();
        blink.run_for(1);
        for _ in 0..4 {
            blink.run_for(1);
            let now = Instant::now();
            assert!(now - last >= Duration::from_millis(15));
            last = now;
        }
    }

    #[test]
    fn run_never_returns() {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            ToggleLoop::new(MockPin::default(), ReportingDelay(tx), interval(100)).run()
        });

        for _ in 0..10 {
            let ms = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(ms, 100);
        }
        assert!(!handle.is_finished());

        // Hang up so the loop thread parks instead of spinning.
        drop(rx);
    }
}
