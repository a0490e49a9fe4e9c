use tracing::info;

use crate::bus::I2cBus;
use crate::config::Config;
use crate::device::{Device, OutputPin};
use crate::sensor::Sht3x;
use crate::BlinkResult;

/// Every hardware handle the firmware holds for its lifetime.
///
/// Only `blink_led` is ever driven. The idle LED and the sensor are acquired at startup and kept alive untouched.
#[derive(Debug)]
pub struct Board<'device> {
    pub blink_led: OutputPin<'device>,
    pub idle_led: OutputPin<'device>,
    pub sensor: Sht3x<I2cBus>,
}

impl<'device> Board<'device> {
    /// Acquires pins, opens the bus and builds the sensor handle, in that order.
    ///
    /// Any failure here is fatal - there is no alternate resource to fall back to.
    pub fn init(device: &'device Device, config: &Config) -> BlinkResult<Self> {
        let blink_led = device.output_pin_for(config.blink_led)?;
        let idle_led = device.output_pin_for(config.idle_led)?;
        let bus = I2cBus::open(config.sensor_bus)?;
        let sensor = Sht3x::new(bus, config.sensor_address);

        info!(
            blink_led = %config.blink_led,
            idle_led = %config.idle_led,
            sensor_bus = %config.sensor_bus,
            "board initialized"
        );

        Ok(Self {
            blink_led,
            idle_led,
            sensor,
        })
    }
}
