//! Handle for the Sensirion SHT3x temperature/humidity sensor.
//!
//! Only construction is supported: the handle binds a bus to a device address and holds it.
//! No command is sent to the sensor.

use embedded_hal::blocking::i2c::{Write, WriteRead};
use tracing::debug;

/// I2C address of the sensor, selected by the level of its ADDR pin.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Address {
    Low = 0x44,
    High = 0x45,
}

#[derive(Debug)]
pub struct Sht3x<I2C> {
    i2c: I2C,
    address: Address,
}

impl<I2C, E> Sht3x<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(i2c: I2C, address: Address) -> Self {
        debug!(address = address as u8, "created sht3x handle");
        Self { i2c, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}
