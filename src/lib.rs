//! Toggle-loop firmware for the [ODROID-C2](https://www.hardkernel.com/shop/odroid-c2/) SBC.
//!
//! The program drives one LED through memory-mapped GPIO, flipping its state at a fixed interval forever.
//! Next to the LED it acquires a second (idle) LED, an I2C bus and an SHT3x sensor handle built over that bus.
//! None of those extra handles is used after construction - they are held for the lifetime of the process.
//!
//! GPIO pins (`OutputPin`), the I2C bus (`I2cBus`) and the blocking delay (`Delay`) implement relevant
//! [`embedded_hal`](https://crates.io/crates/embedded-hal) traits, so `ToggleLoop` is generic and can be driven
//! by any pin and delay implementation - including mocks in tests.
//!
//! **Only revision 2 of the board is supported by this crate.**

use thiserror::Error;

pub mod board;
pub mod bus;
pub mod config;
pub mod delay;
mod device;
mod pin_map;
pub mod sensor;
pub mod toggle_loop;

pub use board::Board;
pub use bus::{BusError, I2cBus};
pub use config::{BlinkInterval, Config, ConfigError};
pub use delay::Delay;
pub use device::error::DeviceError;
pub use device::error::PinError;
pub use device::{Device, OutputPin, Value};
pub use pin_map::{Id, PinId};
pub use sensor::Sht3x;
pub use toggle_loop::ToggleLoop;

/// Main error type for this crate.
///
/// Every variant is an initialization-time failure. Once `ToggleLoop` is running nothing can fail.
#[derive(Error, Debug)]
pub enum BlinkError {
    #[error("error while operating on a pin")]
    PinError(#[source] PinError),
    #[error("error while operating on a device")]
    DeviceError(#[source] DeviceError),
    #[error("error while operating on an i2c bus")]
    BusError(#[source] BusError),
    #[error("invalid configuration")]
    ConfigError(#[source] ConfigError),
}

impl From<PinError> for BlinkError {
    fn from(err: PinError) -> Self {
        BlinkError::PinError(err)
    }
}

impl From<DeviceError> for BlinkError {
    fn from(err: DeviceError) -> Self {
        BlinkError::DeviceError(err)
    }
}

impl From<BusError> for BlinkError {
    fn from(err: BusError) -> Self {
        BlinkError::BusError(err)
    }
}

impl From<ConfigError> for BlinkError {
    fn from(err: ConfigError) -> Self {
        BlinkError::ConfigError(err)
    }
}

pub type BlinkResult<T> = Result<T, BlinkError>;
