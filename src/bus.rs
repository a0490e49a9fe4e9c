//! I2C bus handle over the Linux i2c-dev interface.
//!
//! The bus implements `embedded_hal` blocking I2C traits so device drivers can be built on top of it.
//! Every transaction is issued as a single combined transfer, addressed per message.

use embedded_hal::blocking::i2c::{Read, Write, WriteRead};
use i2cdev::core::{I2CMessage, I2CTransfer};
use i2cdev::linux::{LinuxI2CBus, LinuxI2CError, LinuxI2CMessage};
use thiserror::Error;
use tracing::debug;

use crate::pin_map::Id;

#[derive(Error, Debug)]
pub enum BusError {
    #[error("board identifier {0} does not name an i2c bus")]
    NotABus(Id),
    #[error("failed to open i2c bus {path}")]
    OpenFailed {
        path: &'static str,
        #[source]
        source: LinuxI2CError,
    },
    #[error("i2c transfer failed")]
    TransferFailed(#[source] LinuxI2CError),
}

/// Exclusively owned handle to one i2c-dev bus.
pub struct I2cBus {
    id: Id,
    path: &'static str,
    bus: LinuxI2CBus,
}

impl I2cBus {
    pub fn open(id: Id) -> Result<Self, BusError> {
        let path = id.bus_path()?;
        let bus = LinuxI2CBus::new(path).map_err(|source| BusError::OpenFailed { path, source })?;
        debug!(%id, path, "opened i2c bus");

        Ok(Self { id, path, bus })
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    fn transfer<'a>(&mut self, messages: &'a mut [LinuxI2CMessage<'a>]) -> Result<(), BusError> {
        self.bus
            .transfer(messages)
            .map(drop)
            .map_err(BusError::TransferFailed)
    }
}

impl std::fmt::Debug for I2cBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I2cBus")
            .field("id", &self.id)
            .field("path", &self.path)
            .finish()
    }
}

impl Write for I2cBus {
    type Error = BusError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut messages = [LinuxI2CMessage::write(bytes).with_address(u16::from(address))];
        self.transfer(&mut messages)
    }
}

impl Read for I2cBus {
    type Error = BusError;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        let mut messages = [LinuxI2CMessage::read(buffer).with_address(u16::from(address))];
        self.transfer(&mut messages)
    }
}

impl WriteRead for I2cBus {
    type Error = BusError;

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error> {
        let address = u16::from(address);
        let mut messages = [
            LinuxI2CMessage::write(bytes).with_address(address),
            LinuxI2CMessage::read(buffer).with_address(address),
        ];
        self.transfer(&mut messages)
    }
}
