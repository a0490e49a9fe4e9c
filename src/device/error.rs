use std::io;
use thiserror::Error;

use crate::pin_map::{Id, PinId};

/// Enum representing possible failures when initializing the device.
///
/// - DeviceAccessFailed - There is no access to the device file, either because of insufficient permissions or operating system misconfiguration.
/// - MemoryMapFailed - There is an error when trying to create a mmaped piece of memory to represent device file.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("failed to open memory device {path}")]
    DeviceAccessFailed {
        path: String,
        #[source]
        source: nix::Error,
    },
    #[error("failed to map device memory")]
    MemoryMapFailed(#[source] io::Error),
}

/// Enum representing possible failures when acquiring output pins.
///
/// - AlreadyLeased - The pin is already driven by another live `OutputPin`. Every pin has at most one writer.
/// - WrongPinId - A raw pin id is not recognized by this crate registers mapping.
/// - NotAPin - A board identifier names something other than a pin (e.g. a bus).
#[derive(Error, Debug)]
pub enum PinError {
    #[error("pin {0:?} is already leased for output")]
    AlreadyLeased(PinId),
    #[error("unrecognized internal pin id: {0}")]
    WrongPinId(u8),
    #[error("board identifier {0} does not name a pin")]
    NotAPin(Id),
    #[error("lease map lock poisoned")]
    LeaseMapPoisoned,
}
