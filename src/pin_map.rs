use derive_try_from_primitive::TryFromPrimitive;
use std::convert::TryFrom;
use std::fmt;

use crate::bus::BusError;
use crate::device::error::PinError;

/// Mapping from physical position of GPIO pins on the ODROID-C2 to internal identifiers of GPIO pins in memory.
///
/// Raw identifiers coming from outside the crate are validated with `PinId::try_from(u8)` (see `PinId::from_raw`).
#[repr(u8)]
#[derive(TryFromPrimitive, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PinId {
    Phy7 = 249,
    Phy8 = 240,
    Phy10 = 241,
    Phy11 = 247,
    Phy12 = 238,
    Phy13 = 239,
    Phy15 = 237,
    Phy16 = 236,
    Phy18 = 233,
    Phy19 = 235,
    Phy21 = 232,
    Phy22 = 231,
    Phy23 = 230,
    Phy24 = 229,
    Phy26 = 225,
    Phy27 = 207,
    Phy28 = 208,
    Phy29 = 228,
    Phy31 = 219,
    Phy32 = 224,
    Phy33 = 234,
    Phy35 = 214,
    Phy36 = 218,
}

impl PinId {
    pub fn from_raw(raw: u8) -> Result<Self, PinError> {
        PinId::try_from(raw).map_err(PinError::WrongPinId)
    }
}

/// Named resources of the board, as wired on the LED/sensor shield.
///
/// LEDs resolve to a `PinId`, buses resolve to an i2c-dev device file.
/// Asking a bus for its pin (or a LED for its bus) is a configuration error.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Id {
    Blue,
    Red,
    I2c1,
    I2c2,
}

impl Id {
    pub fn pin(self) -> Result<PinId, PinError> {
        match self {
            Id::Blue => Ok(PinId::Phy7),
            Id::Red => Ok(PinId::Phy11),
            Id::I2c1 | Id::I2c2 => Err(PinError::NotAPin(self)),
        }
    }

    pub fn bus_path(self) -> Result<&'static str, BusError> {
        match self {
            Id::I2c1 => Ok("/dev/i2c-1"),
            Id::I2c2 => Ok("/dev/i2c-2"),
            Id::Blue | Id::Red => Err(BusError::NotABus(self)),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Id::Blue => "BLUE",
            Id::Red => "RED",
            Id::I2c1 => "I2C1",
            Id::I2c2 => "I2C2",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leds_resolve_to_pins() {
        assert_eq!(Id::Blue.pin().unwrap(), PinId::Phy7);
        assert_eq!(Id::Red.pin().unwrap(), PinId::Phy11);
    }

    #[test]
    fn bus_is_not_a_pin() {
        match Id::I2c1.pin() {
            Err(PinError::NotAPin(Id::I2c1)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn led_is_not_a_bus() {
        assert!(matches!(Id::Red.bus_path(), Err(BusError::NotABus(Id::Red))));
        assert_eq!(Id::I2c2.bus_path().unwrap(), "/dev/i2c-2");
    }

    #[test]
    fn raw_identifiers_are_validated() {
        assert_eq!(PinId::from_raw(249).unwrap(), PinId::Phy7);
        assert!(matches!(PinId::from_raw(3), Err(PinError::WrongPinId(3))));
    }
}
