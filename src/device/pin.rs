use super::error::PinError;
use super::memory::Memory;
use crate::pin_map::PinId;
use byteorder::{ByteOrder, NativeEndian};
use derive_try_from_primitive::TryFromPrimitive;
use embedded_hal::digital::v2 as eh;
use std::convert::Infallible;
use std::mem::size_of;
use std::ops::{Not, RangeInclusive};

/// Enum representing the driven state of an output pin.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum Value {
    High = 1,
    Low = 0,
}

impl Not for Value {
    type Output = Value;

    fn not(self) -> Self::Output {
        match self {
            Value::High => Value::Low,
            Value::Low => Value::High,
        }
    }
}

/* In ODROID-C2 GPIO registers are mapped in three different parts of the contiguous memory (DV / Y / X banks).
 * Internal pin identifiers fall into exactly one bank, and the pin's bit inside every register of that bank
 * is its distance from the start of the bank range.
 */
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Bank {
    DV,
    Y,
    X,
}

impl Bank {
    const PIN_BASE: u8 = 136;
    const DV_PINS: RangeInclusive<u8> = (Self::PIN_BASE + 45)..=(Self::PIN_BASE + 74);
    const Y_PINS: RangeInclusive<u8> = (Self::PIN_BASE + 75)..=(Self::PIN_BASE + 91);
    const X_PINS: RangeInclusive<u8> = (Self::PIN_BASE + 92)..=(Self::PIN_BASE + 114);

    fn of(pin_u8: u8) -> Option<Self> {
        [Bank::DV, Bank::Y, Bank::X]
            .iter()
            .copied()
            .find(|bank| bank.pins().contains(&pin_u8))
    }

    fn pins(self) -> RangeInclusive<u8> {
        match self {
            Bank::DV => Self::DV_PINS,
            Bank::Y => Self::Y_PINS,
            Bank::X => Self::X_PINS,
        }
    }

    /// Function select register. A cleared bit enables the output driver.
    fn function_select(self) -> usize {
        Self::word(match self {
            Bank::DV => 0x10C,
            Bank::Y => 0x10F,
            Bank::X => 0x118,
        })
    }

    /// Output latch. A set bit drives the line high.
    fn output_set(self) -> usize {
        Self::word(match self {
            Bank::DV => 0x10D,
            Bank::Y => 0x110,
            Bank::X => 0x119,
        })
    }

    fn word(index: usize) -> usize {
        index * size_of::<u32>()
    }
}

#[derive(Copy, Clone, Debug)]
struct PinRegisters {
    pin_id: PinId,
    bank: Bank,
    mask: u32,
}

impl PinRegisters {
    fn new(pin_id: PinId) -> Result<Self, PinError> {
        let pin_u8 = pin_id as u8;
        let bank = Bank::of(pin_u8).ok_or(PinError::WrongPinId(pin_u8))?;
        let mask = 1 << (pin_u8 - bank.pins().start());

        Ok(Self { pin_id, bank, mask })
    }
}

/// GPIO pin leased for output.
///
/// This is obtainable through `output_pin` methods of `Device`. A pin can only be leased once at a time,
/// so a live `OutputPin` is the only writer of its line. Dropping it returns the lease.
///
/// Reads and writes go straight to the mapped registers. The handle is not thread-safe.
#[derive(Debug)]
pub struct OutputPin<'memory> {
    memory: &'memory Memory,
    registers: PinRegisters,
}

impl<'memory> OutputPin<'memory> {
    /// Leases `pin_id` and turns it into an output driven low.
    ///
    /// The latch is cleared before the output driver is enabled, so the line never glitches to a stale level.
    pub(super) fn lease(pin_id: PinId, memory: &'memory Memory) -> Result<Self, PinError> {
        let registers = PinRegisters::new(pin_id)?;
        memory.lease_output(pin_id)?;

        let mut pin = Self { memory, registers };
        pin.set_value(Value::Low);
        let fsel = pin.read_register(registers.bank.function_select());
        pin.write_register(registers.bank.function_select(), fsel & !registers.mask);

        Ok(pin)
    }

    /// Board identifier this pin was leased for.
    pub fn id(&self) -> PinId {
        self.registers.pin_id
    }

    /// Value currently driven on the line, read back from the output latch.
    pub fn value(&self) -> Value {
        if self.read_register(self.registers.bank.output_set()) & self.registers.mask == 0 {
            Value::Low
        } else {
            Value::High
        }
    }

    /// Drives the line to `value`.
    pub fn set_value(&mut self, value: Value) {
        let offset = self.registers.bank.output_set();
        let latch = self.read_register(offset);

        let latch = match value {
            Value::High => latch | self.registers.mask,
            Value::Low => latch & !self.registers.mask,
        };
        self.write_register(offset, latch);
    }

    /// Drives the line to the opposite of its current value.
    pub fn toggle(&mut self) {
        let next = !self.value();
        self.set_value(next);
    }

    fn read_register(&self, offset: usize) -> u32 {
        let register = self.memory.register(offset);
        // SAFETY: `Memory::register` hands out in-bounds pointers into the live mapping.
        NativeEndian::read_u32(unsafe { register.as_ref() })
    }

    fn write_register(&mut self, offset: usize, value: u32) {
        let mut register = self.memory.register(offset);
        // SAFETY: as in `read_register`; leases guarantee this pin has no other writer.
        NativeEndian::write_u32(unsafe { register.as_mut() }, value);
    }
}

impl<'memory> Drop for OutputPin<'memory> {
    fn drop(&mut self) {
        self.memory.release_output(self.registers.pin_id);
    }
}

impl<'memory> eh::OutputPin for OutputPin<'memory> {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_value(Value::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_value(Value::High);
        Ok(())
    }
}

impl<'memory> eh::StatefulOutputPin for OutputPin<'memory> {
    fn is_set_high(&self) -> Result<bool, Infallible> {
        Ok(self.value() == Value::High)
    }

    fn is_set_low(&self) -> Result<bool, Infallible> {
        self.is_set_high().map(|v| !v)
    }
}

impl<'memory> eh::toggleable::Default for OutputPin<'memory> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn value_negation() {
        assert_eq!(!Value::High, Value::Low);
        assert_eq!(!!Value::Low, Value::Low);
        assert_eq!(Value::try_from(1), Ok(Value::High));
    }

    #[test]
    fn banks_cover_board_pins() {
        assert_eq!(Bank::of(PinId::Phy7 as u8), Some(Bank::X));
        assert_eq!(Bank::of(PinId::Phy27 as u8), Some(Bank::DV));
        assert_eq!(Bank::of(PinId::Phy31 as u8), Some(Bank::Y));
        assert_eq!(Bank::of(136), None);
    }

    #[test]
    fn pin_mask_is_offset_within_bank() {
        let registers = PinRegisters::new(PinId::Phy7).unwrap();
        assert_eq!(registers.bank, Bank::X);
        assert_eq!(registers.mask, 1 << (249 - 228));
    }
}
