use memmap::{MmapMut, MmapOptions};
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use std::convert::AsRef;
use std::fs::File;
use std::path::Path;
use tracing::info;

pub mod error;
mod memory;
mod pin;

use crate::pin_map::{Id, PinId};
use error::{DeviceError, PinError};
use memory::Memory;

pub use pin::{OutputPin, Value};

/// The main abstraction for Odroid C2's device.
///
/// This struct owns the memory mapping needed to access GPIO-related registers. It also owns the file handle for device files provided by your operating system.
/// Output pins borrow the device, so it has to outlive every pin leased from it.
///
/// **Keep in mind that currently only revision 2 of Odroid C2 is supported by this crate.**
#[derive(Debug)]
pub struct Device {
    _file_handle: Option<File>,
    memory: Memory,
}

impl Device {
    const GPIO_BASE_ADDR: u64 = 0xC8834000;
    const BLOCK_SIZE: usize = 4096;

    /// Instantiates new device, opening and memory-mapping an appropriate device file.
    ///
    /// This constructor can fail - if you have no access to device file or memory mapping will fail.
    /// Follow [rootless GPIO access](https://wiki.odroid.com/troubleshooting/gpiomem) article on ODroid wiki if you want to create a device without being a superuser.
    pub fn new() -> Result<Self, DeviceError> {
        use nix::unistd::Uid;

        let device_path = if Uid::current().is_root() {
            "/dev/mem"
        } else {
            "/dev/gpiomem"
        };
        let (file_handle, map) = Self::load_device_file(device_path)?;
        info!(device_path, "mapped gpio registers");

        Ok(Self {
            _file_handle: Some(file_handle),
            memory: Memory::new(map),
        })
    }

    /// Lease a physical GPIO pin, ready for writing.
    ///
    /// Fails if the pin is already leased - every line has at most one `OutputPin` at a time.
    pub fn output_pin(&self, pin_id: PinId) -> Result<OutputPin<'_>, PinError> {
        OutputPin::lease(pin_id, &self.memory)
    }

    /// Lease the pin behind a named board resource.
    pub fn output_pin_for(&self, id: Id) -> Result<OutputPin<'_>, PinError> {
        self.output_pin(id.pin()?)
    }

    /// Lease a pin given by its raw internal identifier.
    pub fn output_pin_raw(&self, raw: u8) -> Result<OutputPin<'_>, PinError> {
        self.output_pin(PinId::from_raw(raw)?)
    }

    /// Whether a live `OutputPin` currently holds `pin_id`.
    pub fn is_leased(&self, pin_id: PinId) -> bool {
        self.memory.is_leased(pin_id)
    }

    fn load_device_file<T: AsRef<Path>>(device_path: T) -> Result<(File, MmapMut), DeviceError> {
        use std::os::unix::io::FromRawFd;
        use DeviceError::*;

        let mut open_flags = OFlag::empty();
        open_flags.insert(OFlag::O_RDWR);
        open_flags.insert(OFlag::O_SYNC);
        open_flags.insert(OFlag::O_CLOEXEC);

        let file_fd =
            open(device_path.as_ref(), open_flags, Mode::empty()).map_err(|source| DeviceAccessFailed {
                path: device_path.as_ref().display().to_string(),
                source,
            })?;

        // SAFETY: Validity of file_fd is checked by Nix.
        let handle = unsafe { File::from_raw_fd(file_fd) };

        let mut map_opts = MmapOptions::new();
        map_opts.offset(Self::GPIO_BASE_ADDR);
        map_opts.len(Self::BLOCK_SIZE);

        // SAFETY: File handle is valid at this point.
        let map = unsafe { map_opts.map_mut(&handle).map_err(MemoryMapFailed)? };

        Ok((handle, map))
    }

    /// Device backed by zeroed anonymous memory instead of the register block.
    #[cfg(test)]
    pub(crate) fn anonymous() -> Self {
        let map = MmapOptions::new()
            .len(Self::BLOCK_SIZE)
            .map_anon()
            .expect("anonymous mapping");

        Self {
            _file_handle: None,
            memory: Memory::new(map),
        }
    }
}
