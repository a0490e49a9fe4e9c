use memmap::MmapMut;
use tracing::debug;

use super::error::PinError;
use crate::pin_map::PinId;
use std::collections::HashSet;
use std::mem::size_of;
use std::ptr::{self, NonNull};
use std::sync::{Mutex, PoisonError};

/// Mapped GPIO register block together with the table of pins currently leased for output.
///
/// Registers are only ever reached through the raw `base` pointer taken once from the mapping,
/// so no shared slice of the mapping is alive while pins write to it.
#[derive(Debug)]
pub struct Memory {
    _map: MmapMut,
    base: NonNull<u8>,
    len: usize,
    output_leases: Mutex<HashSet<PinId>>,
}

impl Memory {
    pub fn new(mut map: MmapMut) -> Self {
        let len = map.len();
        let base = NonNull::from(&mut map[..]).cast::<u8>();

        Self {
            _map: map,
            base,
            len,
            output_leases: Mutex::new(HashSet::with_capacity(40)),
        }
    }

    /// Pointer to one 32-bit register at `offset` bytes from the start of the block.
    pub fn register(&self, offset: usize) -> NonNull<[u8]> {
        debug_assert!(offset + size_of::<u32>() <= self.len, "register offset out of mapped block");

        // SAFETY: register offsets are constants of the bank table, all inside the 4 KiB block.
        unsafe {
            let ptr = self.base.as_ptr().add(offset);
            NonNull::new_unchecked(ptr::slice_from_raw_parts_mut(ptr, size_of::<u32>()))
        }
    }

    pub fn lease_output(&self, pin_id: PinId) -> Result<(), PinError> {
        let mut leases = self
            .output_leases
            .lock()
            .map_err(|_| PinError::LeaseMapPoisoned)?;

        if leases.insert(pin_id) {
            debug!(?pin_id, "leased output pin");
            Ok(())
        } else {
            Err(PinError::AlreadyLeased(pin_id))
        }
    }

    pub fn release_output(&self, pin_id: PinId) {
        // Called from `Drop`, so a poisoned table is still cleaned up.
        let mut leases = self
            .output_leases
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if leases.remove(&pin_id) {
            debug!(?pin_id, "released output pin");
        }
    }

    pub fn is_leased(&self, pin_id: PinId) -> bool {
        self.output_leases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&pin_id)
    }
}
