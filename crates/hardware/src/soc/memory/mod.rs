//! Simulated Memory Regions.
//!
//! This module implements the storage the bus routes to. It provides:
//! 1. **Buffer:** Lazily allocated backing storage (`DramBuffer`).
//! 2. **Region:** A fixed-size byte store addressed by region-relative offsets.
//!
//! A region does not know its base address; the bus records that when the region is
//! registered.

/// Region backing storage (mmap or heap) for raw bytes.
pub mod buffer;

use self::buffer::DramBuffer;
use crate::common::error::Result;

/// A contiguous, fixed-size addressable byte store.
#[derive(Debug)]
pub struct MemoryRegion {
    buffer: DramBuffer,
}

impl MemoryRegion {
    /// Allocates a zeroed region of `size` bytes.
    ///
    /// Page alignment is checked when the region is registered on a bus.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Allocation`](crate::common::HarnessError::Allocation)
    /// if the storage cannot be allocated.
    pub fn new(size: u64) -> Result<Self> {
        Ok(Self {
            buffer: DramBuffer::new(size)?,
        })
    }

    /// Size in bytes.
    pub const fn size(&self) -> u64 {
        self.buffer.len() as u64
    }

    /// Copies `dst.len()` bytes starting at `offset` into `dst`.
    ///
    /// Returns `false`, leaving `dst` untouched, if the range is not inside the region.
    pub fn read(&self, offset: u64, dst: &mut [u8]) -> bool {
        let Ok(offset) = usize::try_from(offset) else {
            return false;
        };
        match self.buffer.read_slice(offset, dst.len()) {
            Some(src) => {
                dst.copy_from_slice(src);
                true
            }
            None => false,
        }
    }

    /// Copies `src` into the region at `offset`.
    ///
    /// Returns `false`, writing nothing, if the range is not inside the region.
    pub fn write(&mut self, offset: u64, src: &[u8]) -> bool {
        let Ok(offset) = usize::try_from(offset) else {
            return false;
        };
        self.buffer.write_slice(offset, src)
    }

    /// Raw view of the region contents.
    pub const fn as_slice(&self) -> &[u8] {
        self.buffer.as_slice()
    }
}
