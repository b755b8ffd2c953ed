//! System interconnect (bus) for simulated memory access.
//!
//! This module implements the bus that routes physical address accesses to memory regions.
//! It provides:
//! 1. **Region registration:** Regions are added at a base address, checked for alignment
//!    and overlap, and kept sorted for lookup.
//! 2. **Access routing:** `load`/`store` by address; an access must fall entirely inside one
//!    region or it faults without touching any storage.
//! 3. **Typed helpers:** Little-endian byte, word and doubleword accessors and binary loading.
//!
//! Both the target pipeline and the host bridge reach simulated memory only through this
//! type. It never suspends, so it is safe to use from either execution context.

use crate::common::error::{ConfigError, HarnessError, Result};
use crate::config::RegionSpec;
use crate::soc::memory::MemoryRegion;

/// A region together with the base address it is mapped at.
#[derive(Debug)]
struct Mapping {
    base: u64,
    region: MemoryRegion,
}

impl Mapping {
    const fn end(&self) -> u64 {
        self.base + self.region.size()
    }

    /// Region-relative offset of `[addr, addr + len)` if the mapping holds all of it.
    fn offset_of(&self, addr: u64, len: usize) -> Option<u64> {
        let offset = addr.checked_sub(self.base)?;
        let size = self.region.size();
        let last = offset.checked_add(len as u64)?;
        (offset < size && last <= size).then_some(offset)
    }
}

/// Address bus; owns every mapped region and routes accesses by address.
#[derive(Debug, Default)]
pub struct Bus {
    /// Mappings sorted by base address; never overlapping.
    mappings: Vec<Mapping>,
}

impl Bus {
    /// Creates an empty bus; add regions with [`Bus::register`].
    pub const fn new() -> Self {
        Self {
            mappings: Vec::new(),
        }
    }

    /// Maps `region` at `base`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] (wrapped in [`HarnessError::Configuration`]) if the
    /// base or size is not page aligned, the region wraps the address space, or it
    /// overlaps an existing mapping.
    pub fn register(&mut self, base: u64, region: MemoryRegion) -> Result<()> {
        let size = region.size();
        let spec = RegionSpec::new(base, size)?;

        if let Some(existing) = self
            .mappings
            .iter()
            .find(|m| spec.base < m.end() && m.base < spec.end())
        {
            return Err(ConfigError::Overlap {
                base,
                size,
                existing: existing.base,
            }
            .into());
        }

        tracing::info!(
            base = format_args!("{base:#x}"),
            size = format_args!("{size:#x}"),
            "mapped memory region"
        );
        self.mappings.push(Mapping { base, region });
        self.mappings.sort_by_key(|m| m.base);
        Ok(())
    }

    fn find_mapping(&self, addr: u64, len: usize) -> Option<(usize, u64)> {
        let idx = self.mappings.partition_point(|m| m.base <= addr).checked_sub(1)?;
        let offset = self.mappings[idx].offset_of(addr, len)?;
        Some((idx, offset))
    }

    /// Copies `dst.len()` bytes starting at `addr` into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if no single region holds the whole
    /// range; `dst` is left untouched.
    pub fn load(&self, addr: u64, dst: &mut [u8]) -> Result<()> {
        let unmapped = HarnessError::UnmappedAccess {
            addr,
            len: dst.len(),
        };
        let Some((idx, offset)) = self.find_mapping(addr, dst.len()) else {
            return Err(unmapped);
        };
        if self.mappings[idx].region.read(offset, dst) {
            Ok(())
        } else {
            Err(unmapped)
        }
    }

    /// Copies `src` into simulated memory starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if no single region holds the whole
    /// range; no byte is written.
    pub fn store(&mut self, addr: u64, src: &[u8]) -> Result<()> {
        let unmapped = HarnessError::UnmappedAccess {
            addr,
            len: src.len(),
        };
        let Some((idx, offset)) = self.find_mapping(addr, src.len()) else {
            return Err(unmapped);
        };
        if self.mappings[idx].region.write(offset, src) {
            Ok(())
        } else {
            Err(unmapped)
        }
    }

    /// Writes a binary blob into memory at `addr`.
    ///
    /// # Errors
    ///
    /// Same as [`Bus::store`].
    pub fn load_binary_at(&mut self, data: &[u8], addr: u64) -> Result<()> {
        self.store(addr, data)
    }

    /// Returns whether `addr` is backed by some region.
    pub fn is_valid_address(&self, addr: u64) -> bool {
        self.find_mapping(addr, 0).is_some()
    }

    /// `(base, size)` of every mapping in address order.
    pub fn regions(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.mappings.iter().map(|m| (m.base, m.region.size()))
    }

    /// Number of mapped regions.
    pub fn region_count(&self) -> usize {
        self.mappings.len()
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if `addr` is not mapped.
    pub fn read_u8(&self, addr: u64) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.load(addr, &mut buf)?;
        Ok(buf[0])
    }

    /// Reads four bytes (little-endian).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if the word is not inside one region.
    pub fn read_u32(&self, addr: u64) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.load(addr, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Reads eight bytes (little-endian).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if the doubleword is not inside one region.
    pub fn read_u64(&self, addr: u64) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.load(addr, &mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if `addr` is not mapped.
    pub fn write_u8(&mut self, addr: u64, val: u8) -> Result<()> {
        self.store(addr, &[val])
    }

    /// Writes four bytes (little-endian).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if the word is not inside one region.
    pub fn write_u32(&mut self, addr: u64, val: u32) -> Result<()> {
        self.store(addr, &val.to_le_bytes())
    }

    /// Writes eight bytes (little-endian).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if the doubleword is not inside one region.
    pub fn write_u64(&mut self, addr: u64, val: u64) -> Result<()> {
        self.store(addr, &val.to_le_bytes())
    }
}
