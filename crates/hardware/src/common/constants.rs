//! Global Harness Constants.
//!
//! This module defines the fixed values shared across the harness. It includes:
//! 1. **Memory Constants:** Page size and the conventional DRAM origin.
//! 2. **EOC Constants:** The polled completion address, marker value and warm-up threshold.
//! 3. **Host Constants:** Yield cadence and the fixed host transfer width.

/// Page size in bytes (4KB). Region bases and sizes must be multiples of this.
pub const PAGE_SIZE: u64 = 4096;

/// Mask for extracting the page offset from an address.
pub const PAGE_OFFSET_MASK: u64 = PAGE_SIZE - 1;

/// Conventional DRAM origin; base of the single region created from a bare MiB count.
pub const DRAM_BASE: u64 = 0x8000_0000;

/// Memory size in MiB used when no layout is given.
pub const DEFAULT_MEMORY_MIB: u64 = 2048;

/// Number of bits to shift to convert MiB to bytes.
pub const MIB_SHIFT: u32 = 20;

/// Address the harness writes the "done" marker to; riscv-tests place `.tohost` here.
pub const EOC_ADDRESS: u64 = 0x8000_1000;

/// Marker byte written at [`EOC_ADDRESS`].
pub const EOC_VALUE: u8 = 1;

/// The marker is written on every cycle whose counter is strictly greater than this.
pub const EOC_WARMUP_CYCLES: u64 = 40;

/// The target yields to the host on every cycle whose counter is a multiple of this.
pub const HOST_YIELD_INTERVAL: u64 = 100;

/// Width in bytes of every host `read_chunk`/`write_chunk` transfer.
pub const CHUNK_WIDTH: usize = 8;

/// Size of a standard (32-bit) instruction word in bytes.
pub const INSTRUCTION_SIZE_32: u64 = 4;
