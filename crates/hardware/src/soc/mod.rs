//! System-on-Chip Components.
//!
//! This module organizes the simulated machine's address space: the bus that routes
//! accesses and the memory regions behind it.

/// System bus interconnect and routing.
pub mod interconnect;

/// Memory region storage.
pub mod memory;

pub use interconnect::Bus;
pub use memory::MemoryRegion;
