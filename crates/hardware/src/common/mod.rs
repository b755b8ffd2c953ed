//! Common types and constants shared by every part of the harness.
//!
//! This module provides:
//! 1. **Constants:** Page size, DRAM origin, EOC convention and host transfer width.
//! 2. **Error Handling:** The configuration and harness fault taxonomy.

/// Common constants used throughout the harness.
pub mod constants;

/// Error types for configuration, bus, host and scheduler faults.
pub mod error;

pub use constants::{CHUNK_WIDTH, DRAM_BASE, EOC_ADDRESS, PAGE_SIZE};
pub use error::{ConfigError, HarnessError, Result};
