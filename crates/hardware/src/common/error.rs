//! Harness fault taxonomy.
//!
//! This module defines every failure the harness can report. It provides:
//! 1. **Configuration Errors:** Malformed memory layouts and invalid settings.
//! 2. **Harness Errors:** Unmapped bus accesses, host precondition violations and
//!    scheduler misuse.
//!
//! None of these are recoverable. The binary prints the diagnostic and exits with a
//! non-zero status on the first one it sees.

use thiserror::Error;

use crate::sim::context::Context;

/// Faults raised while building the memory layout or validating configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The memory argument is neither a MiB count nor a `base:size` list.
    #[error("malformed memory layout '{0}': expected <MiB> or <base>:<size>[,<base>:<size>...]")]
    MalformedLayout(String),

    /// A number did not parse as a C integer literal.
    #[error("invalid integer literal '{0}'")]
    InvalidInteger(String),

    /// Base or size is not a multiple of the page size.
    #[error("region {base:#x}+{size:#x} is not aligned to 4096 bytes")]
    Misaligned {
        /// Requested base address.
        base: u64,
        /// Requested size in bytes.
        size: u64,
    },

    /// A region of zero bytes was requested.
    #[error("region at {base:#x} has zero size")]
    EmptyRegion {
        /// Requested base address.
        base: u64,
    },

    /// `base + size` does not fit in the 64-bit address space.
    #[error("region {base:#x}+{size:#x} wraps the address space")]
    AddressOverflow {
        /// Requested base address.
        base: u64,
        /// Requested size in bytes.
        size: u64,
    },

    /// The new region intersects one that is already mapped.
    #[error("region {base:#x}+{size:#x} overlaps the region mapped at {existing:#x}")]
    Overlap {
        /// Requested base address.
        base: u64,
        /// Requested size in bytes.
        size: u64,
        /// Base of the mapping it collides with.
        existing: u64,
    },

    /// A configuration field holds a value the harness cannot run with.
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    /// The JSON configuration could not be deserialized.
    #[error("invalid configuration: {0}")]
    Json(String),
}

/// Top-level error type for the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Layout or configuration fault.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// No single region fully contains the accessed range.
    #[error("unmapped access: {len} bytes at {addr:#x}")]
    UnmappedAccess {
        /// First byte of the access.
        addr: u64,
        /// Access length in bytes.
        len: usize,
    },

    /// A host chunk transfer used a width other than the fixed transfer unit.
    #[error("host chunk transfer of {len} bytes at {addr:#x}; transfers must be exactly {expected} bytes")]
    PreconditionViolation {
        /// Transfer address.
        addr: u64,
        /// Width that was requested.
        len: usize,
        /// The fixed transfer width.
        expected: usize,
    },

    /// A context switch was issued from the wrong context.
    #[error("switch to {requested} issued while {active} is already running")]
    SchedulerMisuse {
        /// Context the caller tried to switch to.
        requested: Context,
        /// Context that was running at the time.
        active: Context,
    },

    /// Backing storage for a region could not be allocated.
    #[error("failed to allocate {size} bytes of region storage")]
    Allocation {
        /// Requested size in bytes.
        size: u64,
    },

    /// The target posted a `tohost` command this host does not implement.
    #[error("unsupported tohost command {value:#x}")]
    HostProtocol {
        /// Raw `tohost` word.
        value: u64,
    },

    /// A program image could not be parsed.
    #[error("failed to load program: {0}")]
    Load(String),

    /// Filesystem failure while reading a program or configuration.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the harness.
pub type Result<T, E = HarnessError> = std::result::Result<T, E>;
