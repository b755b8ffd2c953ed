//! Configuration system for the harness.
//!
//! This module defines all configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline values (DRAM origin, EOC address, yield cadence, transfer width).
//! 2. **Memory Layout:** Parsing of the memory sizing argument into page-aligned regions.
//! 3. **Structures:** Hierarchical config for memory, EOC polling, the host bridge and general options.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or use `Config::default()` for the CLI.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::constants::{MIB_SHIFT, PAGE_OFFSET_MASK};
use crate::common::error::ConfigError;

/// Default configuration constants for the harness.
///
/// These values reproduce the conventions external test programs rely on; JSON
/// configuration may override them.
mod defaults {
    use crate::common::constants;

    /// Base of the single region created from a bare MiB count.
    pub const RAM_BASE: u64 = constants::DRAM_BASE;

    /// Memory size in MiB when no layout is supplied.
    pub const RAM_MIB: u64 = constants::DEFAULT_MEMORY_MIB;

    /// Address the frontend starts fetching from.
    pub const BOOT_ADDRESS: u64 = constants::DRAM_BASE;

    /// Address the "done" marker is written to.
    pub const EOC_ADDRESS: u64 = constants::EOC_ADDRESS;

    /// Marker value.
    pub const EOC_VALUE: u8 = constants::EOC_VALUE;

    /// Cycles before the marker starts being written.
    pub const EOC_WARMUP: u64 = constants::EOC_WARMUP_CYCLES;

    /// Cycles between yields to the host.
    pub const YIELD_INTERVAL: u64 = constants::HOST_YIELD_INTERVAL;

    /// Host chunk transfer width in bytes.
    pub const CHUNK_WIDTH: usize = constants::CHUNK_WIDTH;

    /// The HTIF host polls the same word the harness writes the marker to.
    pub const TOHOST: u64 = constants::EOC_ADDRESS;
}

/// Parses an unsigned integer using C literal rules.
///
/// `0x`/`0X` selects hexadecimal, a leading `0` selects octal, anything else is
/// decimal. Signs, whitespace and trailing characters are rejected.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidInteger`] if `text` is not a complete literal or
/// does not fit in 64 bits.
///
/// # Examples
///
/// ```
/// use cyclebench_core::config::parse_int_literal;
///
/// assert_eq!(parse_int_literal("0x1000").unwrap(), 4096);
/// assert_eq!(parse_int_literal("010").unwrap(), 8);
/// assert_eq!(parse_int_literal("42").unwrap(), 42);
/// assert!(parse_int_literal("0x").is_err());
/// ```
pub fn parse_int_literal(text: &str) -> Result<u64, ConfigError> {
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ConfigError::InvalidInteger(text.to_string()));
    }
    u64::from_str_radix(digits, radix).map_err(|_| ConfigError::InvalidInteger(text.to_string()))
}

/// One requested memory region: a page-aligned base and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSpec {
    /// Physical base address.
    pub base: u64,
    /// Size in bytes.
    pub size: u64,
}

impl RegionSpec {
    /// Validates and creates a region request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Misaligned`] if either value is not a multiple of
    /// 4096, [`ConfigError::EmptyRegion`] for a zero size, and
    /// [`ConfigError::AddressOverflow`] if the region would wrap.
    pub const fn new(base: u64, size: u64) -> Result<Self, ConfigError> {
        if (base | size) & PAGE_OFFSET_MASK != 0 {
            return Err(ConfigError::Misaligned { base, size });
        }
        if size == 0 {
            return Err(ConfigError::EmptyRegion { base });
        }
        if base.checked_add(size).is_none() {
            return Err(ConfigError::AddressOverflow { base, size });
        }
        Ok(Self { base, size })
    }

    /// Exclusive end address.
    pub const fn end(&self) -> u64 {
        self.base + self.size
    }
}

/// Ordered list of regions parsed from the memory sizing argument.
///
/// Accepts either a bare MiB count (one region at the DRAM origin) or a
/// comma-separated list of `base:size` pairs.
///
/// # Examples
///
/// ```
/// use cyclebench_core::config::MemoryLayout;
///
/// let layout: MemoryLayout = "0x80000000:0x1000,0x81000000:0x2000".parse().unwrap();
/// assert_eq!(layout.regions().len(), 2);
/// assert_eq!(layout.regions()[1].size, 0x2000);
///
/// let legacy: MemoryLayout = "16".parse().unwrap();
/// assert_eq!(legacy.regions()[0].base, 0x8000_0000);
/// assert_eq!(legacy.regions()[0].size, 16 << 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct MemoryLayout {
    regions: Vec<RegionSpec>,
}

impl MemoryLayout {
    /// Builds a layout holding a single region of `mib` MiB at the DRAM origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRegion`] for zero and
    /// [`ConfigError::AddressOverflow`] if the size does not fit.
    pub fn from_mib(mib: u64) -> Result<Self, ConfigError> {
        let size = mib
            .checked_mul(1 << MIB_SHIFT)
            .ok_or(ConfigError::AddressOverflow {
                base: defaults::RAM_BASE,
                size: mib,
            })?;
        Ok(Self {
            regions: vec![RegionSpec::new(defaults::RAM_BASE, size)?],
        })
    }

    /// Regions in the order they were given.
    pub fn regions(&self) -> &[RegionSpec] {
        &self.regions
    }

    /// Sum of all region sizes in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.regions.iter().map(|r| r.size).sum()
    }

    fn parse_pair(arg: &str, pair: &str) -> Result<RegionSpec, ConfigError> {
        let malformed = || ConfigError::MalformedLayout(arg.to_string());
        let (base, size) = pair.split_once(':').ok_or_else(malformed)?;
        let base = parse_int_literal(base).map_err(|_| malformed())?;
        let size = parse_int_literal(size).map_err(|_| malformed())?;
        RegionSpec::new(base, size)
    }
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self {
            regions: vec![RegionSpec {
                base: defaults::RAM_BASE,
                size: defaults::RAM_MIB << MIB_SHIFT,
            }],
        }
    }
}

impl FromStr for MemoryLayout {
    type Err = ConfigError;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        if let Ok(mib) = parse_int_literal(arg) {
            return Self::from_mib(mib);
        }

        let regions = arg
            .split(',')
            .map(|pair| Self::parse_pair(arg, pair))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { regions })
    }
}

impl TryFrom<String> for MemoryLayout {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for MemoryLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, region) in self.regions.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{:#x}:{:#x}", region.base, region.size)?;
        }
        Ok(())
    }
}

/// Root configuration structure containing all harness settings.
///
/// # Examples
///
/// ```
/// use cyclebench_core::config::Config;
///
/// let json = r#"{
///     "memory": "0x80000000:0x10000",
///     "eoc": { "warmup_cycles": 10 },
///     "host": { "yield_interval": 50 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.memory.regions()[0].size, 0x10000);
/// assert_eq!(config.eoc.warmup_cycles, 10);
/// assert_eq!(config.eoc.address, 0x8000_1000);
/// assert_eq!(config.host.yield_interval, 50);
/// assert_eq!(config.host.chunk_width, 8);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Memory regions to map on the bus.
    pub memory: MemoryLayout,
    /// End-of-computation polling.
    pub eoc: EocConfig,
    /// Host bridge parameters.
    pub host: HostConfig,
    /// General options.
    pub general: GeneralConfig,
}

impl Config {
    /// Deserializes and validates a JSON configuration.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document does not deserialize, or any
    /// error from [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings the harness cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for a zero yield interval or a
    /// zero chunk width.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.yield_interval == 0 {
            return Err(ConfigError::InvalidSetting(
                "host.yield_interval must be non-zero".to_string(),
            ));
        }
        if self.host.chunk_width == 0 {
            return Err(ConfigError::InvalidSetting(
                "host.chunk_width must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// End-of-computation polling settings.
///
/// The marker is level-triggered: it is written on every cycle past the warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EocConfig {
    /// Address the marker is stored to.
    pub address: u64,
    /// Marker byte.
    pub value: u8,
    /// The marker is written once the cycle counter is strictly greater than this.
    pub warmup_cycles: u64,
}

impl Default for EocConfig {
    fn default() -> Self {
        Self {
            address: defaults::EOC_ADDRESS,
            value: defaults::EOC_VALUE,
            warmup_cycles: defaults::EOC_WARMUP,
        }
    }
}

/// Host bridge settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// The target yields whenever the cycle counter is a multiple of this.
    pub yield_interval: u64,
    /// Required width of host chunk transfers.
    pub chunk_width: usize,
    /// Address of the HTIF `tohost` word.
    pub tohost: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            yield_interval: defaults::YIELD_INTERVAL,
            chunk_width: defaults::CHUNK_WIDTH,
            tohost: defaults::TOHOST,
        }
    }
}

/// General harness settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// First address the frontend fetches from, and where raw images are loaded.
    pub boot_address: u64,
    /// Emit a trace event for every instruction the trace stage consumes.
    pub trace_instructions: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            boot_address: defaults::BOOT_ADDRESS,
            trace_instructions: false,
        }
    }
}
