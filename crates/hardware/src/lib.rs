//! Cycle-stepped processor simulation harness.
//!
//! This crate steps a modeled processor pipeline one cycle at a time and exposes the
//! modeled machine's memory to an external host protocol. It provides:
//! 1. **SoC:** An address bus routing loads and stores to page-aligned memory regions.
//! 2. **Simulation:** Host/target context alternation, the cycle stepper with
//!    end-of-computation polling, the shared session and a small pipeline graph engine.
//! 3. **Host:** The host port and an HTIF `tohost` polling bridge.
//! 4. **Configuration:** Memory layout parsing and JSON configuration.

/// Common types and constants (page size, EOC convention, errors).
pub mod common;
/// Harness configuration (defaults, memory layout, hierarchical config structures).
pub mod config;
/// Host bridge interface and the HTIF host.
pub mod host;
/// Contexts, stepper, session, pipeline graph, loader and harness.
pub mod sim;
/// Address bus and memory regions.
pub mod soc;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Host protocol interface and its handle on the harness.
pub use crate::host::{HostBridge, HostPort, HtifHost};
/// Top-level harness; construct with `Harness::new`.
pub use crate::sim::Harness;
/// Address bus.
pub use crate::soc::Bus;
