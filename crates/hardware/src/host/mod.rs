//! Host bridge interface.
//!
//! The host side of the harness is an external debug/monitor protocol. The core gives it a
//! [`HostPort`] exposing exactly what it may do synchronously:
//! 1. **Memory:** Arbitrary-length reads/writes and fixed-width chunk transfers, all
//!    serviced by the address bus.
//! 2. **Reset:** Return the target to its initial state.
//! 3. **Idle:** Hand control to the target until it next yields.
//!
//! A [`HostBridge`] owns the host control loop and decides when to call each of these.

/// HTIF `tohost` polling bridge.
pub mod htif;

use crate::common::error::{HarnessError, Result};
use crate::config::Config;
use crate::sim::harness::Harness;

pub use htif::HtifHost;

/// An external host protocol driving the harness.
pub trait HostBridge {
    /// Runs the host control loop until the session ends and returns the exit code.
    ///
    /// # Errors
    ///
    /// Returns any fault raised by the port or by the target while it ran.
    fn run(&mut self, port: &mut HostPort<'_>) -> Result<u64>;
}

/// The host's handle on a running harness.
#[derive(Debug)]
pub struct HostPort<'a> {
    harness: &'a mut Harness,
}

impl<'a> HostPort<'a> {
    pub(crate) const fn new(harness: &'a mut Harness) -> Self {
        Self { harness }
    }

    /// Reads `len` bytes of target memory.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if the range is not inside one region.
    pub fn read_memory(&self, addr: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.harness.session().bus().load(addr, &mut buf)?;
        Ok(buf)
    }

    /// Writes `data` into target memory.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnmappedAccess`] if the range is not inside one region.
    pub fn write_memory(&mut self, addr: u64, data: &[u8]) -> Result<()> {
        self.harness.session_mut().bus_mut().store(addr, data)
    }

    /// Reads one transfer unit into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::PreconditionViolation`] unless `dst` is exactly
    /// [`chunk_width`](Self::chunk_width) bytes, or an unmapped-access fault.
    pub fn read_chunk(&self, addr: u64, dst: &mut [u8]) -> Result<()> {
        self.check_chunk(addr, dst.len())?;
        self.harness.session().bus().load(addr, dst)
    }

    /// Writes one transfer unit from `src`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::PreconditionViolation`] unless `src` is exactly
    /// [`chunk_width`](Self::chunk_width) bytes, or an unmapped-access fault.
    pub fn write_chunk(&mut self, addr: u64, src: &[u8]) -> Result<()> {
        self.check_chunk(addr, src.len())?;
        self.harness.session_mut().bus_mut().store(addr, src)
    }

    /// Resets the pipeline graph and restarts the cycle counter at 0.
    pub fn reset_target(&mut self) {
        self.harness.reset_target();
    }

    /// Runs the target until it next yields, then returns to the caller.
    ///
    /// # Errors
    ///
    /// Returns any fault raised by the target while it ran.
    pub fn idle(&mut self) -> Result<()> {
        let cycles = self.harness.resume_target()?;
        tracing::trace!(cycles, cycle = self.cycle(), "target yielded");
        Ok(())
    }

    /// Current cycle counter.
    pub const fn cycle(&self) -> u64 {
        self.harness.session().cycle()
    }

    /// Required width of chunk transfers.
    pub const fn chunk_width(&self) -> usize {
        self.harness.config().host.chunk_width
    }

    /// Active configuration.
    pub const fn config(&self) -> &Config {
        self.harness.config()
    }

    fn check_chunk(&self, addr: u64, len: usize) -> Result<()> {
        let expected = self.chunk_width();
        if len == expected {
            Ok(())
        } else {
            Err(HarnessError::PreconditionViolation {
                addr,
                len,
                expected,
            })
        }
    }
}
