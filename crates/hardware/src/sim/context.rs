//! Host/target execution contexts.
//!
//! Two cooperative control flows share one thread: the host (debug/monitor protocol) and
//! the target (cycle-stepped simulation). Exactly one is running at any time. A context
//! only gives up the processor by switching explicitly, and switches must alternate: the
//! host may only switch to the target, the target only back to the host.
//!
//! The target's suspension point is not a separate stack; the
//! [`CycleStepper`](super::stepper::CycleStepper) records where it stopped and the
//! [`Harness`](super::harness::Harness) resumes it from there.

use std::fmt;

use crate::common::error::{HarnessError, Result};

/// One of the two execution contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// The external debug/monitor session driving the simulation.
    Host,
    /// The simulated machine's cycle-by-cycle execution.
    Target,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => f.write_str("host"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Tracks which context owns the processor and enforces strict alternation.
///
/// Starts with the host running, since the calling flow owns control at startup.
#[derive(Debug, Clone)]
pub struct DualContext {
    active: Context,
    switches: u64,
}

impl Default for DualContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DualContext {
    /// Creates the pair with the host running.
    pub const fn new() -> Self {
        Self {
            active: Context::Host,
            switches: 0,
        }
    }

    /// Context currently holding the processor.
    pub const fn active(&self) -> Context {
        self.active
    }

    /// Total number of switches performed in either direction.
    pub const fn switch_count(&self) -> u64 {
        self.switches
    }

    /// Hands the processor from the host to the target.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::SchedulerMisuse`] if the target is already running.
    pub fn switch_to_target(&mut self) -> Result<()> {
        self.transfer(Context::Target)
    }

    /// Hands the processor from the target back to the host.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::SchedulerMisuse`] if the host is already running.
    pub fn switch_to_host(&mut self) -> Result<()> {
        self.transfer(Context::Host)
    }

    fn transfer(&mut self, requested: Context) -> Result<()> {
        if self.active == requested {
            tracing::error!(%requested, "context switch issued from the wrong context");
            return Err(HarnessError::SchedulerMisuse {
                requested,
                active: self.active,
            });
        }
        tracing::debug!(from = %self.active, to = %requested, "context switch");
        self.active = requested;
        self.switches += 1;
        Ok(())
    }
}
