//! Cycle stepper: the body of the target context.
//!
//! Every cycle runs these steps in order:
//! 1. **Advance:** Tick the pipeline graph once.
//! 2. **EOC:** Once the counter is past the warm-up, store the marker byte at the EOC
//!    address. This is level-triggered and repeats every cycle.
//! 3. **Yield:** If the counter is a multiple of the yield interval (including 0), suspend
//!    and hand control to the host.
//! 4. **Retire:** Increment the counter.
//!
//! A yield suspends the target between steps 3 and 4, so the increment of a yielding cycle
//! happens when the target is next resumed.

use crate::common::error::Result;
use crate::config::{Config, EocConfig};
use crate::sim::session::Session;

/// What the target does after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Keep running the next cycle.
    Continue,
    /// Suspend and give control to the host.
    Yield,
}

/// The target-side loop body.
#[derive(Debug, Clone)]
pub struct CycleStepper {
    eoc: EocConfig,
    yield_interval: u64,
    /// Suspended at a yield point with the cycle not yet retired.
    suspended: bool,
}

impl CycleStepper {
    /// Creates a stepper. An interval of 0 is treated as 1.
    pub fn new(eoc: EocConfig, yield_interval: u64) -> Self {
        Self {
            eoc,
            yield_interval: yield_interval.max(1),
            suspended: false,
        }
    }

    /// Creates a stepper from the `eoc` and `host` sections of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.eoc, config.host.yield_interval)
    }

    /// `true` while the target is parked at a yield point.
    pub const fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Runs one cycle.
    ///
    /// If the previous cycle yielded, its pending increment is applied first.
    ///
    /// # Errors
    ///
    /// Propagates graph faults and an unmapped EOC store.
    pub fn step(&mut self, session: &mut Session) -> Result<StepOutcome> {
        if self.suspended {
            self.suspended = false;
            session.retire_cycle();
        }

        let cycle = session.cycle();
        session.advance_graph()?;

        if cycle > self.eoc.warmup_cycles {
            session.bus_mut().write_u8(self.eoc.address, self.eoc.value)?;
        }

        if cycle % self.yield_interval == 0 {
            self.suspended = true;
            return Ok(StepOutcome::Yield);
        }

        session.retire_cycle();
        Ok(StepOutcome::Continue)
    }

    /// Runs cycles until one yields; returns how many cycles ran.
    ///
    /// # Errors
    ///
    /// Propagates the first fault from [`CycleStepper::step`].
    pub fn run_until_yield(&mut self, session: &mut Session) -> Result<u64> {
        let mut cycles = 0;
        loop {
            cycles += 1;
            if self.step(session)? == StepOutcome::Yield {
                return Ok(cycles);
            }
        }
    }

    /// Forgets a pending yield so the next step starts a fresh cycle (used on reset).
    pub const fn discard_suspension(&mut self) {
        self.suspended = false;
    }
}
