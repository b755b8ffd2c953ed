//! Simulation session state.
//!
//! Owns everything both contexts share: the address bus with its regions, the pipeline
//! graph and the cycle counter. It is constructed once at startup and passed explicitly
//! to the stepper and the host port; nothing lives in process-wide globals.

use std::fmt;

use crate::common::error::Result;
use crate::config::MemoryLayout;
use crate::sim::graph::SimGraph;
use crate::soc::interconnect::Bus;
use crate::soc::memory::MemoryRegion;

/// Shared simulation state.
pub struct Session {
    bus: Bus,
    graph: Box<dyn SimGraph>,
    cycle: u64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("bus", &self.bus)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Allocates every region in `layout`, maps them on a fresh bus and takes ownership of
    /// the pipeline graph.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure or any [`Bus::register`] error (overlap, alignment).
    pub fn new(layout: &MemoryLayout, graph: Box<dyn SimGraph>) -> Result<Self> {
        let mut bus = Bus::new();
        for spec in layout.regions() {
            bus.register(spec.base, MemoryRegion::new(spec.size)?)?;
        }
        Ok(Self::with_bus(bus, graph))
    }

    /// Wraps an already populated bus.
    pub fn with_bus(bus: Bus, graph: Box<dyn SimGraph>) -> Self {
        Self {
            bus,
            graph,
            cycle: 0,
        }
    }

    /// The address bus.
    pub const fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The address bus, mutably.
    pub const fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Current value of the cycle counter.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Advances the pipeline graph by one tick.
    ///
    /// # Errors
    ///
    /// Propagates any fault raised by the graph.
    pub fn advance_graph(&mut self) -> Result<()> {
        self.graph.tick(&mut self.bus)
    }

    /// Completes the current cycle.
    pub(crate) const fn retire_cycle(&mut self) {
        self.cycle += 1;
    }

    /// Resets the graph and restarts the cycle counter at 0. Memory is left as is.
    pub fn reset(&mut self) {
        self.graph.reset();
        self.cycle = 0;
    }
}
