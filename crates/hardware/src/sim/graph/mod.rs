//! Pipeline component graph.
//!
//! The harness only needs two things from the pipeline: advance it by one tick and reset
//! it. [`SimGraph`] is that contract; any engine that satisfies it can be plugged into a
//! [`Harness`](crate::sim::harness::Harness).
//!
//! This module also provides a small dataflow engine satisfying the contract:
//! 1. **Channels:** Unbounded single-threaded FIFOs connecting producers to consumers.
//! 2. **Components:** Units updated once per tick, in the order they were added.
//! 3. **Builder:** Assembles channels and components into a [`Simulation`].
//! 4. **Default pipeline:** A fetch frontend feeding an instruction trace stage.

/// Instruction fetch frontend.
pub mod frontend;

/// Instruction trace consumer.
pub mod trace;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::common::error::Result;
use crate::config::Config;
use crate::soc::interconnect::Bus;

pub use frontend::{FetchedInstruction, Frontend};
pub use trace::TraceConsumer;

/// The boundary between the harness core and the pipeline engine.
pub trait SimGraph {
    /// Advances every component by exactly one cycle.
    ///
    /// # Errors
    ///
    /// Propagates any fault a component raises, typically an unmapped bus access.
    fn tick(&mut self, bus: &mut Bus) -> Result<()>;

    /// Returns every component to its initial state.
    fn reset(&mut self);
}

/// A unit of the pipeline that is updated once per tick.
pub trait Component {
    /// Short name for diagnostics (e.g., `"frontend"`).
    fn name(&self) -> &str;

    /// Performs this component's work for one cycle.
    ///
    /// # Errors
    ///
    /// Returns any fault raised while accessing simulated memory.
    fn update(&mut self, bus: &mut Bus) -> Result<()>;

    /// Returns the component to its initial state.
    fn reset(&mut self);
}

type Queue<T> = Rc<RefCell<VecDeque<T>>>;

/// Sending half of a channel.
#[derive(Debug)]
pub struct ChannelTx<T> {
    queue: Queue<T>,
}

impl<T> ChannelTx<T> {
    /// Enqueues a value for the consumer.
    pub fn push(&self, value: T) {
        self.queue.borrow_mut().push_back(value);
    }

    /// Drops everything still in flight.
    pub fn clear(&self) {
        self.queue.borrow_mut().clear();
    }
}

/// Receiving half of a channel.
#[derive(Debug)]
pub struct ChannelRx<T> {
    queue: Queue<T>,
}

impl<T> ChannelRx<T> {
    /// Dequeues the oldest value, if any.
    pub fn pop(&self) -> Option<T> {
        self.queue.borrow_mut().pop_front()
    }

    /// Number of values waiting.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// `true` when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Drops everything still in flight.
    pub fn clear(&self) {
        self.queue.borrow_mut().clear();
    }
}

/// Assembles components and the channels between them.
#[derive(Default)]
pub struct GraphBuilder {
    components: Vec<Box<dyn Component>>,
}

impl fmt::Debug for GraphBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("components", &component_names(&self.components))
            .finish()
    }
}

impl GraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a connected channel pair.
    pub fn make_channel<T>(&mut self) -> (ChannelTx<T>, ChannelRx<T>) {
        let queue: Queue<T> = Rc::new(RefCell::new(VecDeque::new()));
        (
            ChannelTx {
                queue: Rc::clone(&queue),
            },
            ChannelRx { queue },
        )
    }

    /// Appends a component; components update in insertion order.
    pub fn add_component<C: Component + 'static>(&mut self, component: C) {
        self.components.push(Box::new(component));
    }

    /// Finishes the graph.
    pub fn build(self) -> Simulation {
        Simulation {
            components: self.components,
            ticks: 0,
        }
    }
}

/// A built component graph.
pub struct Simulation {
    components: Vec<Box<dyn Component>>,
    ticks: u64,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("components", &component_names(&self.components))
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl Simulation {
    /// Ticks performed since construction or the last reset.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of components in the graph.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

impl SimGraph for Simulation {
    fn tick(&mut self, bus: &mut Bus) -> Result<()> {
        for component in &mut self.components {
            component.update(bus)?;
        }
        self.ticks += 1;
        Ok(())
    }

    fn reset(&mut self) {
        for component in &mut self.components {
            component.reset();
        }
        self.ticks = 0;
    }
}

fn component_names(components: &[Box<dyn Component>]) -> Vec<&str> {
    components.iter().map(|c| c.name()).collect()
}

/// Builds the default pipeline: a fetch frontend at the boot address feeding a trace stage.
pub fn default_pipeline(config: &Config) -> Simulation {
    let mut builder = GraphBuilder::new();
    let (tx, rx) = builder.make_channel::<FetchedInstruction>();
    builder.add_component(Frontend::new(tx, config.general.boot_address));
    builder.add_component(TraceConsumer::new(rx, config.general.trace_instructions));
    builder.build()
}
