//! Simulation core.
//!
//! Provides the host/target context bookkeeping, the cycle stepper, the shared session
//! state, the pipeline graph engine, program loading and the top-level harness.

/// Host/target execution contexts and strict alternation.
pub mod context;

/// Pipeline component graph and the default pipeline.
pub mod graph;

/// Top-level harness tying session, contexts and stepper together.
pub mod harness;

/// ELF and raw image loading through the host port.
pub mod loader;

/// Shared simulation state (bus, graph, cycle counter).
pub mod session;

/// Per-cycle target loop body.
pub mod stepper;

pub use harness::Harness;
pub use session::Session;
pub use stepper::{CycleStepper, StepOutcome};
