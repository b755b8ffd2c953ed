//! Top-level harness: session, contexts and the target loop.
//!
//! [`Harness::run`] hands control to a [`HostBridge`]. Whenever the host goes idle it
//! switches to the target, which runs cycles until the stepper yields and then switches
//! back. The target loop never ends on its own; the session ends when the host bridge
//! returns, and any suspended target state is simply dropped.

use crate::common::error::Result;
use crate::config::Config;
use crate::host::{HostBridge, HostPort};
use crate::sim::context::DualContext;
use crate::sim::graph::{self, SimGraph};
use crate::sim::session::Session;
use crate::sim::stepper::CycleStepper;

/// A ready-to-run simulation harness.
#[derive(Debug)]
pub struct Harness {
    config: Config,
    session: Session,
    contexts: DualContext,
    stepper: CycleStepper,
}

impl Harness {
    /// Builds a harness with the default fetch/trace pipeline.
    ///
    /// # Errors
    ///
    /// Returns configuration, alignment, overlap or allocation errors.
    pub fn new(config: Config) -> Result<Self> {
        let graph = graph::default_pipeline(&config);
        Self::with_graph(config, Box::new(graph))
    }

    /// Builds a harness around a caller-supplied pipeline graph.
    ///
    /// # Errors
    ///
    /// Returns configuration, alignment, overlap or allocation errors.
    pub fn with_graph(config: Config, graph: Box<dyn SimGraph>) -> Result<Self> {
        config.validate()?;
        let session = Session::new(&config.memory, graph)?;
        tracing::info!(
            regions = session.bus().region_count(),
            bytes = config.memory.total_bytes(),
            "harness ready"
        );
        Ok(Self {
            stepper: CycleStepper::from_config(&config),
            contexts: DualContext::new(),
            session,
            config,
        })
    }

    /// Runs the host bridge until it ends the session and returns its exit code.
    ///
    /// # Errors
    ///
    /// Returns the first fault raised on either side.
    pub fn run<H: HostBridge + ?Sized>(&mut self, host: &mut H) -> Result<u64> {
        let code = host.run(&mut self.port())?;
        tracing::info!(code, cycles = self.session.cycle(), "session finished");
        Ok(code)
    }

    /// The host-side view of this harness.
    pub const fn port(&mut self) -> HostPort<'_> {
        HostPort::new(self)
    }

    /// Active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Shared simulation state.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Shared simulation state, mutably.
    pub const fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Context bookkeeping.
    pub const fn contexts(&self) -> &DualContext {
        &self.contexts
    }

    /// Switches to the target, runs it to its next yield and switches back.
    ///
    /// Returns the number of cycles the target ran.
    pub(crate) fn resume_target(&mut self) -> Result<u64> {
        self.contexts.switch_to_target()?;
        // Control returns to the host even when the target faults.
        let ran = self.stepper.run_until_yield(&mut self.session);
        self.contexts.switch_to_host()?;
        ran
    }

    /// Resets the graph and cycle counter and drops the target's pending yield.
    pub(crate) fn reset_target(&mut self) {
        self.session.reset();
        self.stepper.discard_suspension();
        tracing::info!("target reset");
    }
}
