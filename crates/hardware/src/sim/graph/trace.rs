//! Instruction trace consumer.
//!
//! Drains at most one fetched instruction per cycle and, when tracing is enabled, emits a
//! `trace` event with its address and raw word.

use super::{ChannelRx, Component, FetchedInstruction};
use crate::common::error::Result;
use crate::soc::interconnect::Bus;

/// Terminal stage of the default pipeline.
#[derive(Debug)]
pub struct TraceConsumer {
    input: ChannelRx<FetchedInstruction>,
    trace_instructions: bool,
    consumed: u64,
    last: Option<FetchedInstruction>,
}

impl TraceConsumer {
    /// Creates a consumer reading from `input`.
    pub const fn new(input: ChannelRx<FetchedInstruction>, trace_instructions: bool) -> Self {
        Self {
            input,
            trace_instructions,
            consumed: 0,
            last: None,
        }
    }

    /// Instructions consumed since construction or the last reset.
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Most recently consumed instruction.
    pub const fn last(&self) -> Option<FetchedInstruction> {
        self.last
    }
}

impl Component for TraceConsumer {
    fn name(&self) -> &str {
        "trace"
    }

    fn update(&mut self, _bus: &mut Bus) -> Result<()> {
        if let Some(instr) = self.input.pop() {
            if self.trace_instructions {
                tracing::trace!(
                    pc = format_args!("{:#018x}", instr.pc),
                    word = format_args!("{:#010x}", instr.word),
                    "consumed"
                );
            }
            self.consumed += 1;
            self.last = Some(instr);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.input.clear();
        self.consumed = 0;
        self.last = None;
    }
}
