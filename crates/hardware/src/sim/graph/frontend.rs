//! Instruction fetch frontend.
//!
//! Fetches one 32-bit word per cycle through the bus, starting at the boot address, and
//! sends it downstream. There is no decode and no control flow: the PC advances
//! sequentially by one word each cycle until reset.

use super::{ChannelTx, Component};
use crate::common::constants::INSTRUCTION_SIZE_32;
use crate::common::error::Result;
use crate::soc::interconnect::Bus;

/// An instruction word together with the address it was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchedInstruction {
    /// Fetch address.
    pub pc: u64,
    /// Raw little-endian instruction word.
    pub word: u32,
}

/// Sequential fetch stage.
#[derive(Debug)]
pub struct Frontend {
    instr: ChannelTx<FetchedInstruction>,
    boot_address: u64,
    pc: u64,
}

impl Frontend {
    /// Creates a frontend that starts fetching at `boot_address`.
    pub const fn new(instr: ChannelTx<FetchedInstruction>, boot_address: u64) -> Self {
        Self {
            instr,
            boot_address,
            pc: boot_address,
        }
    }

    /// Address of the next fetch.
    pub const fn pc(&self) -> u64 {
        self.pc
    }
}

impl Component for Frontend {
    fn name(&self) -> &str {
        "frontend"
    }

    fn update(&mut self, bus: &mut Bus) -> Result<()> {
        let word = bus.read_u32(self.pc)?;
        self.instr.push(FetchedInstruction { pc: self.pc, word });
        self.pc = self.pc.wrapping_add(INSTRUCTION_SIZE_32);
        Ok(())
    }

    fn reset(&mut self) {
        self.pc = self.boot_address;
        self.instr.clear();
    }
}
