//! Host-Target Interface (HTIF) host bridge.
//!
//! Implements the host side of the `tohost` convention used by riscv-tests and other
//! bare-metal test suites. The host polls the 8-byte `tohost` word through chunk reads
//! and lets the target run whenever it is zero. A non-zero value is cleared and decoded:
//!
//! * `1`: test passed (exit code 0).
//! * Odd and not 1: test failed; the failing test number is `value >> 1`.
//! * Even: a device command or proxied syscall, which this host does not implement.
//!
//! The host refuses to run unless the port's chunk width matches the 8-byte word.
//!
//! The harness itself stores `1` into the low byte of this word on every cycle past the
//! warm-up, so a program that never reports still ends the session.

use super::{HostBridge, HostPort};
use crate::common::error::{ConfigError, HarnessError, Result};

const TOHOST_BYTES: usize = 8;

/// HTIF host: polls `tohost` and resumes the target while it is idle.
#[derive(Debug, Clone)]
pub struct HtifHost {
    tohost: u64,
    polls: u64,
}

impl HtifHost {
    /// Creates a host polling the `tohost` word at `tohost`.
    pub const fn new(tohost: u64) -> Self {
        Self { tohost, polls: 0 }
    }

    /// Address being polled.
    pub const fn tohost(&self) -> u64 {
        self.tohost
    }

    /// Number of times the target was resumed.
    pub const fn polls(&self) -> u64 {
        self.polls
    }

    fn handle_tohost(value: u64) -> Result<u64> {
        if value == 1 {
            // Pass
            Ok(0)
        } else if value & 1 != 0 {
            let test_num = value >> 1;
            tracing::warn!(test_num, tohost = format_args!("{value:#x}"), "HTIF FAIL");
            Ok(test_num)
        } else {
            Err(HarnessError::HostProtocol { value })
        }
    }
}

impl HostBridge for HtifHost {
    fn run(&mut self, port: &mut HostPort<'_>) -> Result<u64> {
        if port.chunk_width() != TOHOST_BYTES {
            return Err(ConfigError::InvalidSetting(format!(
                "host.chunk_width must be {TOHOST_BYTES} for the HTIF host, got {}",
                port.chunk_width()
            ))
            .into());
        }
        port.reset_target();

        let mut word = [0u8; TOHOST_BYTES];
        loop {
            port.read_chunk(self.tohost, &mut word)?;
            let value = u64::from_le_bytes(word);
            if value == 0 {
                port.idle()?;
                self.polls += 1;
                continue;
            }

            port.write_chunk(self.tohost, &[0u8; TOHOST_BYTES])?;
            return Self::handle_tohost(value);
        }
    }
}
