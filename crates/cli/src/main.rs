//! Cycle-stepped simulation harness CLI.
//!
//! This binary builds the memory layout, optionally loads a program, and runs the HTIF
//! host bridge until the target reports through `tohost`. It performs:
//! 1. **Layout:** `-m <MiB>` or `-m <base>:<size>,...`; a malformed layout is a usage error.
//! 2. **Load:** ELF (segments + `tohost` symbol) or raw image at the boot address.
//! 3. **Run:** Alternates host polling and target cycles; exits with the reported code.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cyclebench_core::common::{ConfigError, Result};
use cyclebench_core::config::{Config, MemoryLayout, parse_int_literal};
use cyclebench_core::sim::loader;
use cyclebench_core::{Harness, HtifHost};

#[derive(Parser, Debug)]
#[command(
    name = "cyclebench",
    author,
    version,
    about = "Cycle-stepped processor simulation harness",
    long_about = "Steps the pipeline one cycle at a time, yielding to the HTIF host every 100 cycles.\n\nExamples:\n  cyclebench rv64ui-p-add\n  cyclebench -m 0x80000000:0x100000 program.bin\n  cyclebench --config harness.json --trace program.elf"
)]
struct Cli {
    /// Memory layout: <MiB> (one region at 0x80000000) or <base>:<size>[,<base>:<size>...].
    #[arg(short, long, value_name = "LAYOUT")]
    memory: Option<MemoryLayout>,

    /// JSON configuration file; command-line options override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address of the HTIF tohost word (defaults to the ELF symbol, then 0x80001000).
    #[arg(long, value_name = "ADDR", value_parser = parse_address)]
    tohost: Option<u64>,

    /// Trace every consumed instruction.
    #[arg(long)]
    trace: bool,

    /// Program image (ELF or raw binary).
    program: Option<PathBuf>,
}

fn parse_address(arg: &str) -> std::result::Result<u64, ConfigError> {
    parse_int_literal(arg)
}

fn init_tracing(trace: bool) {
    let default_level = if trace { "trace" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    match run(&cli) {
        Ok(code) => {
            println!("[*] Exit code {code}");
            ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))
        }
        Err(e) => {
            tracing::error!(error = %e, "session aborted");
            eprintln!("[!] FATAL: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the harness from config and flags, loads the program and runs the HTIF host.
fn run(cli: &Cli) -> Result<u64> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    if let Some(layout) = &cli.memory {
        config.memory = layout.clone();
    }
    if cli.trace {
        config.general.trace_instructions = true;
    }

    let mut symbol = None;
    let mut harness = Harness::new(config)?;

    if let Some(path) = &cli.program {
        symbol = loader::load_program(&mut harness.port(), path)?.tohost;
    }

    // An explicit --tohost wins over the ELF symbol, which wins over the config.
    let tohost = cli
        .tohost
        .or(symbol)
        .unwrap_or(harness.config().host.tohost);
    let mut host = HtifHost::new(tohost);
    harness.run(&mut host)
}
