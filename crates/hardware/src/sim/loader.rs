//! Program loader.
//!
//! Places a program into target memory through the host port before the session starts:
//! 1. **ELF images:** Every loadable segment's file bytes are written at its physical
//!    address; the entry point and the `tohost` symbol (if any) are reported.
//! 2. **Raw images:** Anything else is written verbatim at the configured boot address.

use std::fs;
use std::path::Path;

use object::elf::{FileHeader32, FileHeader64, PT_LOAD};
use object::read::elf::{FileHeader, ProgramHeader};
use object::{Endianness, Object, ObjectSymbol};

use crate::common::error::{HarnessError, Result};
use crate::host::HostPort;

const ELF_MAGIC: &[u8] = b"\x7fELF";

/// Image formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// ELF executable.
    Elf,
    /// Flat binary.
    Raw,
}

/// What was placed in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedProgram {
    /// Detected format.
    pub format: ImageFormat,
    /// Entry point (the load address for raw images).
    pub entry: u64,
    /// Address of the `tohost` symbol, if the image defines one.
    pub tohost: Option<u64>,
    /// Bytes written into target memory.
    pub bytes: u64,
}

/// Reads a program file from disk.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if the file cannot be read.
pub fn load_binary(path: &Path) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}

/// Reads `path` and loads it into target memory.
///
/// # Errors
///
/// Returns I/O, parse or unmapped-access errors.
pub fn load_program(port: &mut HostPort<'_>, path: &Path) -> Result<LoadedProgram> {
    let data = load_binary(path)?;
    let program = load_image(port, &data)?;
    tracing::info!(
        path = %path.display(),
        format = ?program.format,
        entry = format_args!("{:#x}", program.entry),
        bytes = program.bytes,
        "program loaded"
    );
    Ok(program)
}

/// Loads an in-memory image, detecting ELF by its magic number.
///
/// # Errors
///
/// Returns [`HarnessError::Load`] for a malformed ELF and
/// [`HarnessError::UnmappedAccess`] if any byte lands outside mapped memory.
pub fn load_image(port: &mut HostPort<'_>, data: &[u8]) -> Result<LoadedProgram> {
    if data.starts_with(ELF_MAGIC) {
        return load_elf(port, data);
    }

    let entry = port.config().general.boot_address;
    port.write_memory(entry, data)?;
    Ok(LoadedProgram {
        format: ImageFormat::Raw,
        entry,
        tohost: None,
        bytes: data.len() as u64,
    })
}

fn load_elf(port: &mut HostPort<'_>, data: &[u8]) -> Result<LoadedProgram> {
    let file = object::File::parse(data).map_err(|e| HarnessError::Load(e.to_string()))?;

    let segments = if file.is_64() {
        loadable_segments::<FileHeader64<Endianness>>(data)?
    } else {
        loadable_segments::<FileHeader32<Endianness>>(data)?
    };

    let mut bytes = 0;
    for (paddr, contents) in segments {
        port.write_memory(paddr, contents)?;
        bytes += contents.len() as u64;
    }

    let tohost = file
        .symbols()
        .find(|sym| sym.name().is_ok_and(|name| name == "tohost"))
        .map(|sym| sym.address());

    Ok(LoadedProgram {
        format: ImageFormat::Elf,
        entry: file.entry(),
        tohost,
        bytes,
    })
}

/// `PT_LOAD` segments with file bytes, keyed by physical address.
fn loadable_segments<Elf: FileHeader<Endian = Endianness>>(
    data: &[u8],
) -> Result<Vec<(u64, &[u8])>> {
    let header = Elf::parse(data).map_err(|e| HarnessError::Load(e.to_string()))?;
    let endian = header
        .endian()
        .map_err(|e| HarnessError::Load(e.to_string()))?;
    let headers = header
        .program_headers(endian, data)
        .map_err(|e| HarnessError::Load(e.to_string()))?;

    let mut segments = Vec::new();
    for ph in headers {
        if ph.p_type(endian) != PT_LOAD {
            continue;
        }
        let contents = ph
            .data(endian, data)
            .map_err(|()| HarnessError::Load("segment data out of bounds".to_owned()))?;
        if contents.is_empty() {
            continue;
        }
        segments.push((ph.p_paddr(endian).into(), contents));
    }
    Ok(segments)
}
