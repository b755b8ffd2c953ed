//! Hand-assembled ELF64 images for loader tests.

const EHDR_SIZE: usize = 64;
const PHDR_SIZE: usize = 56;
const SHDR_SIZE: usize = 64;
const SYM_SIZE: usize = 24;

const EM_RISCV: u16 = 243;
const ET_EXEC: u16 = 2;
const PT_LOAD: u32 = 1;
const SHT_SYMTAB: u32 = 2;
const SHT_STRTAB: u32 = 3;
const SHN_ABS: u16 = 0xfff1;

const STRTAB: &[u8] = b"\0tohost\0";
const SHSTRTAB: &[u8] = b"\0.symtab\0.strtab\0.shstrtab\0";

fn align8(n: usize) -> usize {
    (n + 7) & !7
}

fn pad_to(out: &mut Vec<u8>, len: usize) {
    out.resize(len, 0);
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

#[allow(clippy::too_many_arguments)]
fn put_shdr(
    out: &mut Vec<u8>,
    name: u32,
    kind: u32,
    offset: usize,
    size: usize,
    link: u32,
    info: u32,
    align: u64,
    entsize: u64,
) {
    put_u32(out, name);
    put_u32(out, kind);
    put_u64(out, 0); // flags
    put_u64(out, 0); // addr
    put_u64(out, offset as u64);
    put_u64(out, size as u64);
    put_u32(out, link);
    put_u32(out, info);
    put_u64(out, align);
    put_u64(out, entsize);
}

/// Little-endian RV64 executable with one `PT_LOAD` segment holding `code` at
/// `load_addr`, entry at `load_addr`, and optionally an absolute `tohost` symbol.
pub fn minimal_elf(load_addr: u64, code: &[u8], tohost: Option<u64>) -> Vec<u8> {
    minimal_elf_at(load_addr, load_addr, code, tohost)
}

/// Like [`minimal_elf`], but with separate virtual and physical segment
/// addresses. The entry point is `vaddr`.
pub fn minimal_elf_at(vaddr: u64, paddr: u64, code: &[u8], tohost: Option<u64>) -> Vec<u8> {
    let code_off = EHDR_SIZE + PHDR_SIZE;
    let after_code = align8(code_off + code.len());

    let strtab_off = after_code;
    let shstrtab_off = strtab_off + STRTAB.len();
    let symtab_off = align8(shstrtab_off + SHSTRTAB.len());
    let shoff = symtab_off + 2 * SYM_SIZE;
    let (shoff_field, shnum, shstrndx) = if tohost.is_some() {
        (shoff as u64, 4, 3)
    } else {
        (0, 0, 0)
    };

    let mut out = Vec::new();

    // ELF header
    out.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
    pad_to(&mut out, 16);
    put_u16(&mut out, ET_EXEC);
    put_u16(&mut out, EM_RISCV);
    put_u32(&mut out, 1);
    put_u64(&mut out, vaddr);
    put_u64(&mut out, EHDR_SIZE as u64);
    put_u64(&mut out, shoff_field);
    put_u32(&mut out, 0);
    put_u16(&mut out, EHDR_SIZE as u16);
    put_u16(&mut out, PHDR_SIZE as u16);
    put_u16(&mut out, 1);
    put_u16(&mut out, SHDR_SIZE as u16);
    put_u16(&mut out, shnum);
    put_u16(&mut out, shstrndx);

    // Program header
    put_u32(&mut out, PT_LOAD);
    put_u32(&mut out, 5); // R+X
    put_u64(&mut out, code_off as u64);
    put_u64(&mut out, vaddr);
    put_u64(&mut out, paddr);
    put_u64(&mut out, code.len() as u64);
    put_u64(&mut out, code.len() as u64);
    put_u64(&mut out, 4);

    out.extend_from_slice(code);
    pad_to(&mut out, after_code);

    let Some(tohost) = tohost else {
        return out;
    };

    out.extend_from_slice(STRTAB);
    out.extend_from_slice(SHSTRTAB);
    pad_to(&mut out, symtab_off);

    // Null symbol, then `tohost`.
    out.extend_from_slice(&[0; SYM_SIZE]);
    put_u32(&mut out, 1);
    out.push(0x11); // STB_GLOBAL | STT_OBJECT
    out.push(0);
    put_u16(&mut out, SHN_ABS);
    put_u64(&mut out, tohost);
    put_u64(&mut out, 8);

    out.extend_from_slice(&[0; SHDR_SIZE]);
    put_shdr(&mut out, 1, SHT_SYMTAB, symtab_off, 2 * SYM_SIZE, 2, 1, 8, SYM_SIZE as u64);
    put_shdr(&mut out, 9, SHT_STRTAB, strtab_off, STRTAB.len(), 0, 0, 1, 0);
    put_shdr(&mut out, 17, SHT_STRTAB, shstrtab_off, SHSTRTAB.len(), 0, 0, 1, 0);
    out
}
