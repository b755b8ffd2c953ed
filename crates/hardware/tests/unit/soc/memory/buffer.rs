//! DRAM Buffer Unit Tests.
//!
//! Verifies allocation, slice-level read/write and boundary checks.

use cyclebench_core::common::HarnessError;
use cyclebench_core::soc::memory::buffer::DramBuffer;

// ══════════════════════════════════════════════════════════
// 1. Allocation and size
// ══════════════════════════════════════════════════════════

#[test]
fn buffer_allocation_size() {
    let buf = DramBuffer::new(4096).unwrap();
    assert_eq!(buf.len(), 4096);
    assert!(!buf.is_empty());
}

#[test]
fn buffer_initial_zeroed() {
    let buf = DramBuffer::new(8192).unwrap();
    assert!(buf.as_slice().iter().all(|&b| b == 0));
}

#[test]
fn buffer_zero_size_is_rejected() {
    let err = DramBuffer::new(0).unwrap_err();
    assert!(matches!(err, HarnessError::Allocation { size: 0 }));
}

// ══════════════════════════════════════════════════════════
// 2. Slice read/write
// ══════════════════════════════════════════════════════════

#[test]
fn buffer_write_slice_read_slice() {
    let mut buf = DramBuffer::new(256).unwrap();
    let data = [0xDE, 0xAD, 0xBE, 0xEF];
    assert!(buf.write_slice(10, &data));
    assert_eq!(buf.read_slice(10, 4), Some(&data[..]));
}

#[test]
fn buffer_as_mut_slice_is_visible() {
    let mut buf = DramBuffer::new(256).unwrap();
    buf.as_mut_slice()[255] = 0xCD;
    assert_eq!(buf.read_slice(255, 1), Some(&[0xCD][..]));
}

// ══════════════════════════════════════════════════════════
// 3. Bounds
// ══════════════════════════════════════════════════════════

#[test]
fn buffer_read_past_end() {
    let buf = DramBuffer::new(256).unwrap();
    assert!(buf.read_slice(250, 8).is_none());
    assert!(buf.read_slice(usize::MAX, 2).is_none());
}

#[test]
fn buffer_write_past_end_writes_nothing() {
    let mut buf = DramBuffer::new(256).unwrap();
    assert!(!buf.write_slice(254, &[1, 2, 3, 4]));
    assert_eq!(buf.read_slice(254, 2), Some(&[0, 0][..]));
}
