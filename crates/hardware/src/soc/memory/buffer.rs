//! Region Buffer Implementation.
//!
//! This module provides a safe wrapper around raw memory allocation for region storage.
//! It uses `mmap` on Unix systems so that large layouts (the default is 2 GiB) are only
//! backed by host pages once they are touched, and falls back to a zeroed heap
//! allocation elsewhere.

use std::ptr::NonNull;
use std::slice;

use crate::common::error::{HarnessError, Result};

/// Zero-initialized, fixed-size byte storage for one memory region.
///
/// On Unix systems this is an anonymous private mapping, which the OS populates
/// lazily. The buffer is uniquely owned; reads borrow it shared and writes borrow it
/// exclusively.
#[derive(Debug)]
pub struct DramBuffer {
    ptr: NonNull<u8>,
    size: usize,
}

// SAFETY: the mapping is exclusively owned by this value and is never aliased
// outside the borrows handed out by `as_slice`/`as_mut_slice`.
unsafe impl Send for DramBuffer {}

impl DramBuffer {
    /// Allocates a zeroed buffer of `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Allocation`] if `size` is zero, does not fit in
    /// `usize`, or the host refuses the mapping.
    pub fn new(size: u64) -> Result<Self> {
        let Ok(len) = usize::try_from(size) else {
            return Err(HarnessError::Allocation { size });
        };
        if len == 0 {
            return Err(HarnessError::Allocation { size });
        }

        #[cfg(unix)]
        {
            // SAFETY: anonymous private mapping with no fixed address; the result is
            // checked against MAP_FAILED before use.
            let raw = unsafe {
                libc::mmap(
                    std::ptr::null_mut(),
                    len,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };
            if raw == libc::MAP_FAILED {
                return Err(HarnessError::Allocation { size });
            }
            let ptr = NonNull::new(raw.cast::<u8>()).ok_or(HarnessError::Allocation { size })?;
            Ok(Self { ptr, size: len })
        }

        #[cfg(not(unix))]
        {
            let boxed = vec![0u8; len].into_boxed_slice();
            let raw = Box::into_raw(boxed).cast::<u8>();
            let ptr = NonNull::new(raw).ok_or(HarnessError::Allocation { size })?;
            Ok(Self { ptr, size: len })
        }
    }

    /// Returns the size of the buffer in bytes.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Always `false`; zero-sized buffers are rejected at construction.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Views the whole buffer.
    pub const fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` points to `size` initialized bytes for the lifetime of `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    /// Views the whole buffer mutably.
    pub const fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }

    /// Returns `len` bytes starting at `offset`, or `None` if the range is out of bounds.
    pub fn read_slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.as_slice().get(offset..end)
    }

    /// Copies `data` in at `offset`; returns `false` without writing if it does not fit.
    pub fn write_slice(&mut self, offset: usize, data: &[u8]) -> bool {
        let Some(end) = offset.checked_add(data.len()) else {
            return false;
        };
        match self.as_mut_slice().get_mut(offset..end) {
            Some(dst) => {
                dst.copy_from_slice(data);
                true
            }
            None => false,
        }
    }
}

impl Drop for DramBuffer {
    fn drop(&mut self) {
        #[cfg(unix)]
        // SAFETY: `ptr`/`size` describe the mapping created in `new`, unmapped exactly once.
        unsafe {
            let _ = libc::munmap(self.ptr.as_ptr().cast(), self.size);
        }

        #[cfg(not(unix))]
        // SAFETY: `ptr`/`size` came from `Box::into_raw` on a boxed slice of this length.
        unsafe {
            drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.size,
            )));
        }
    }
}
