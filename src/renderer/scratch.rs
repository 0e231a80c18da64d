//! Grow-only byte buffer for turning borrowed text into C strings.

use std::ffi::CStr;

/// Reusable staging buffer owned by a [`Renderer`](super::Renderer).
///
/// The buffer only grows. Contents are valid until the next call that stages
/// into it.
#[derive(Debug, Default)]
pub struct FrameScratchBuffer {
    buf: Vec<u8>,
}

impl FrameScratchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Get a writable region of at least `len` bytes.
    ///
    /// When `len` exceeds the current capacity the old allocation is dropped
    /// and a new one of exactly `len` bytes takes its place; previous contents
    /// are not preserved.
    pub fn reserve(&mut self, len: usize) -> &mut [u8] {
        if len > self.buf.len() {
            log::debug!(
                "Scratch buffer growing from {} to {} bytes",
                self.buf.len(),
                len
            );
            self.buf = vec![0; len];
        }
        &mut self.buf[..len]
    }

    /// Copy `text` into the buffer, null-terminate it, and return it as a C
    /// string. An interior NUL byte ends the string early.
    pub fn stage_c_str(&mut self, text: &[u8]) -> &CStr {
        let len = text.len() + 1;
        let region = self.reserve(len);
        region[..text.len()].copy_from_slice(text);
        region[text.len()] = 0;
        match CStr::from_bytes_until_nul(&self.buf[..len]) {
            Ok(s) => s,
            // The terminator written above is always found.
            Err(_) => Default::default(),
        }
    }

    /// Free the allocation. The buffer can still be used afterwards and will
    /// grow again on demand.
    pub fn release(&mut self) {
        self.buf = Vec::new();
    }
}
