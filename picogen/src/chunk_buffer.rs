// SPDX-License-Identifier: Apache-2.0

use core::fmt::{self, Write};

use crate::gen_error::GenError;

/// Bounded output buffer with an append-with-rollback discipline.
///
/// The buffer is caller-provided and its length is the chunk capacity. Every
/// append either commits completely, advancing the write cursor, or fails and
/// rolls the cursor back to the saved index the caller captured before the
/// item started. A compound item (prefix, quotes, escaped characters) passes
/// the same saved index to each of its appends, so a partially written item
/// is never observable from outside.
pub(crate) struct ChunkBuffer<'b> {
    buf: &'b mut [u8],
    idx: usize,
}

/// Adapter that makes a byte slice usable as a `core::fmt` sink, failing when
/// the formatted text would overrun the slice.
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self.pos.checked_add(bytes.len()).ok_or(fmt::Error)?;
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

impl<'b> ChunkBuffer<'b> {
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, idx: 0 }
    }

    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn is_empty(&self) -> bool {
        self.idx == 0
    }

    pub fn clear(&mut self) {
        self.idx = 0;
    }

    /// Appends formatted text, or rolls back to `saved_idx` and reports false.
    pub fn append_fmt(&mut self, saved_idx: usize, args: fmt::Arguments<'_>) -> bool {
        let mut writer = SliceWriter {
            buf: &mut self.buf[..],
            pos: self.idx,
        };
        match writer.write_fmt(args) {
            Ok(()) => {
                self.idx = writer.pos;
                true
            }
            Err(_) => {
                self.idx = saved_idx;
                false
            }
        }
    }

    /// Appends raw bytes, or rolls back to `saved_idx` and reports false.
    pub fn append_bytes(&mut self, saved_idx: usize, bytes: &[u8]) -> bool {
        let end = match self.idx.checked_add(bytes.len()) {
            Some(end) if end <= self.buf.len() => end,
            _ => {
                self.idx = saved_idx;
                return false;
            }
        };
        self.buf[self.idx..end].copy_from_slice(bytes);
        self.idx = end;
        true
    }

    /// The committed chunk content.
    ///
    /// Rollback always restores an item boundary, so the committed bytes are
    /// a concatenation of complete UTF-8 fragments.
    pub fn as_str(&self) -> Result<&str, GenError> {
        core::str::from_utf8(&self.buf[..self.idx])
            .map_err(|_| GenError::Unexpected("chunk buffer holds invalid UTF-8"))
    }
}
