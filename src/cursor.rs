use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;
use tracing::debug;

use crate::error::{Error, Result};

/// An immutable, randomly indexable byte range.
///
/// Backed by a read-only memory map in the common case, or by an owned
/// buffer for tests and in-memory fixtures. No writes ever go through a
/// `ByteSource`; its length is fixed for as long as any `Cursor` holds it.
pub enum ByteSource {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl ByteSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            // Mmap::map rejects zero-length mappings; an empty block-log is
            // a legitimate (if degenerate) input, so fall back to an empty
            // owned buffer rather than erroring.
            debug!(path = %path.display(), "empty block-log file, skipping mmap");
            return Ok(ByteSource::Owned(Vec::new()));
        }
        // SAFETY: the mapped file is treated as immutable for the lifetime
        // of the reader; this crate never writes through the mapping and
        // does not protect against concurrent external mutation of the
        // underlying file, matching the read-only assumption the block-log
        // format is specified under.
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(path = %path.display(), len = mmap.len(), "mapped block-log file");
        Ok(ByteSource::Mapped(mmap))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        ByteSource::Owned(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            ByteSource::Mapped(m) => &m[..],
            ByteSource::Owned(v) => &v[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `(source, offset)` pair, advanced monotonically by the codecs.
///
/// `0 <= offset <= source.len()` holds at every point the cursor is
/// observable between reads; a read that would violate it fails with
/// `Error::Truncated` and leaves the cursor's position undefined for the
/// in-flight value (callers must not reuse a cursor after a failed read).
pub struct Cursor {
    source: Arc<ByteSource>,
    offset: usize,
}

impl Cursor {
    pub fn new(source: Arc<ByteSource>) -> Self {
        Self { source, offset: 0 }
    }

    pub fn at(source: Arc<ByteSource>, offset: usize) -> Self {
        Self { source, offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.offset)
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.len()
    }

    /// Returns `n` bytes starting at the current offset without advancing.
    pub fn peek(&self, n: usize) -> Result<&[u8]> {
        let data = self.source.as_slice();
        let end = self
            .offset
            .checked_add(n)
            .filter(|&end| end <= data.len())
            .ok_or(Error::Truncated {
                offset: self.offset,
                wanted: n,
                available: data.len().saturating_sub(self.offset),
            })?;
        Ok(&data[self.offset..end])
    }

    pub fn advance(&mut self, n: usize) {
        self.offset += n;
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        let bytes = self.peek(n)?;
        self.offset += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes: [u8; 2] = self.take(2)?.try_into().unwrap();
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes: [u8; 4] = self.take(4)?.try_into().unwrap();
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes: [u8; 8] = self.take(8)?.try_into().unwrap();
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// LEB128-style varint: 7 bits per byte, high bit signals continuation.
    /// Fails with `Overflow` if the accumulator would exceed 64 bits.
    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.offset;
        let mut acc: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let byte = self.read_u8()?;
            let chunk = (byte & 0x7f) as u64;

            if shift >= 64 || (shift == 63 && chunk > 1) {
                return Err(Error::Overflow { offset: start });
            }

            acc |= chunk
                .checked_shl(shift)
                .ok_or(Error::Overflow { offset: start })?;
            shift += 7;

            if byte & 0x80 == 0 {
                return Ok(acc);
            }
        }
    }

    pub fn read_fixed_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    pub fn read_hex_fixed(&mut self, n: usize) -> Result<String> {
        Ok(hex::encode(self.read_fixed_bytes(n)?))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let offset = self.offset;
        let len = self.read_varint()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::Encoding { offset })
    }

    pub fn read_hex_dynamic(&mut self) -> Result<String> {
        let len = self.read_varint()? as usize;
        Ok(hex::encode(self.take(len)?))
    }
}
