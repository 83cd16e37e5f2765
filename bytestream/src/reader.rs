//! Byte-level reader with bounded operations.

use crate::error::{ByteError, ByteResult};

/// A forward-only cursor over a borrowed byte slice.
///
/// All multi-byte integers are read big-endian (network order). Every read is
/// bounds-checked and returns an error on failure; the reader never panics on
/// malformed input, and a failed read leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> ByteResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads an `i8`.
    pub fn read_i8(&mut self) -> ByteResult<i8> {
        Ok(i8::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self) -> ByteResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian `i16`.
    pub fn read_i16(&mut self) -> ByteResult<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32(&mut self) -> ByteResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian `i32`.
    pub fn read_i32(&mut self) -> ByteResult<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian `i64`.
    pub fn read_i64(&mut self) -> ByteResult<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian IEEE-754 single precision float.
    pub fn read_f32(&mut self) -> ByteResult<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    /// Reads exactly `len` bytes as a borrowed slice.
    pub fn read_bytes(&mut self, len: usize) -> ByteResult<&'a [u8]> {
        self.ensure(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }

    /// Reads a `u16` length prefix followed by that many bytes.
    ///
    /// On failure the cursor is rewound to the start of the prefix.
    pub fn read_prefixed_u16(&mut self) -> ByteResult<&'a [u8]> {
        let start = self.pos;
        let len = self.read_u16()?;
        self.read_bytes(usize::from(len)).map_err(|err| {
            self.pos = start;
            err
        })
    }

    /// Reads a `u32` length prefix followed by that many bytes.
    ///
    /// On failure the cursor is rewound to the start of the prefix.
    pub fn read_prefixed_u32(&mut self) -> ByteResult<&'a [u8]> {
        let start = self.pos;
        let len = self.read_u32()?;
        let result = usize::try_from(len)
            .map_err(|_| ByteError::LengthOverflow {
                offset: start,
                value: u64::from(len),
            })
            .and_then(|len| self.read_bytes(len));
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    /// Consumes and returns every remaining byte.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let start = self.pos.min(self.data.len());
        self.pos = self.data.len();
        &self.data[start..]
    }

    /// Advances the cursor by `len` bytes without reading them.
    pub fn skip(&mut self, len: usize) -> ByteResult<()> {
        self.ensure(len)?;
        self.pos += len;
        Ok(())
    }

    fn ensure(&self, len: usize) -> ByteResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(ByteError::UnexpectedEof {
                offset: self.pos,
                requested: len,
                available,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}
