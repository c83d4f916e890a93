//! Bounds-checked big-endian reader over an in-memory byte slice.
//!
//! Every read checks the remaining length first and reports a shortfall as
//! [`DecodeError::Truncated`], so callers never index past the end.

use bytes::Buf;

use crate::error::DecodeError;

/// Forward-only cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Start reading at `offset`. An offset past the end leaves nothing to read.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset.min(data.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fail with [`DecodeError::Truncated`] unless `needed` bytes remain.
    pub fn require(&self, needed: usize) -> Result<(), DecodeError> {
        if self.remaining() < needed {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn window(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.require(2)?;
        let value = self.window().get_u16();
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.require(4)?;
        let value = self.window().get_u32();
        self.pos += 4;
        Ok(value)
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.require(8)?;
        let value = self.window().get_i64();
        self.pos += 8;
        Ok(value)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.require(len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.require(len)?;
        self.pos += len;
        Ok(())
    }

    /// Read a u16-length-prefixed UTF-8 string (Java `writeUTF` framing).
    pub fn read_utf(&mut self) -> Result<String, DecodeError> {
        self.read_str().map(str::to_owned)
    }

    /// Skip a u16-length-prefixed string. The contents are still checked
    /// for UTF-8 so skipping and reading reject the same inputs.
    pub fn skip_utf(&mut self) -> Result<(), DecodeError> {
        self.read_str().map(drop)
    }

    fn read_str(&mut self) -> Result<&'a str, DecodeError> {
        let start = self.pos;
        let len = self.read_u16()? as usize;
        let raw = self.read_bytes(len)?;
        std::str::from_utf8(raw)
            .map_err(|e| DecodeError::corrupt(start, format!("invalid UTF-8 string: {e}")))
    }
}
