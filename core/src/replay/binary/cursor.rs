//! Bounds-checked cursors over fixed-size byte buffers
//!
//! Every write or read checks the remaining capacity first, so an overrun
//! surfaces as a [`CodecError`] before any byte is touched.

use byteorder::{ByteOrder, LittleEndian};

use crate::replay::error::CodecError;

/// Writer over a caller-provided buffer
pub struct ByteWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ByteWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Reserve `len` bytes and return them for writing
    fn claim(&mut self, len: usize) -> Result<&mut [u8], CodecError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(CodecError::BufferTooSmall {
                needed: len,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&mut self.buf[start..start + len])
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), CodecError> {
        self.claim(1)?[0] = v;
        Ok(())
    }

    pub fn write_u32(&mut self, v: u32) -> Result<(), CodecError> {
        LittleEndian::write_u32(self.claim(4)?, v);
        Ok(())
    }

    pub fn write_u64(&mut self, v: u64) -> Result<(), CodecError> {
        LittleEndian::write_u64(self.claim(8)?, v);
        Ok(())
    }

    pub fn write_f32(&mut self, v: f32) -> Result<(), CodecError> {
        LittleEndian::write_f32(self.claim(4)?, v);
        Ok(())
    }

    pub fn write_f64(&mut self, v: f64) -> Result<(), CodecError> {
        LittleEndian::write_f64(self.claim(8)?, v);
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.claim(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Write a `u32` length followed by the bytes.
    ///
    /// The whole field is checked up front so a failed write never leaves a
    /// dangling length prefix.
    pub fn write_prefixed(&mut self, field: &'static str, bytes: &[u8]) -> Result<(), CodecError> {
        let len = u32::try_from(bytes.len()).map_err(|_| CodecError::LengthOverflow {
            field,
            len: bytes.len(),
        })?;
        let needed = 4 + bytes.len();
        let remaining = self.remaining();
        if needed > remaining {
            return Err(CodecError::BufferTooSmall { needed, remaining });
        }
        self.write_u32(len)?;
        self.write_bytes(bytes)
    }
}

/// Reader over a borrowed buffer
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(CodecError::UnexpectedEof {
                needed: len,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..start + len])
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, CodecError> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, CodecError> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }

    /// Read a `u32` length followed by that many bytes
    pub fn read_prefixed(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.read_u32()? as usize;
        self.read_bytes(len)
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self, field: &'static str) -> Result<String, CodecError> {
        let bytes = self.read_prefixed()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8 { field })
    }
}
