//! Bounds-checked little-endian readers.
//!
//! [`ByteCursor`] walks a seekable stream sequentially and can fetch records at
//! absolute offsets without moving its own position. [`Section`] is a borrowed
//! view over an already-read block (the LinkInfo body) addressed purely by
//! offset. Every read is checked against the available length before any bytes
//! are touched, so a crafted size or offset fails with [`Error::OutOfBounds`]
//! instead of over-reading or over-allocating.

use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Seek, SeekFrom};

/// Fixed-width little-endian value that can be decoded from raw bytes
pub trait Scalar: Copy {
    /// Width in bytes
    const SIZE: usize;

    /// Decode from exactly `SIZE` little-endian bytes
    fn from_le(bytes: &[u8]) -> Self;
}

impl Scalar for u8 {
    const SIZE: usize = 1;

    fn from_le(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl Scalar for u16 {
    const SIZE: usize = 2;

    fn from_le(bytes: &[u8]) -> Self {
        LittleEndian::read_u16(bytes)
    }
}

impl Scalar for u32 {
    const SIZE: usize = 4;

    fn from_le(bytes: &[u8]) -> Self {
        LittleEndian::read_u32(bytes)
    }
}

impl Scalar for i32 {
    const SIZE: usize = 4;

    fn from_le(bytes: &[u8]) -> Self {
        LittleEndian::read_i32(bytes)
    }
}

impl Scalar for u64 {
    const SIZE: usize = 8;

    fn from_le(bytes: &[u8]) -> Self {
        LittleEndian::read_u64(bytes)
    }
}

/// Sequential reader over a caller-owned seekable byte source
pub struct ByteCursor<R> {
    inner: R,
    pos: u64,
    len: u64,
}

impl<R: Read + Seek> ByteCursor<R> {
    /// Wrap a stream, measuring its length and rewinding it to the start
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, pos: 0, len })
    }

    /// Current absolute position
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Total length of the underlying source
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left between the position and the end of the source
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    /// Move back to the start of the source
    pub fn rewind(&mut self) -> Result<()> {
        self.seek_to(0)
    }

    /// Seek to an absolute position inside the source
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        if offset > self.len {
            return Err(Error::OutOfBounds {
                offset,
                size: 0,
                available: self.len,
            });
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }

    /// Give the wrapped source back
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn check(&self, offset: u64, size: u64) -> Result<()> {
        match offset.checked_add(size) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(Error::OutOfBounds {
                offset,
                size,
                available: self.len,
            }),
        }
    }

    /// Read one scalar at the position and advance past it
    pub fn read_scalar<T: Scalar>(&mut self) -> Result<T> {
        self.check(self.pos, T::SIZE as u64)?;
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf[..T::SIZE])?;
        self.pos += T::SIZE as u64;
        Ok(T::from_le(&buf[..T::SIZE]))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_scalar()
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_scalar()
    }

    /// Read `n` bytes and advance past them
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.check(self.pos, n as u64)?;
        let mut data = vec![0u8; n];
        self.inner.read_exact(&mut data)?;
        self.pos += n as u64;
        Ok(data)
    }

    /// Read a fixed-size array and advance past it
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.check(self.pos, N as u64)?;
        let mut data = [0u8; N];
        self.inner.read_exact(&mut data)?;
        self.pos += N as u64;
        Ok(data)
    }

    /// Skip `n` bytes
    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.check(self.pos, n)?;
        self.seek_to(self.pos + n)
    }

    /// Read `size` bytes at an absolute offset; the position is left unchanged
    pub fn read_struct_at(&mut self, offset: u64, size: usize) -> Result<Vec<u8>> {
        self.check(offset, size as u64)?;
        let saved = self.pos;
        self.inner.seek(SeekFrom::Start(offset))?;
        let mut data = vec![0u8; size];
        let read = self.inner.read_exact(&mut data);
        self.inner.seek(SeekFrom::Start(saved))?;
        read?;
        Ok(data)
    }
}

/// Offset-addressed view over a block that has already been read
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    data: &'a [u8],
}

impl<'a> Section<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn out_of_bounds(&self, offset: usize, size: usize) -> Error {
        Error::OutOfBounds {
            offset: offset as u64,
            size: size as u64,
            available: self.data.len() as u64,
        }
    }

    /// Borrow `size` bytes starting at `offset`
    pub fn bytes_at(&self, offset: usize, size: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(size)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| self.out_of_bounds(offset, size))
    }

    /// Read one scalar at `offset`
    pub fn read_scalar_at<T: Scalar>(&self, offset: usize) -> Result<T> {
        self.bytes_at(offset, T::SIZE).map(T::from_le)
    }

    pub fn read_u32_at(&self, offset: usize) -> Result<u32> {
        self.read_scalar_at(offset)
    }

    /// Bytes of a NUL-terminated 8-bit string at `offset`, without the terminator
    pub fn cstr_at(&self, offset: usize) -> Result<&'a [u8]> {
        let tail = self
            .data
            .get(offset..)
            .ok_or_else(|| self.out_of_bounds(offset, 1))?;
        let end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.out_of_bounds(offset, tail.len() + 1))?;
        Ok(&tail[..end])
    }

    /// Code units of a NUL-terminated UTF-16LE string at `offset`, without the terminator
    pub fn utf16z_at(&self, offset: usize) -> Result<Vec<u16>> {
        let tail = self
            .data
            .get(offset..)
            .ok_or_else(|| self.out_of_bounds(offset, 2))?;
        let mut units = Vec::new();
        for pair in tail.chunks_exact(2) {
            let unit = LittleEndian::read_u16(pair);
            if unit == 0 {
                return Ok(units);
            }
            units.push(unit);
        }
        Err(self.out_of_bounds(offset, tail.len() + 2))
    }
}
