//! Bounds-checked, random-access reads over a byte slice.
//!
//! Every read takes an absolute offset into the buffer and either returns the
//! value or a [`ReadError`]. Nothing here panics on short input.

use winnow::{
    Parser as _,
    binary::{self, Endianness},
    error::EmptyError,
    token::take,
};

use crate::error::ReadError;

/// Reads fixed-width integers, bits, and byte runs from a buffer.
#[derive(Clone, Copy, Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    endianness: Endianness,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8], endianness: Endianness) -> Self {
        Self { buf, endianness }
    }

    /// A reader for little-endian (Intel) data, like RIFF.
    pub fn little_endian(buf: &'a [u8]) -> Self {
        Self::new(buf, Endianness::Little)
    }

    /// A reader for big-endian (Motorola) data, like ICC profiles.
    pub fn big_endian(buf: &'a [u8]) -> Self {
        Self::new(buf, Endianness::Big)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8, ReadError> {
        self.read(offset, 1, binary::u8)
    }

    pub fn u16_at(&self, offset: usize) -> Result<u16, ReadError> {
        self.read(offset, 2, binary::u16(self.endianness))
    }

    /// Reads a packed 24-bit unsigned integer.
    pub fn u24_at(&self, offset: usize) -> Result<u32, ReadError> {
        self.read(offset, 3, binary::u24(self.endianness))
    }

    pub fn u32_at(&self, offset: usize) -> Result<u32, ReadError> {
        self.read(offset, 4, binary::u32(self.endianness))
    }

    pub fn i32_at(&self, offset: usize) -> Result<i32, ReadError> {
        self.read(offset, 4, binary::i32(self.endianness))
    }

    /// Reads a single bit.
    ///
    /// `index` counts bits from the start of the buffer, beginning with the
    /// most significant bit of each byte. So, bit `0` is `0x80` of byte 0 and
    /// bit `9` is `0x40` of byte 1.
    pub fn bit_at(&self, index: usize) -> Result<bool, ReadError> {
        let byte = self.u8_at(index / 8)?;
        Ok(byte & (0x80 >> (index % 8)) != 0)
    }

    /// Borrows `len` bytes starting at `offset`.
    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8], ReadError> {
        self.read(offset, len, take(len))
    }

    /// Reads a four-byte code, like a RIFF chunk id or an ICC signature.
    pub fn fourcc_at(&self, offset: usize) -> Result<[u8; 4], ReadError> {
        let mut fourcc = [0_u8; 4];
        fourcc.copy_from_slice(self.bytes_at(offset, 4)?);
        Ok(fourcc)
    }

    /// Runs `parser` on the buffer starting at `offset`.
    ///
    /// `len` is only used to describe the read if it fails.
    fn read<O>(
        &self,
        offset: usize,
        len: usize,
        mut parser: impl winnow::Parser<&'a [u8], O, EmptyError>,
    ) -> Result<O, ReadError> {
        let mut input: &'a [u8] = self.buf.get(offset..).unwrap_or_default();

        parser
            .parse_next(&mut input)
            .map_err(|_: EmptyError| ReadError::OutOfBounds {
                offset,
                len,
                available: self.buf.len(),
            })
    }
}
