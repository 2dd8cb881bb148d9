//! Bit-level output for the compressed payload.

use std::io::{self, Write};

use crate::compress::huffman::HuffmanCode;

/// A bit writer that packs bits MSB first into an underlying writer.
///
/// Whole bytes are passed on as soon as they fill up, so wrap unbuffered
/// sinks such as files in a `BufWriter`.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    current_byte: u8,
    bit_count: u8,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a bit writer on top of `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            current_byte: 0,
            bit_count: 0,
            bytes_written: 0,
        }
    }

    /// Append one bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.current_byte = (self.current_byte << 1) | bit as u8;
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.emit()?;
        }
        Ok(())
    }

    /// Append every bit of `code`, first bit first.
    #[inline]
    pub fn write_code(&mut self, code: &HuffmanCode) -> io::Result<()> {
        for bit in code.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    #[inline]
    fn emit(&mut self) -> io::Result<()> {
        self.inner.write_all(&[self.current_byte])?;
        self.bytes_written += 1;
        self.current_byte = 0;
        self.bit_count = 0;
        Ok(())
    }

    /// Write out a partial byte, left-aligned and padded with zero bits.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.bit_count > 0 {
            self.current_byte <<= 8 - self.bit_count;
            self.emit()?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn finish(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.inner)
    }

    /// Bytes handed to the underlying writer so far.
    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Bits waiting for the current byte to fill (0-7).
    #[inline]
    pub fn pending_bits(&self) -> u8 {
        self.bit_count
    }
}
