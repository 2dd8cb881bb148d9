//! Bit-level reader for the compressed payload.

use std::io::{ErrorKind, Read};

use crate::error::Result;

/// Bit reader for MSB-first bit streams.
///
/// Pulls one byte at a time from the underlying reader; wrap files in a
/// `BufReader`.
pub struct BitReader<R: Read> {
    inner: R,
    current_byte: u8,
    bits_left: u8,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a bit reader on top of `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current_byte: 0,
            bits_left: 0,
            bytes_read: 0,
        }
    }

    /// Read the next bit, or `None` once the stream is exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.bits_left == 0 {
            match self.next_byte()? {
                Some(byte) => {
                    self.current_byte = byte;
                    self.bits_left = 8;
                }
                None => return Ok(None),
            }
        }

        self.bits_left -= 1;
        Ok(Some((self.current_byte >> self.bits_left) & 1 == 1))
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Bytes pulled from the underlying reader so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}
