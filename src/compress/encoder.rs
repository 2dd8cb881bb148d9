//! Payload encoding: input bytes to bit-packed Huffman codes.

use std::io::{ErrorKind, Read, Write};

use super::huffman::CodeTable;
use crate::bits::BitWriter;
use crate::error::Result;

const READ_CHUNK: usize = 64 * 1024;

/// Counters from one encoding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Bytes consumed from the input.
    pub input_bytes: u64,
    /// Payload bytes written, including the padded final byte.
    pub payload_bytes: u64,
    /// Input bytes dropped because the table had no code for them.
    pub skipped: u64,
}

/// Encode everything `reader` yields with `codes` and write the payload.
///
/// A byte without a code means the table was built from different data;
/// it is logged and skipped rather than aborting the whole run.
pub fn encode<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    codes: &CodeTable,
) -> Result<EncodeSummary> {
    let mut bits = BitWriter::new(writer);
    let mut summary = EncodeSummary::default();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        for &byte in &buf[..n] {
            match codes.get(byte) {
                Some(code) => bits.write_code(code)?,
                None => {
                    log::error!("no code for byte {:#04x}, skipping", byte);
                    summary.skipped += 1;
                }
            }
        }
        summary.input_bytes += n as u64;
    }

    let padding = (8 - bits.pending_bits()) % 8;
    bits.flush()?;
    summary.payload_bytes = bits.bytes_written();
    log::trace!(
        "payload {} bytes, last byte padded with {} zero bits",
        summary.payload_bytes,
        padding
    );
    Ok(summary)
}
