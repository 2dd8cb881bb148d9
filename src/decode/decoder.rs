//! Payload decoding by walking the Huffman tree bit by bit.

use std::io::{Read, Write};

use super::bit_reader::BitReader;
use crate::compress::huffman::HuffmanTree;
use crate::error::{Error, Result};

const WRITE_CHUNK: usize = 64 * 1024;

/// Decode up to `original_size` symbols from the payload in `reader`.
///
/// Stops at `original_size` symbols or at the end of the payload,
/// whichever comes first, and returns the number of bytes written. The
/// zero padding after the last code is never interpreted because the
/// symbol count runs out first.
pub fn decode<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    tree: &HuffmanTree,
    original_size: u64,
) -> Result<u64> {
    let root = tree.root();
    let mut bits = BitReader::new(reader);
    let mut node = root;
    let mut decoded = 0u64;
    let mut out = Vec::with_capacity(WRITE_CHUNK.min(original_size as usize));

    while decoded < original_size {
        let Some(bit) = bits.read_bit()? else {
            break;
        };

        node = node.child(bit).ok_or(Error::StreamDesync { decoded })?;

        if let Some(symbol) = node.symbol() {
            out.push(symbol);
            decoded += 1;
            node = root;

            if out.len() == WRITE_CHUNK {
                writer.write_all(&out)?;
                out.clear();
            }
        }
    }
    writer.write_all(&out)?;

    log::trace!("decoded {} bytes from {} payload bytes", decoded, bits.bytes_read());
    if decoded < original_size {
        log::warn!(
            "payload ended after {} of {} bytes",
            decoded,
            original_size
        );
    }
    Ok(decoded)
}
