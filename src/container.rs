//! Archive framing: fixed header followed by the frequency table.
//!
//! ```text
//! magic            4 bytes
//! original_size    4 bytes
//! compressed_size  4 bytes
//! symbol_count     4 bytes
//! padding_bits     1 byte   (reserved, always written as 0)
//! symbol_count x { symbol: 1 byte, count: 4 bytes }, ascending symbol order
//! payload
//! ```

use std::io::{ErrorKind, Read, Write};

use crate::compress::frequency::{FrequencyTable, SYMBOL_COUNT};
use crate::error::{Error, Result};
use crate::options::ByteOrder;

/// Archive magic number ("HUFF").
pub const MAGIC: u32 = 0x4855_4646;

/// Encoded size of [`FileHeader`].
pub const HEADER_LEN: usize = 17;

/// Encoded size of one frequency table entry.
pub const FREQUENCY_ENTRY_LEN: usize = 5;

/// Fixed-size archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Format identifier, [`MAGIC`] for valid archives.
    pub magic: u32,
    /// Length of the uncompressed input in bytes.
    pub original_size: u32,
    /// Length of the bit-packed payload in bytes.
    pub compressed_size: u32,
    /// Number of distinct symbols in the frequency table.
    pub symbol_count: u32,
    /// Reserved. Written as 0 and ignored on read; decoding stops on
    /// `original_size` instead.
    pub padding_bits: u8,
}

impl FileHeader {
    /// Header for `frequencies`, with the payload size still unknown.
    pub fn new(frequencies: &FrequencyTable) -> Self {
        Self {
            magic: MAGIC,
            original_size: frequencies.total() as u32,
            compressed_size: 0,
            symbol_count: frequencies.distinct() as u32,
            padding_bits: 0,
        }
    }

    /// Encode the header.
    pub fn to_bytes(&self, order: ByteOrder) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&order.u32_to_bytes(self.magic));
        out[4..8].copy_from_slice(&order.u32_to_bytes(self.original_size));
        out[8..12].copy_from_slice(&order.u32_to_bytes(self.compressed_size));
        out[12..16].copy_from_slice(&order.u32_to_bytes(self.symbol_count));
        out[16] = self.padding_bits;
        out
    }

    /// Write the header to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W, order: ByteOrder) -> Result<()> {
        writer.write_all(&self.to_bytes(order))?;
        Ok(())
    }

    /// Read and check a header.
    ///
    /// Fails with [`Error::BadMagic`] on a foreign file and [`Error::Format`]
    /// if the file is shorter than a header.
    pub fn read_from<R: Read>(reader: &mut R, order: ByteOrder) -> Result<Self> {
        let mut buf = [0u8; HEADER_LEN];
        read_exact_or(reader, &mut buf, "truncated header")?;

        let field = |at: usize| order.u32_from_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        let header = Self {
            magic: field(0),
            original_size: field(4),
            compressed_size: field(8),
            symbol_count: field(12),
            padding_bits: buf[16],
        };

        if header.magic != MAGIC {
            return Err(Error::BadMagic {
                found: header.magic,
            });
        }
        if header.symbol_count as usize > SYMBOL_COUNT {
            return Err(Error::Format(format!(
                "symbol count {} exceeds {}",
                header.symbol_count, SYMBOL_COUNT
            )));
        }
        log::trace!("reserved padding field = {}", header.padding_bits);

        Ok(header)
    }

    /// Check that `frequencies` describe the input this header claims.
    pub fn validate_against(&self, frequencies: &FrequencyTable) -> Result<()> {
        if frequencies.distinct() != self.symbol_count as usize {
            return Err(Error::Format(format!(
                "header declares {} symbols, table has {}",
                self.symbol_count,
                frequencies.distinct()
            )));
        }
        let total = frequencies.total();
        if total != self.original_size as u64 {
            return Err(Error::Format(format!(
                "frequencies sum to {} but original size is {}",
                total, self.original_size
            )));
        }
        Ok(())
    }
}

/// Write the present symbols and their counts in ascending symbol order.
pub fn write_frequencies<W: Write>(
    writer: &mut W,
    frequencies: &FrequencyTable,
    order: ByteOrder,
) -> Result<()> {
    let mut buf = Vec::with_capacity(frequencies.distinct() * FREQUENCY_ENTRY_LEN);
    for (symbol, count) in frequencies.present() {
        buf.push(symbol);
        buf.extend_from_slice(&order.u32_to_bytes(count));
    }
    writer.write_all(&buf)?;
    Ok(())
}

/// Read `symbol_count` frequency entries.
///
/// Entries must be in strictly ascending symbol order with nonzero counts,
/// which also rules out duplicates.
pub fn read_frequencies<R: Read>(
    reader: &mut R,
    symbol_count: u32,
    order: ByteOrder,
) -> Result<FrequencyTable> {
    let symbol_count = symbol_count as usize;
    if symbol_count > SYMBOL_COUNT {
        return Err(Error::Format(format!(
            "symbol count {} exceeds {}",
            symbol_count, SYMBOL_COUNT
        )));
    }

    let mut buf = vec![0u8; symbol_count * FREQUENCY_ENTRY_LEN];
    read_exact_or(reader, &mut buf, "truncated frequency table")?;

    let mut frequencies = FrequencyTable::new();
    let mut previous: Option<u8> = None;
    for entry in buf.chunks_exact(FREQUENCY_ENTRY_LEN) {
        let symbol = entry[0];
        let count = order.u32_from_bytes([entry[1], entry[2], entry[3], entry[4]]);

        if previous.is_some_and(|p| p >= symbol) {
            return Err(Error::Format(format!(
                "frequency entry for symbol {} out of order",
                symbol
            )));
        }
        if count == 0 {
            return Err(Error::Format(format!("zero count for symbol {}", symbol)));
        }

        frequencies.set(symbol, count);
        previous = Some(symbol);
    }

    Ok(frequencies)
}

fn read_exact_or<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            Error::Format(what.into())
        } else {
            Error::Io(e)
        }
    })
}
