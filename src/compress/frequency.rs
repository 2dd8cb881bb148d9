//! Byte frequency counting.

use std::io::{ErrorKind, Read};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Number of distinct symbols in the byte alphabet.
pub const SYMBOL_COUNT: usize = 256;

/// Read chunk size for counting from a stream.
const READ_CHUNK: usize = 64 * 1024;

/// Inputs at least this large are split across threads.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 1 << 20;

/// Occurrence count of every byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// Create a table with all counts zero.
    pub fn new() -> Self {
        Self {
            counts: [0; SYMBOL_COUNT],
        }
    }

    /// Count every byte of `data`.
    ///
    /// Fails with [`Error::InputTooLarge`] when `data` cannot be described
    /// by a 32-bit original size.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        check_len(data.len() as u64)?;

        #[cfg(feature = "parallel")]
        {
            if data.len() >= PARALLEL_THRESHOLD {
                return Ok(Self {
                    counts: count_parallel(data),
                });
            }
        }

        let mut table = Self::new();
        table.add(data);
        Ok(table)
    }

    /// Count every byte produced by `reader` until end of stream.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut table = Self::new();
        let mut buf = vec![0u8; READ_CHUNK];
        let mut total = 0u64;

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            total += n as u64;
            check_len(total)?;
            table.add(&buf[..n]);
        }

        Ok(table)
    }

    fn add(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    /// Count recorded for `symbol`.
    #[inline]
    pub fn count(&self, symbol: u8) -> u32 {
        self.counts[symbol as usize]
    }

    /// Overwrite the count for `symbol`.
    #[inline]
    pub fn set(&mut self, symbol: u8, count: u32) {
        self.counts[symbol as usize] = count;
    }

    /// Sum of all counts, i.e. the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Symbols with a nonzero count and their counts, in ascending symbol order.
    pub fn present(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(symbol, &c)| (symbol as u8, c))
    }

    /// Raw counts indexed by byte value.
    pub fn as_array(&self) -> &[u32; SYMBOL_COUNT] {
        &self.counts
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[u32; SYMBOL_COUNT]> for FrequencyTable {
    fn from(counts: [u32; SYMBOL_COUNT]) -> Self {
        Self { counts }
    }
}

fn check_len(len: u64) -> Result<()> {
    if len > u32::MAX as u64 {
        return Err(Error::InputTooLarge { len });
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn count_parallel(data: &[u8]) -> [u32; SYMBOL_COUNT] {
    data.par_chunks(READ_CHUNK)
        .fold(
            || [0u32; SYMBOL_COUNT],
            |mut acc, chunk| {
                for &byte in chunk {
                    acc[byte as usize] += 1;
                }
                acc
            },
        )
        .reduce(
            || [0u32; SYMBOL_COUNT],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x += y;
                }
                a
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_from_bytes() {
        let table = FrequencyTable::from_bytes(b"AABBBCCCC").unwrap();
        assert_eq!(table.count(b'A'), 2);
        assert_eq!(table.count(b'B'), 3);
        assert_eq!(table.count(b'C'), 4);
        assert_eq!(table.count(b'D'), 0);
        assert_eq!(table.distinct(), 3);
        assert_eq!(table.total(), 9);
    }

    #[test]
    fn test_from_reader_matches_from_bytes() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let from_reader = FrequencyTable::from_reader(&mut Cursor::new(&data)).unwrap();
        let from_bytes = FrequencyTable::from_bytes(&data).unwrap();
        assert_eq!(from_reader, from_bytes);
        assert_eq!(from_reader.total(), data.len() as u64);
    }

    #[test]
    fn test_present_is_ascending() {
        let table = FrequencyTable::from_bytes(&[9, 3, 200, 3, 0]).unwrap();
        let present: Vec<(u8, u32)> = table.present().collect();
        assert_eq!(present, vec![(0, 1), (3, 2), (9, 1), (200, 1)]);
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(&[]).unwrap();
        assert_eq!(table.distinct(), 0);
        assert_eq!(table.total(), 0);
        assert_eq!(table, FrequencyTable::default());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_count_matches_reader() {
        let len = PARALLEL_THRESHOLD * 3 + 12_345;
        let data: Vec<u8> = (0..len as u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
            .collect();
        let from_bytes = FrequencyTable::from_bytes(&data).unwrap();
        let from_reader = FrequencyTable::from_reader(&mut Cursor::new(&data)).unwrap();
        assert_eq!(from_bytes, from_reader);
        assert_eq!(from_bytes.total(), len as u64);
    }

    #[test]
    fn test_check_len_limit() {
        assert!(check_len(u32::MAX as u64).is_ok());
        assert!(matches!(
            check_len(u32::MAX as u64 + 1),
            Err(Error::InputTooLarge { .. })
        ));
    }
}
