//! Compression and decompression pipelines over files, streams and
//! in-memory buffers.
//!
//! Compression reads its input twice (once to count, once to encode), so
//! stream inputs must be seekable. The archive header is written first as
//! a placeholder and rewritten once the payload size is known, which also
//! needs a seekable output.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::compress::encoder::encode;
use crate::compress::frequency::FrequencyTable;
use crate::compress::huffman::{CodeTable, HuffmanTree};
use crate::container::{
    read_frequencies, write_frequencies, FileHeader, FREQUENCY_ENTRY_LEN, HEADER_LEN,
};
use crate::decode::decoder::decode;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::stats::{CompressStats, DecompressStats};

/// Everything derived from the first pass over the input.
struct Plan {
    frequencies: FrequencyTable,
    codes: CodeTable,
}

impl Plan {
    fn new(frequencies: FrequencyTable) -> Result<Self> {
        let tree = HuffmanTree::build(&frequencies)?;
        log::debug!(
            "built tree: {} symbols, {} bytes, depth {}",
            tree.symbol_count(),
            tree.weight(),
            tree.depth()
        );
        let codes = CodeTable::from_tree(&tree);
        Ok(Self { frequencies, codes })
    }

    fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let frequencies = FrequencyTable::from_reader(reader)?;
        reader.seek(SeekFrom::Start(0))?;
        Self::new(frequencies)
    }

    fn write_archive<R: Read, W: Write + Seek>(
        &self,
        reader: &mut R,
        writer: &mut W,
        options: &Options,
    ) -> Result<CompressStats> {
        let order = options.byte_order;
        let start = writer.stream_position()?;

        let mut header = FileHeader::new(&self.frequencies);
        header.write_to(writer, order)?;
        write_frequencies(writer, &self.frequencies, order)?;

        let summary = encode(reader, writer, &self.codes)?;
        if summary.input_bytes != header.original_size as u64 || summary.skipped > 0 {
            return Err(Error::Io(io::Error::other(format!(
                "input changed between passes: counted {} bytes, encoded {}",
                header.original_size,
                summary.input_bytes - summary.skipped
            ))));
        }
        header.compressed_size =
            u32::try_from(summary.payload_bytes).map_err(|_| Error::InputTooLarge {
                len: summary.payload_bytes,
            })?;

        let end = writer.stream_position()?;
        writer.seek(SeekFrom::Start(start))?;
        header.write_to(writer, order)?;
        writer.seek(SeekFrom::Start(end))?;
        writer.flush()?;

        let stats = CompressStats {
            original_size: summary.input_bytes,
            payload_size: summary.payload_bytes,
            archive_size: end - start,
            symbol_count: self.frequencies.distinct(),
            max_code_length: self.codes.max_length(),
        };
        log::debug!(
            "compressed {} -> {} bytes ({} payload)",
            stats.original_size,
            stats.archive_size,
            stats.payload_size
        );
        Ok(stats)
    }
}

/// Header and tree parsed from the front of an archive.
struct ArchiveHead {
    header: FileHeader,
    tree: HuffmanTree,
}

impl ArchiveHead {
    /// Parse and check the header and frequency table, then rebuild the tree.
    fn read<R: Read>(reader: &mut R, options: &Options) -> Result<Self> {
        let order = options.byte_order;
        let header = FileHeader::read_from(reader, order)?;
        log::debug!(
            "archive header: original {} bytes, payload {} bytes, {} symbols",
            header.original_size,
            header.compressed_size,
            header.symbol_count
        );
        if header.symbol_count == 0 {
            return Err(Error::Format("archive has no symbols".into()));
        }

        let frequencies = read_frequencies(reader, header.symbol_count, order)?;
        header.validate_against(&frequencies)?;

        let tree = HuffmanTree::build(&frequencies)?;
        Ok(Self { header, tree })
    }

    /// Most bytes the payload can decode to. Every symbol costs at least
    /// one bit, so a header claiming more than that cannot be honoured.
    fn decoded_size_bound(&self) -> Result<usize> {
        let original = self.header.original_size as u64;
        let from_payload = self.header.compressed_size as u64 * 8;
        let bound = original.min(from_payload);
        usize::try_from(bound).map_err(|_| Error::ResourceExhausted {
            requested: usize::MAX,
        })
    }

    fn decode_payload<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<DecompressStats> {
        let original_size = self.header.original_size as u64;
        let mut payload = reader.take(self.header.compressed_size as u64);
        let decoded_size = decode(&mut payload, writer, &self.tree, original_size)?;
        writer.flush()?;

        Ok(DecompressStats {
            original_size,
            decoded_size,
            symbol_count: self.tree.symbol_count(),
        })
    }
}

/// Compress the file at `input` into a new archive at `output`.
///
/// An empty input fails with [`Error::EmptyInput`] before `output` is created.
pub fn compress<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<CompressStats> {
    compress_with_options(input, output, &Options::default())
}

/// Compress a file with custom options.
pub fn compress_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &Options,
) -> Result<CompressStats> {
    let input = input.as_ref();
    let output = output.as_ref();
    log::debug!("compressing {} -> {}", input.display(), output.display());

    let mut reader = BufReader::with_capacity(options.buffer_size, File::open(input)?);
    let plan = Plan::from_reader(&mut reader)?;

    let mut writer = BufWriter::with_capacity(options.buffer_size, File::create(output)?);
    plan.write_archive(&mut reader, &mut writer, options)
}

/// Decompress the archive at `input` into `output`.
///
/// The header and frequency table are checked before `output` is created,
/// so a foreign or truncated archive leaves no output file behind.
pub fn decompress<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<DecompressStats> {
    decompress_with_options(input, output, &Options::default())
}

/// Decompress a file with custom options.
pub fn decompress_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &Options,
) -> Result<DecompressStats> {
    let input = input.as_ref();
    let output = output.as_ref();
    log::debug!("decompressing {} -> {}", input.display(), output.display());

    let mut reader = BufReader::with_capacity(options.buffer_size, File::open(input)?);
    let head = ArchiveHead::read(&mut reader, options)?;

    let mut writer = BufWriter::with_capacity(options.buffer_size, File::create(output)?);
    head.decode_payload(&mut reader, &mut writer)
}

/// Compress from a seekable reader into a seekable writer.
///
/// The archive is written starting at the writer's current position.
pub fn compress_stream<R, W>(reader: &mut R, writer: &mut W, options: &Options) -> Result<CompressStats>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let plan = Plan::from_reader(reader)?;
    plan.write_archive(reader, writer, options)
}

/// Decompress an archive read from `reader` into `writer`.
pub fn decompress_stream<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    options: &Options,
) -> Result<DecompressStats> {
    let head = ArchiveHead::read(reader, options)?;
    head.decode_payload(reader, writer)
}

/// Compress an in-memory buffer into a complete archive.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    compress_bytes_with_options(data, &Options::default())
}

/// Compress an in-memory buffer with custom options.
pub fn compress_bytes_with_options(data: &[u8], options: &Options) -> Result<Vec<u8>> {
    let plan = Plan::new(FrequencyTable::from_bytes(data)?)?;

    let payload = plan.codes.encoded_bits(&plan.frequencies).div_ceil(8) as usize;
    let capacity = HEADER_LEN + plan.frequencies.distinct() * FREQUENCY_ENTRY_LEN + payload;
    let mut out = Vec::new();
    out.try_reserve_exact(capacity)
        .map_err(|_| Error::ResourceExhausted {
            requested: capacity,
        })?;

    let mut writer = Cursor::new(out);
    plan.write_archive(&mut &data[..], &mut writer, options)?;
    Ok(writer.into_inner())
}

/// Decompress a complete in-memory archive.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    decompress_bytes_with_options(data, &Options::default())
}

/// Decompress an in-memory archive with custom options.
pub fn decompress_bytes_with_options(data: &[u8], options: &Options) -> Result<Vec<u8>> {
    let mut reader = data;
    let head = ArchiveHead::read(&mut reader, options)?;

    let requested = head.decoded_size_bound()?;
    let mut out = Vec::new();
    out.try_reserve_exact(requested)
        .map_err(|_| Error::ResourceExhausted { requested })?;

    head.decode_payload(&mut reader, &mut out)?;
    Ok(out)
}

/// Code table that compressing the file at `path` would use.
pub fn code_table_for<P: AsRef<Path>>(path: P) -> Result<CodeTable> {
    let mut reader = BufReader::new(File::open(path)?);
    let frequencies = FrequencyTable::from_reader(&mut reader)?;
    let tree = HuffmanTree::build(&frequencies)?;
    Ok(CodeTable::from_tree(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MAGIC;
    use crate::options::ByteOrder;

    #[test]
    fn test_bytes_roundtrip() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let archive = compress_bytes(data).unwrap();
        assert_eq!(decompress_bytes(&archive).unwrap(), data);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(compress_bytes(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_single_symbol_archive_layout() {
        let archive = compress_bytes_with_options(b"AAAAAAAA", &Options::portable()).unwrap();
        // header + one frequency entry + one payload byte
        assert_eq!(archive.len(), HEADER_LEN + FREQUENCY_ENTRY_LEN + 1);
        assert_eq!(&archive[0..4], &MAGIC.to_le_bytes());
        assert_eq!(&archive[4..8], &8u32.to_le_bytes());
        assert_eq!(&archive[8..12], &1u32.to_le_bytes());
        assert_eq!(&archive[12..16], &1u32.to_le_bytes());
        assert_eq!(archive[16], 0);
        assert_eq!(&archive[17..22], &[b'A', 8, 0, 0, 0]);
        assert_eq!(archive[22], 0x00);
    }

    #[test]
    fn test_stream_matches_bytes() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i * i % 97) as u8).collect();
        let mut out = Cursor::new(Vec::new());
        let stats = compress_stream(&mut Cursor::new(&data), &mut out, &Options::default()).unwrap();
        let archive = out.into_inner();
        assert_eq!(stats.archive_size, archive.len() as u64);
        assert_eq!(archive, compress_bytes(&data).unwrap());

        let mut restored = Vec::new();
        let dstats =
            decompress_stream(&mut &archive[..], &mut restored, &Options::default()).unwrap();
        assert!(dstats.is_complete());
        assert_eq!(restored, data);
    }

    #[test]
    fn test_stream_writes_at_current_position() {
        let mut out = Cursor::new(Vec::new());
        out.write_all(b"prefix").unwrap();
        compress_stream(&mut Cursor::new(b"abcabc"), &mut out, &Options::default()).unwrap();
        let bytes = out.into_inner();
        assert_eq!(&bytes[..6], b"prefix");
        assert_eq!(decompress_bytes(&bytes[6..]).unwrap(), b"abcabc");
    }

    #[test]
    fn test_byte_order_must_match() {
        let opts = Options {
            byte_order: ByteOrder::Big,
            ..Options::default()
        };
        let archive = compress_bytes_with_options(b"hello", &opts).unwrap();
        assert_eq!(decompress_bytes_with_options(&archive, &opts).unwrap(), b"hello");

        let little = Options::portable();
        let err = decompress_bytes_with_options(&archive, &little).unwrap_err();
        assert!(matches!(err, Error::BadMagic { .. }));
    }

    #[test]
    fn test_zero_symbol_archive_rejected() {
        let header = FileHeader {
            magic: MAGIC,
            original_size: 0,
            compressed_size: 0,
            symbol_count: 0,
            padding_bits: 0,
        };
        let bytes = header.to_bytes(ByteOrder::Native);
        assert!(matches!(decompress_bytes(&bytes), Err(Error::Format(_))));
    }

    #[test]
    fn test_oversized_header_reserves_only_payload_bound() {
        let order = ByteOrder::Native;
        let mut archive = FileHeader {
            magic: MAGIC,
            original_size: u32::MAX,
            compressed_size: 1,
            symbol_count: 1,
            padding_bits: 0,
        }
        .to_bytes(order)
        .to_vec();
        archive.push(b'A');
        archive.extend_from_slice(&order.u32_to_bytes(u32::MAX));
        archive.push(0x00);
        assert_eq!(archive.len(), 23);

        let restored = decompress_bytes(&archive).unwrap();
        assert_eq!(restored, vec![b'A'; 8]);
        assert!(restored.capacity() < 1024, "capacity {}", restored.capacity());
    }

    #[test]
    fn test_decoded_size_bound() {
        let mut reader = &compress_bytes(&[7u8; 100]).unwrap()[..];
        let head = ArchiveHead::read(&mut reader, &Options::default()).unwrap();
        // 100 one-bit codes fit in 13 bytes; the original size is smaller.
        assert_eq!(head.header.compressed_size, 13);
        assert_eq!(head.decoded_size_bound().unwrap(), 100);
    }

    #[test]
    fn test_inconsistent_sizes_rejected() {
        let mut archive = compress_bytes_with_options(b"abcd", &Options::portable()).unwrap();
        archive[4..8].copy_from_slice(&5u32.to_le_bytes());
        let err = decompress_bytes_with_options(&archive, &Options::portable()).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
