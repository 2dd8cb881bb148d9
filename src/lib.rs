//! # huffpack
//!
//! Lossless file compression with Huffman coding.
//!
//! An archive stores a small header, the byte frequency table of the
//! input, and the input re-encoded with a Huffman code derived from those
//! frequencies. The decompressor rebuilds the very same tree from the
//! stored table, so no code table is transmitted.
//!
//! ## Features
//!
//! - **Deterministic tree construction** shared by both directions
//! - **File, stream and in-memory** entry points
//! - Optional parallel frequency counting via the `parallel` feature
//! - Command-line tool behind the `cli` feature
//!
//! ## Example
//!
//! ```rust
//! let archive = huffpack::compress_bytes(b"AABBBCCCC").unwrap();
//! let restored = huffpack::decompress_bytes(&archive).unwrap();
//! assert_eq!(restored, b"AABBBCCCC");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod codec;
pub mod compress;
pub mod container;
pub mod decode;
pub mod error;
pub mod options;
pub mod stats;

pub use codec::{
    code_table_for, compress, compress_bytes, compress_bytes_with_options, compress_stream,
    compress_with_options, decompress, decompress_bytes, decompress_bytes_with_options,
    decompress_stream, decompress_with_options,
};
pub use compress::{CodeTable, FrequencyTable, HuffmanTree};
pub use error::{Error, Result};
pub use options::{ByteOrder, Options};
pub use stats::{file_stats, CompressStats, DecompressStats, FileStats};
