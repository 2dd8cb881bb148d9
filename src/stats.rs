//! Size statistics for compressed files.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Result of compressing one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressStats {
    /// Input length in bytes.
    pub original_size: u64,
    /// Length of the bit-packed payload in bytes.
    pub payload_size: u64,
    /// Length of the whole archive (header, frequency table, payload).
    pub archive_size: u64,
    /// Distinct byte values in the input.
    pub symbol_count: usize,
    /// Longest code assigned.
    pub max_code_length: usize,
}

impl CompressStats {
    /// Sizes of the input and the produced archive.
    pub fn file_stats(&self) -> FileStats {
        FileStats {
            original_size: self.original_size,
            compressed_size: self.archive_size,
        }
    }
}

/// Result of decompressing one archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressStats {
    /// Original size recorded in the header.
    pub original_size: u64,
    /// Bytes actually written. Less than `original_size` only if the
    /// payload ended early.
    pub decoded_size: u64,
    /// Distinct byte values in the archive's frequency table.
    pub symbol_count: usize,
}

impl DecompressStats {
    /// Returns true if every byte recorded in the header was recovered.
    pub fn is_complete(&self) -> bool {
        self.decoded_size == self.original_size
    }
}

/// Sizes of an original file and its compressed counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    /// Size of the original file in bytes.
    pub original_size: u64,
    /// Size of the compressed file in bytes.
    pub compressed_size: u64,
}

impl FileStats {
    /// Compressed size divided by original size (0 for an empty original).
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.compressed_size as f64 / self.original_size as f64
    }

    /// Percentage of the original size saved; negative when the
    /// compressed file is larger.
    pub fn space_saved_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.original_size as f64 - self.compressed_size as f64) / self.original_size as f64
            * 100.0
    }
}

/// Compare the sizes of two files on disk.
pub fn file_stats<P: AsRef<Path>, Q: AsRef<Path>>(original: P, compressed: Q) -> Result<FileStats> {
    Ok(FileStats {
        original_size: fs::metadata(original)?.len(),
        compressed_size: fs::metadata(compressed)?.len(),
    })
}
