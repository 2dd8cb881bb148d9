//! Compression options.

/// Default capacity of the buffered readers and writers wrapping files.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Byte order of the multi-byte container fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    /// Byte order of the host that writes the archive.
    #[default]
    Native,
    /// Little-endian regardless of host.
    Little,
    /// Big-endian regardless of host.
    Big,
}

impl ByteOrder {
    /// Encode a 32-bit value in this byte order.
    #[inline]
    pub fn u32_to_bytes(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::Native => value.to_ne_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    /// Decode a 32-bit value in this byte order.
    #[inline]
    pub fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Native => u32::from_ne_bytes(bytes),
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// Options shared by compression and decompression.
///
/// Both sides must agree on `byte_order`; an archive read with the wrong
/// order fails the magic check.
#[derive(Debug, Clone)]
pub struct Options {
    /// Capacity of file read/write buffers in bytes.
    pub buffer_size: usize,
    /// Byte order of header and frequency-table fields.
    pub byte_order: ByteOrder,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            byte_order: ByteOrder::Native,
        }
    }
}

impl Options {
    /// Little-endian fields, readable on any host.
    pub fn portable() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            ..Self::default()
        }
    }

    /// Small I/O buffers.
    pub fn low_memory() -> Self {
        Self {
            buffer_size: 4 * 1024,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order_explicit() {
        assert_eq!(ByteOrder::Little.u32_to_bytes(0x0102_0304), [4, 3, 2, 1]);
        assert_eq!(ByteOrder::Big.u32_to_bytes(0x0102_0304), [1, 2, 3, 4]);
        assert_eq!(ByteOrder::Big.u32_from_bytes([0, 0, 1, 0]), 256);
    }

    #[test]
    fn test_native_matches_host() {
        let bytes = ByteOrder::Native.u32_to_bytes(0xDEAD_BEEF);
        assert_eq!(bytes, 0xDEAD_BEEFu32.to_ne_bytes());
        assert_eq!(ByteOrder::Native.u32_from_bytes(bytes), 0xDEAD_BEEF);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Options::default().byte_order, ByteOrder::Native);
        assert_eq!(Options::portable().byte_order, ByteOrder::Little);
        assert_eq!(Options::portable().buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(Options::low_memory().buffer_size, 4096);
    }
}
