//! Decompression side: bit reading and tree-walking payload decoding.

pub mod bit_reader;
pub mod decoder;

pub use bit_reader::BitReader;
pub use decoder::decode;
