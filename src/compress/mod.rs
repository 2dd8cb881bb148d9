//! Compression side: frequency counting, tree construction, code
//! generation and payload encoding.

pub mod encoder;
pub mod frequency;
pub mod heap;
pub mod huffman;

pub use encoder::{encode, EncodeSummary};
pub use frequency::{FrequencyTable, SYMBOL_COUNT};
pub use heap::{MinHeap, Weighted};
pub use huffman::{CodeTable, HuffmanCode, HuffmanTree, Node, MAX_CODE_LENGTH};
