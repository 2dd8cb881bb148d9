//! Huffman tree construction and code table generation.
//!
//! The tree is rebuilt from the stored frequency table when decoding, so
//! construction has to be fully deterministic: leaves go into the queue in
//! ascending symbol order and ties are broken by the queue's sift rules
//! (see [`MinHeap`]). Any valid Huffman tree is not enough, it must be the
//! same one on both sides.

use std::fmt;

use super::frequency::{FrequencyTable, SYMBOL_COUNT};
use super::heap::{MinHeap, Weighted};
use crate::error::{Error, Result};

/// Longest code the table can hold. A tree over 256 symbols is at most
/// 255 levels deep.
pub const MAX_CODE_LENGTH: usize = 256;

/// Node of a Huffman tree. Children are owned by their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its occurrence count.
    Leaf {
        /// Byte value.
        symbol: u8,
        /// Occurrence count.
        weight: u64,
    },
    /// Merge of two subtrees; `weight` is the sum of the children's weights.
    Internal {
        /// Combined weight of both subtrees.
        weight: u64,
        /// Subtree reached by a 0 bit.
        left: Box<Node>,
        /// Subtree reached by a 1 bit. Only absent for the root of a
        /// single-symbol tree.
        right: Option<Box<Node>>,
    },
}

impl Node {
    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }

    /// Weight of this node.
    #[inline]
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    /// Child selected by `bit` (false = left, true = right).
    ///
    /// Returns `None` for leaves and for the missing right edge of a
    /// single-symbol root.
    #[inline]
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => {
                if bit {
                    right.as_deref()
                } else {
                    Some(left.as_ref())
                }
            }
        }
    }

    /// Symbol held by a leaf.
    #[inline]
    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => {
                let right_depth = right.as_ref().map_or(0, |r| r.depth());
                1 + left.depth().max(right_depth)
            }
        }
    }
}

impl Weighted for Node {
    #[inline]
    fn weight(&self) -> u64 {
        Node::weight(self)
    }
}

/// Huffman tree built from a frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
    symbols: usize,
}

impl HuffmanTree {
    /// Build the tree for `frequencies`.
    ///
    /// Fails with [`Error::EmptyInput`] if no symbol has a nonzero count.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let symbols = frequencies.distinct();

        // A lone symbol still needs a 1-bit code, so hang it off a root
        // with no right branch instead of letting it be the root.
        if symbols == 1 {
            let (symbol, count) = frequencies.present().next().ok_or(Error::EmptyInput)?;
            let weight = count as u64;
            let root = Node::Internal {
                weight,
                left: Box::new(Node::Leaf { symbol, weight }),
                right: None,
            };
            return Ok(Self { root, symbols });
        }

        let mut heap = MinHeap::with_capacity(symbols);
        for (symbol, count) in frequencies.present() {
            heap.insert(Node::Leaf {
                symbol,
                weight: count as u64,
            })?;
        }

        let root = loop {
            let Some(left) = heap.extract_min() else {
                return Err(Error::EmptyInput);
            };
            let Some(right) = heap.extract_min() else {
                break left;
            };
            heap.insert(Node::merge(left, right))?;
        };

        Ok(Self { root, symbols })
    }

    /// Root node.
    #[inline]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of leaves (distinct symbols).
    #[inline]
    pub fn symbol_count(&self) -> usize {
        self.symbols
    }

    /// Total weight, equal to the length of the input the tree was built for.
    #[inline]
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    fn single_symbol(&self) -> Option<u8> {
        match &self.root {
            Node::Internal {
                left, right: None, ..
            } => left.symbol(),
            _ => None,
        }
    }
}

/// A Huffman code: up to [`MAX_CODE_LENGTH`] bits, first bit in the MSB
/// of `bits[0]`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HuffmanCode {
    bits: [u8; MAX_CODE_LENGTH / 8],
    length: u16,
}

impl HuffmanCode {
    /// The zero-length code of a symbol that does not occur.
    pub const EMPTY: HuffmanCode = HuffmanCode {
        bits: [0; MAX_CODE_LENGTH / 8],
        length: 0,
    };

    /// Build a code from individual bits.
    pub fn from_bits(bits: &[bool]) -> Self {
        let mut code = Self::EMPTY;
        for &bit in bits {
            code.push(bit);
        }
        code
    }

    #[inline]
    fn push(&mut self, bit: bool) {
        let i = self.length as usize;
        debug_assert!(i < MAX_CODE_LENGTH);
        if bit {
            self.bits[i / 8] |= 0x80 >> (i % 8);
        }
        self.length += 1;
    }

    /// Number of bits in the code.
    #[inline]
    pub fn len(&self) -> usize {
        self.length as usize
    }

    /// Returns true for the code of an absent symbol.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Bit `i` of the code, counting from the first emitted bit.
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        debug_assert!(i < self.len());
        self.bits[i / 8] & (0x80 >> (i % 8)) != 0
    }

    /// Bits in emission order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    /// Returns true if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &HuffmanCode) -> bool {
        self.len() <= other.len() && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
    }
}

impl Default for HuffmanCode {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for HuffmanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for HuffmanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HuffmanCode({:?}, len={})", self.to_string(), self.length)
    }
}

/// Code for every byte value, indexed by symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [HuffmanCode; SYMBOL_COUNT],
}

impl CodeTable {
    /// Derive codes by walking the tree: a left edge appends 0, a right
    /// edge appends 1.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = [HuffmanCode::EMPTY; SYMBOL_COUNT];

        if let Some(symbol) = tree.single_symbol() {
            codes[symbol as usize] = HuffmanCode::from_bits(&[false]);
        } else {
            assign_codes(tree.root(), HuffmanCode::EMPTY, &mut codes);
        }

        Self { codes }
    }

    /// Code for `symbol`, or `None` if the symbol did not occur.
    #[inline]
    pub fn get(&self, symbol: u8) -> Option<&HuffmanCode> {
        let code = &self.codes[symbol as usize];
        (!code.is_empty()).then_some(code)
    }

    /// Present symbols and their codes, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &HuffmanCode)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(|(symbol, c)| (symbol as u8, c))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the longest code.
    pub fn max_length(&self) -> usize {
        self.codes.iter().map(HuffmanCode::len).max().unwrap_or(0)
    }

    /// Number of payload bits needed to encode input with these frequencies.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .present()
            .map(|(symbol, count)| count as u64 * self.codes[symbol as usize].len() as u64)
            .sum()
    }

    /// Returns true if no present code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let present: Vec<&HuffmanCode> = self.iter().map(|(_, c)| c).collect();
        present.iter().enumerate().all(|(i, a)| {
            present
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }
}

fn assign_codes(node: &Node, code: HuffmanCode, codes: &mut [HuffmanCode; SYMBOL_COUNT]) {
    match node {
        Node::Leaf { symbol, .. } => codes[*symbol as usize] = code,
        Node::Internal { left, right, .. } => {
            let mut left_code = code;
            left_code.push(false);
            assign_codes(left, left_code, codes);

            if let Some(right) = right {
                let mut right_code = code;
                right_code.push(true);
                assign_codes(right, right_code, codes);
            }
        }
    }
}

/// Renders the table the way `huffpack codes` prints it.
impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Char\tByte\tCode\tLength")?;
        writeln!(f, "----\t----\t----\t------")?;
        for (symbol, code) in self.iter() {
            let shown = if symbol.is_ascii_graphic() || symbol == b' ' {
                symbol as char
            } else {
                '?'
            };
            writeln!(f, "{}\t{}\t{}\t{}", shown, symbol, code, code.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(u8, u32)]) -> FrequencyTable {
        let mut freqs = FrequencyTable::new();
        for &(symbol, count) in pairs {
            freqs.set(symbol, count);
        }
        freqs
    }

    fn check_weights(node: &Node) -> u64 {
        match node {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal {
                weight,
                left,
                right,
            } => {
                let sum = check_weights(left) + right.as_ref().map_or(0, |r| check_weights(r));
                assert_eq!(*weight, sum);
                sum
            }
        }
    }

    #[test]
    fn test_build_empty_is_error() {
        let err = HuffmanTree::build(&FrequencyTable::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn test_single_symbol_tree() {
        let tree = HuffmanTree::build(&table(&[(b'A', 8)])).unwrap();
        assert_eq!(tree.symbol_count(), 1);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root().child(false).and_then(Node::symbol), Some(b'A'));
        assert!(tree.root().child(true).is_none());

        let codes = CodeTable::from_tree(&tree);
        let code = codes.get(b'A').unwrap();
        assert_eq!(code.len(), 1);
        assert_eq!(code.to_string(), "0");
        assert_eq!(codes.len(), 1);
    }

    #[test]
    fn test_three_symbols() {
        // A=2, B=3: merged first into 5, then C=4 + 5.
        let freqs = table(&[(b'A', 2), (b'B', 3), (b'C', 4)]);
        let tree = HuffmanTree::build(&freqs).unwrap();
        assert_eq!(tree.weight(), 9);
        check_weights(tree.root());

        let codes = CodeTable::from_tree(&tree);
        assert_eq!(codes.get(b'C').unwrap().to_string(), "0");
        assert_eq!(codes.get(b'A').unwrap().to_string(), "10");
        assert_eq!(codes.get(b'B').unwrap().to_string(), "11");
        assert_eq!(codes.encoded_bits(&freqs), 4 + 2 * 2 + 3 * 2);
        assert!(codes.get(b'D').is_none());
    }

    #[test]
    fn test_weights_sum_and_prefix_free() {
        let freqs = table(&[(0, 10), (1, 5), (2, 3), (3, 2), (4, 1), (5, 1), (6, 1), (7, 1)]);
        let tree = HuffmanTree::build(&freqs).unwrap();
        assert_eq!(check_weights(tree.root()), 24);

        let codes = CodeTable::from_tree(&tree);
        assert_eq!(codes.len(), 8);
        assert!(codes.is_prefix_free());
        assert!(codes.get(0).unwrap().len() <= codes.get(7).unwrap().len());
    }

    #[test]
    fn test_build_is_deterministic() {
        let freqs = table(&[(10, 1), (20, 1), (30, 1), (40, 1), (50, 2), (60, 2)]);
        let a = CodeTable::from_tree(&HuffmanTree::build(&freqs).unwrap());
        let b = CodeTable::from_tree(&HuffmanTree::build(&freqs).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_symbols_skewed_depth() {
        // Fibonacci-like weights give the deepest possible tree.
        let mut freqs = FrequencyTable::new();
        let (mut a, mut b) = (1u32, 1u32);
        for symbol in 0..30u8 {
            freqs.set(symbol, a);
            let next = a.saturating_add(b);
            a = b;
            b = next;
        }
        let tree = HuffmanTree::build(&freqs).unwrap();
        let codes = CodeTable::from_tree(&tree);
        assert_eq!(codes.max_length(), tree.depth());
        assert_eq!(tree.depth(), 29);
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn test_all_256_symbols_uniform() {
        let freqs = FrequencyTable::from([7u32; SYMBOL_COUNT]);
        let tree = HuffmanTree::build(&freqs).unwrap();
        let codes = CodeTable::from_tree(&tree);
        assert_eq!(codes.len(), 256);
        assert!(codes.iter().all(|(_, c)| c.len() == 8));
    }

    #[test]
    fn test_code_bits() {
        let code = HuffmanCode::from_bits(&[true, false, true, true]);
        assert_eq!(code.len(), 4);
        assert!(code.bit(0));
        assert!(!code.bit(1));
        assert_eq!(code.iter().collect::<Vec<_>>(), vec![true, false, true, true]);
        assert!(HuffmanCode::from_bits(&[true, false]).is_prefix_of(&code));
        assert!(!HuffmanCode::from_bits(&[false]).is_prefix_of(&code));
        assert!(HuffmanCode::default().is_empty());
    }

    #[test]
    fn test_display_table() {
        let freqs = table(&[(b'a', 1), (b'\n', 3)]);
        let codes = CodeTable::from_tree(&HuffmanTree::build(&freqs).unwrap());
        let text = codes.to_string();
        assert!(text.starts_with("Char\tByte\tCode\tLength\n"));
        assert!(text.contains("?\t10\t1\t1\n"));
        assert!(text.contains("a\t97\t0\t1\n"));
    }
}
