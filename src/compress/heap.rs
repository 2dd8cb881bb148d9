//! Fixed-capacity binary min-heap used to build Huffman trees.
//!
//! Ordering looks at weight only. Both sift directions move an element
//! only when the other side is strictly lighter, so equal weights keep
//! whatever positions insertion order gave them. Tree reconstruction on
//! the decoding side depends on this exact behaviour.

use crate::error::{Error, Result};

/// Something with a weight the heap can order by.
pub trait Weighted {
    /// Weight used as the heap key.
    fn weight(&self) -> u64;
}

/// Array-backed binary min-heap with a capacity fixed at construction.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    nodes: Vec<T>,
    capacity: usize,
}

impl<T: Weighted> MinHeap<T> {
    /// Create an empty heap that can hold at most `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert `node`, sifting it up past strictly heavier parents.
    pub fn insert(&mut self, node: T) -> Result<()> {
        if self.nodes.len() >= self.capacity {
            return Err(Error::QueueCapacity {
                capacity: self.capacity,
            });
        }

        self.nodes.push(node);
        let mut i = self.nodes.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.nodes[parent].weight() <= self.nodes[i].weight() {
                break;
            }
            self.nodes.swap(parent, i);
            i = parent;
        }
        Ok(())
    }

    /// Remove and return the lightest element, or `None` when empty.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }

        let last = self.nodes.len() - 1;
        self.nodes.swap(0, last);
        let min = self.nodes.pop();
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        min
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.nodes.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;

            if left < n && self.nodes[left].weight() < self.nodes[smallest].weight() {
                smallest = left;
            }
            if right < n && self.nodes[right].weight() < self.nodes[smallest].weight() {
                smallest = right;
            }
            if smallest == i {
                return;
            }

            self.nodes.swap(i, smallest);
            i = smallest;
        }
    }

    /// Returns true if the heap holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of elements currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Maximum number of elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
