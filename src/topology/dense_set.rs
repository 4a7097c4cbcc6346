//! Reusable dense membership set over a fragment's vertex handles.
//!
//! Sized once for the whole handle space of a fragment. `insert` and
//! `contains` are single bit operations; `clear` only touches the words that
//! were written since the last clear, so a set can be reused across vertices
//! without reallocating or scanning the full bitmap.

use crate::topology::vertex::{Vertex, VertexRange};

#[derive(Debug, Clone, Default)]
pub struct DenseVertexSet {
    words: Vec<u64>,
    touched: Vec<u32>,
}

impl DenseVertexSet {
    /// An empty set able to hold any handle in `[0, capacity)`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
            touched: Vec::new(),
        }
    }

    /// An empty set able to hold every handle of `range` (and anything below it).
    pub fn for_range(range: VertexRange) -> Self {
        Self::with_capacity(range.end().index())
    }

    pub fn capacity(&self) -> usize {
        self.words.len() * 64
    }

    /// Insert `v`; returns `true` if it was not yet present.
    ///
    /// # Panics
    /// Panics if `v` is outside the capacity the set was built with.
    #[inline]
    pub fn insert(&mut self, v: Vertex) -> bool {
        let (w, bit) = Self::slot(v);
        let word = &mut self.words[w];
        if *word & bit != 0 {
            return false;
        }
        if *word == 0 {
            self.touched.push(w as u32);
        }
        *word |= bit;
        true
    }

    #[inline]
    pub fn contains(&self, v: Vertex) -> bool {
        let (w, bit) = Self::slot(v);
        self.words.get(w).is_some_and(|word| word & bit != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Remove every element, in time proportional to what was inserted.
    pub fn clear(&mut self) {
        for w in self.touched.drain(..) {
            self.words[w as usize] = 0;
        }
    }

    #[inline]
    fn slot(v: Vertex) -> (usize, u64) {
        let i = v.index();
        (i / 64, 1u64 << (i % 64))
    }
}
