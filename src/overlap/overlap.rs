//! Sharing relationships between one fragment and its peers.
//!
//! Two directions are recorded:
//! - for every inner vertex, the ranks that hold an outer copy of it
//!   (where its updates must be pushed);
//! - for every outer vertex, the rank that owns it (where its partial
//!   results must be returned).

use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overlap {
    /// CSR offsets into `mirror_ranks`, one row per inner vertex.
    mirror_offsets: Vec<usize>,
    mirror_ranks: Vec<usize>,
    /// Owner rank per outer vertex, in outer-handle order.
    owners: Vec<usize>,
}

impl Overlap {
    /// Build from one sorted, deduplicated rank list per inner vertex and one
    /// owner per outer vertex.
    pub fn new<I, R>(mirrors: I, owners: Vec<usize>) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = usize>,
    {
        let mut mirror_offsets = vec![0];
        let mut mirror_ranks = Vec::new();
        for row in mirrors {
            mirror_ranks.extend(row);
            mirror_offsets.push(mirror_ranks.len());
        }
        Self {
            mirror_offsets,
            mirror_ranks,
            owners,
        }
    }

    pub fn inner_len(&self) -> usize {
        self.mirror_offsets.len() - 1
    }

    pub fn outer_len(&self) -> usize {
        self.owners.len()
    }

    /// Ranks mirroring the `i`-th inner vertex (empty if out of range).
    pub fn mirrors_of(&self, i: usize) -> &[usize] {
        match (self.mirror_offsets.get(i), self.mirror_offsets.get(i + 1)) {
            (Some(&lo), Some(&hi)) => &self.mirror_ranks[lo..hi],
            _ => &[],
        }
    }

    /// Owner rank of the `j`-th outer vertex.
    pub fn owner_of(&self, j: usize) -> Option<usize> {
        self.owners.get(j).copied()
    }

    /// Every rank this fragment exchanges messages with, in ascending order.
    pub fn neighbor_ranks(&self) -> impl Iterator<Item = usize> + '_ {
        self.mirror_ranks
            .iter()
            .chain(self.owners.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
    }
}
