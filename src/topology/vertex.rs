//! `Gid` and `Vertex`: the two ways of naming a graph vertex.
//!
//! Every vertex has exactly one global identifier ([`Gid`]), comparable across
//! all workers, and one process-local handle ([`Vertex`]) per fragment that
//! knows about it. Handles are dense indices into per-fragment arrays and are
//! meaningless outside the fragment that issued them.
//!
//! This module provides:
//! - Transparent newtypes for both names so they cannot be mixed up.
//! - [`VertexRange`], a contiguous half-open range of handles. Fragments lay
//!   out inner vertices first and outer (ghost) vertices after them, so the
//!   inner and outer sets are each one range.

use std::fmt;

/// Globally comparable vertex identifier.
///
/// # Memory layout
/// `repr(transparent)` over `u64`; it travels on the wire as a plain
/// little-endian `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct Gid(u64);

impl Gid {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Gid(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Gid {
    #[inline]
    fn from(raw: u64) -> Self {
        Gid(raw)
    }
}

impl fmt::Debug for Gid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Gid").field(&self.0).finish()
    }
}

impl fmt::Display for Gid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fragment-local vertex handle.
///
/// A handle indexes the fragment's degree table, oriented neighbor lists and
/// triangle counters directly.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Vertex(u32);

impl Vertex {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Vertex(raw)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The handle as an array index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vertex").field(&self.0).finish()
    }
}

/// Half-open range `[start, end)` of local handles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct VertexRange {
    start: u32,
    end: u32,
}

impl VertexRange {
    pub const fn new(start: u32, end: u32) -> Self {
        // an inverted range is treated as empty
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    pub const fn start(&self) -> Vertex {
        Vertex(self.start)
    }

    pub const fn end(&self) -> Vertex {
        Vertex(self.end)
    }

    pub const fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub const fn contains(&self, v: Vertex) -> bool {
        v.0 >= self.start && v.0 < self.end
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Vertex> + ExactSizeIterator + use<> {
        (self.start..self.end).map(Vertex)
    }

    /// Split into consecutive sub-ranges of at most `size` handles.
    ///
    /// A `size` of zero is treated as one.
    pub fn chunks(&self, size: usize) -> impl Iterator<Item = VertexRange> + use<> {
        let size = size.max(1).min(u32::MAX as usize) as u32;
        let (start, end) = (self.start, self.end);
        (start..end)
            .step_by(size as usize)
            .map(move |lo| VertexRange::new(lo, lo.saturating_add(size).min(end)))
    }
}

impl IntoIterator for VertexRange {
    type Item = Vertex;
    type IntoIter = std::iter::Map<std::ops::Range<u32>, fn(u32) -> Vertex>;

    fn into_iter(self) -> Self::IntoIter {
        (self.start..self.end).map(Vertex as fn(u32) -> Vertex)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display() {
        let g = Gid::new(7);
        assert_eq!(format!("{:?}", g), "Gid(7)");
        assert_eq!(format!("{}", g), "7");
        assert_eq!(format!("{:?}", Vertex::new(3)), "Vertex(3)");
    }

    #[test]
    fn range_contains_and_len() {
        let r = VertexRange::new(2, 5);
        assert_eq!(r.len(), 3);
        assert!(r.contains(Vertex::new(2)));
        assert!(r.contains(Vertex::new(4)));
        assert!(!r.contains(Vertex::new(5)));
        assert!(!r.contains(Vertex::new(1)));
        assert!(VertexRange::new(4, 1).is_empty());
    }

    #[test]
    fn chunks_cover_range_without_overlap() {
        let r = VertexRange::new(3, 13);
        let chunks: Vec<_> = r.chunks(4).collect();
        assert_eq!(
            chunks,
            vec![
                VertexRange::new(3, 7),
                VertexRange::new(7, 11),
                VertexRange::new(11, 13)
            ]
        );
        let flat: Vec<_> = chunks.iter().flat_map(|c| c.iter()).collect();
        assert_eq!(flat, r.iter().collect::<Vec<_>>());
        assert_eq!(VertexRange::new(0, 0).chunks(8).count(), 0);
        assert_eq!(r.chunks(0).count(), r.len());
    }
}
