//! Fixed, versioned, little-endian wire types for message batches.
//!
//! A batch is what one rank sends to one peer in one superstep:
//!
//! ```text
//! WireHdr | WireCount | record * count
//! ```
//!
//! Degree and count payloads are one [`WireScalar`] per message. Neighbour
//! lists are a [`WireListHead`] followed by `len` [`WireGid`]s. A batch only
//! ever carries one payload kind. Buffers are not assumed to be aligned;
//! records are read with `pod_read_unaligned`.

use bytemuck::{Pod, Zeroable};
use bytes::{BufMut, Bytes, BytesMut};
use std::mem::{align_of, size_of};
use thiserror::Error;

use crate::algs::message::{Envelope, Payload, PayloadKind};
use crate::topology::vertex::Gid;

/// Bump when the layout or semantics change in incompatible ways.
pub const WIRE_VERSION: u16 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("expected at least {need} bytes, got {have}")]
    Truncated { need: usize, have: usize },
    #[error("wire version {found} is not supported (expected {expected})", expected = WIRE_VERSION)]
    Version { found: u16 },
    #[error("unknown payload kind tag {0}")]
    UnknownKind(u16),
    #[error("{0} trailing bytes after the last record")]
    TrailingBytes(usize),
    #[error("batch mixes {first} and {other} payloads")]
    MixedBatch {
        first: PayloadKind,
        other: PayloadKind,
    },
    #[error("neighbour list of {len} entries does not fit the wire format")]
    ListTooLong { len: usize },
}

// ===== Records =============================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireHdr {
    pub version_le: u16,  // = WIRE_VERSION.to_le()
    pub kind_le: u16,     // PayloadKind tag
    pub reserved_le: u32, // keep zero
}

impl WireHdr {
    pub fn new(kind: PayloadKind) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            kind_le: kind.tag().to_le(),
            reserved_le: 0,
        }
    }
    pub fn kind(&self) -> u16 {
        u16::from_le(self.kind_le)
    }
    pub fn version(&self) -> u16 {
        u16::from_le(self.version_le)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u32,
}

impl WireCount {
    pub fn new(n: u32) -> Self {
        Self { n_le: n.to_le() }
    }
    pub fn get(&self) -> usize {
        u32::from_le(self.n_le) as usize
    }
}

/// `(target, value)` for degree and count payloads.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireScalar {
    pub gid_le: u64,
    pub value_le: u64,
}

impl WireScalar {
    pub fn new(gid: Gid, value: u64) -> Self {
        Self {
            gid_le: gid.get().to_le(),
            value_le: value.to_le(),
        }
    }
    pub fn gid(&self) -> Gid {
        Gid::new(u64::from_le(self.gid_le))
    }
    pub fn value(&self) -> u64 {
        u64::from_le(self.value_le)
    }
}

/// Head of a neighbour-list record; `len` ids follow.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireListHead {
    pub gid_le: u64,
    pub len_le: u32,
    pub _pad: u32, // explicit padding to 8-byte alignment
}

impl WireListHead {
    pub fn new(gid: Gid, len: u32) -> Self {
        Self {
            gid_le: gid.get().to_le(),
            len_le: len.to_le(),
            _pad: 0,
        }
    }
    pub fn gid(&self) -> Gid {
        Gid::new(u64::from_le(self.gid_le))
    }
    pub fn len(&self) -> usize {
        u32::from_le(self.len_le) as usize
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireGid {
    pub id_le: u64,
}

impl WireGid {
    pub fn of(gid: Gid) -> Self {
        Self {
            id_le: gid.get().to_le(),
        }
    }
    pub fn get(&self) -> Gid {
        Gid::new(u64::from_le(self.id_le))
    }
}

// ===== Compile-time sanity checks =========================================

const _: () = {
    assert!(size_of::<WireHdr>() == 8);
    assert!(size_of::<WireCount>() == 4);
    assert!(size_of::<WireScalar>() == 16);
    assert!(size_of::<WireListHead>() == 16);
    assert!(align_of::<WireListHead>() == 8);
    assert!(size_of::<WireGid>() == 8);
};

// ===== Encoding ============================================================

/// Encode one homogeneous batch.
pub fn encode_batch(envs: &[Envelope]) -> Result<Bytes, WireError> {
    let Some(first) = envs.first() else {
        return Ok(Bytes::new());
    };
    let kind = first.payload.kind();
    let n = u32::try_from(envs.len()).map_err(|_| WireError::ListTooLong { len: envs.len() })?;

    let mut buf = BytesMut::with_capacity(
        size_of::<WireHdr>() + size_of::<WireCount>() + envs.len() * size_of::<WireScalar>(),
    );
    buf.put_slice(bytemuck::bytes_of(&WireHdr::new(kind)));
    buf.put_slice(bytemuck::bytes_of(&WireCount::new(n)));

    for env in envs {
        match &env.payload {
            Payload::Degree(value) | Payload::Count(value) if env.payload.kind() == kind => {
                buf.put_slice(bytemuck::bytes_of(&WireScalar::new(env.target, *value)));
            }
            Payload::Neighbors(ids) if kind == PayloadKind::Neighbors => {
                let len = u32::try_from(ids.len())
                    .map_err(|_| WireError::ListTooLong { len: ids.len() })?;
                buf.put_slice(bytemuck::bytes_of(&WireListHead::new(env.target, len)));
                for &id in ids {
                    buf.put_slice(bytemuck::bytes_of(&WireGid::of(id)));
                }
            }
            other => {
                return Err(WireError::MixedBatch {
                    first: kind,
                    other: other.kind(),
                });
            }
        }
    }
    Ok(buf.freeze())
}

// ===== Decoding ============================================================

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read<T: Pod>(&mut self) -> Result<T, WireError> {
        let end = self.pos + size_of::<T>();
        if end > self.buf.len() {
            return Err(WireError::Truncated {
                need: end,
                have: self.buf.len(),
            });
        }
        let v = bytemuck::pod_read_unaligned(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(v)
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

/// Decode one batch produced by [`encode_batch`]. An empty buffer is an
/// empty batch.
pub fn decode_batch(buf: &[u8]) -> Result<Vec<Envelope>, WireError> {
    if buf.is_empty() {
        return Ok(Vec::new());
    }
    let mut rd = Reader::new(buf);
    let hdr: WireHdr = rd.read()?;
    if hdr.version() != WIRE_VERSION {
        return Err(WireError::Version {
            found: hdr.version(),
        });
    }
    let kind = PayloadKind::from_tag(hdr.kind()).ok_or(WireError::UnknownKind(hdr.kind()))?;
    let n = rd.read::<WireCount>()?.get();

    // never trust `n` for the allocation size
    let mut out = Vec::with_capacity(n.min(rd.remaining() / size_of::<WireScalar>()));
    for _ in 0..n {
        let env = match kind {
            PayloadKind::Degree | PayloadKind::Count => {
                let rec: WireScalar = rd.read()?;
                let payload = if kind == PayloadKind::Degree {
                    Payload::Degree(rec.value())
                } else {
                    Payload::Count(rec.value())
                };
                Envelope::new(rec.gid(), payload)
            }
            PayloadKind::Neighbors => {
                let head: WireListHead = rd.read()?;
                let mut ids = Vec::with_capacity(head.len().min(rd.remaining() / size_of::<WireGid>()));
                for _ in 0..head.len() {
                    ids.push(rd.read::<WireGid>()?.get());
                }
                Envelope::new(head.gid(), Payload::Neighbors(ids))
            }
        };
        out.push(env);
    }
    match rd.remaining() {
        0 => Ok(out),
        extra => Err(WireError::TrailingBytes(extra)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(raw: u64) -> Gid {
        Gid::new(raw)
    }

    #[test]
    fn scalar_batch_roundtrip() {
        let envs = vec![
            Envelope::new(g(10), Payload::Degree(3)),
            Envelope::new(g(u64::MAX), Payload::Degree(0)),
        ];
        let bytes = encode_batch(&envs).unwrap();
        assert_eq!(bytes.len(), 8 + 4 + 2 * 16);
        assert_eq!(decode_batch(&bytes).unwrap(), envs);
    }

    #[test]
    fn neighbor_lists_roundtrip_including_empty() {
        let envs = vec![
            Envelope::new(g(1), Payload::Neighbors(vec![g(4), g(9)])),
            Envelope::new(g(2), Payload::Neighbors(vec![])),
        ];
        let bytes = encode_batch(&envs).unwrap();
        assert_eq!(decode_batch(&bytes).unwrap(), envs);
    }

    #[test]
    fn unaligned_buffer_decodes() {
        let envs = vec![Envelope::new(g(5), Payload::Count(7))];
        let bytes = encode_batch(&envs).unwrap();
        let mut shifted = vec![0u8];
        shifted.extend_from_slice(&bytes);
        assert_eq!(decode_batch(&shifted[1..]).unwrap(), envs);
    }

    #[test]
    fn mixed_batch_rejected() {
        let envs = vec![
            Envelope::new(g(1), Payload::Degree(1)),
            Envelope::new(g(2), Payload::Count(1)),
        ];
        assert_eq!(
            encode_batch(&envs).unwrap_err(),
            WireError::MixedBatch {
                first: PayloadKind::Degree,
                other: PayloadKind::Count
            }
        );
    }

    #[test]
    fn truncated_and_trailing_rejected() {
        let envs = vec![Envelope::new(g(1), Payload::Neighbors(vec![g(2), g(3)]))];
        let bytes = encode_batch(&envs).unwrap();
        assert!(matches!(
            decode_batch(&bytes[..bytes.len() - 1]),
            Err(WireError::Truncated { .. })
        ));
        let mut longer = bytes.to_vec();
        longer.push(0);
        assert_eq!(decode_batch(&longer), Err(WireError::TrailingBytes(1)));
    }

    #[test]
    fn version_and_kind_guards() {
        let bytes = encode_batch(&[Envelope::new(g(1), Payload::Count(1))]).unwrap();
        let mut bad_version = bytes.to_vec();
        bad_version[0] = 0xFF;
        assert!(matches!(
            decode_batch(&bad_version),
            Err(WireError::Version { .. })
        ));
        let mut bad_kind = bytes.to_vec();
        bad_kind[2] = 9;
        bad_kind[3] = 0;
        assert_eq!(decode_batch(&bad_kind), Err(WireError::UnknownKind(9)));
        assert_eq!(WireHdr::new(PayloadKind::Count).version(), WIRE_VERSION);
    }

    #[test]
    fn empty_batch_is_empty_buffer() {
        assert!(encode_batch(&[]).unwrap().is_empty());
        assert!(decode_batch(&[]).unwrap().is_empty());
    }
}
