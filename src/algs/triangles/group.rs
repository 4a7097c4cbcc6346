//! Logical vertex groups for the cross-group variant.
//!
//! Groups are derived from the global id alone, so they do not depend on how
//! the graph is split across workers.

use serde::{Deserialize, Serialize};

use crate::topology::vertex::Gid;
use crate::tri_error::TriangleError;

/// A validated, non-zero number of groups.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct GroupCount(u32);

impl GroupCount {
    /// Accepts `1..=u32::MAX`.
    pub fn new(raw: i64) -> Result<Self, TriangleError> {
        match u32::try_from(raw) {
            Ok(n) if n > 0 => Ok(GroupCount(n)),
            _ => Err(TriangleError::InvalidGroupCount(raw)),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn group_of(self, gid: Gid) -> u32 {
        (gid.get() % u64::from(self.0)) as u32
    }
}

impl TryFrom<i64> for GroupCount {
    type Error = TriangleError;
    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        GroupCount::new(raw)
    }
}

impl From<GroupCount> for i64 {
    fn from(g: GroupCount) -> i64 {
        i64::from(g.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_and_oversized() {
        assert_eq!(GroupCount::new(0), Err(TriangleError::InvalidGroupCount(0)));
        assert_eq!(GroupCount::new(-3), Err(TriangleError::InvalidGroupCount(-3)));
        let too_big = i64::from(u32::MAX) + 1;
        assert_eq!(
            GroupCount::new(too_big),
            Err(TriangleError::InvalidGroupCount(too_big))
        );
        assert_eq!(GroupCount::new(1).unwrap().get(), 1);
    }

    #[test]
    fn modulus_of_global_id() {
        let g = GroupCount::new(3).unwrap();
        let groups: Vec<u32> = (0..7).map(|i| g.group_of(Gid::new(i))).collect();
        assert_eq!(groups, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(g.group_of(Gid::new(u64::MAX)), (u64::MAX % 3) as u32);
    }

    #[test]
    fn serde_validates() {
        let ok: GroupCount = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<GroupCount>("0").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "4");
    }
}
