//! Graph node identifiers.
//!
//! Canonical nodes reuse their OpenStreetMap id.  Phantom nodes created by
//! turn-restriction expansion are numbered from [`PHANTOM_ID_BASE`] upward,
//! so OSM ids at or above that value are reserved.
//!
//! There is no "absent" sentinel: lookups that can miss return `Option`.

use std::fmt;

/// First id handed out to phantom (non-canonical) nodes.
pub const PHANTOM_ID_BASE: i64 = 0x0008_0000_0000_0000;

/// Process-local identifier of a graph node.  Never zero.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub i64);

impl NodeId {
    /// `true` if this id lies in the range reserved for phantom nodes.
    #[inline]
    pub fn is_phantom(self) -> bool {
        self.0 >= PHANTOM_ID_BASE
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<i64> for NodeId {
    #[inline(always)]
    fn from(id: i64) -> NodeId {
        NodeId(id)
    }
}

impl From<NodeId> for i64 {
    #[inline(always)]
    fn from(id: NodeId) -> i64 {
        id.0
    }
}
